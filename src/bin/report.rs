//! FirmPulse report runner.
//!
//! Renders the firmwide settlement dashboard or the pre-suit KPI dashboard as
//! text (or JSON with `--json`) against `~/.firmpulse/firmpulse.db`.
//!
//! Build: `cargo build --bin firmpulse-report`
//! Usage: `firmpulse-report [ytd [YEAR] | month YEAR MONTH | range START END | presuit [MONTH]] [--json]`

use chrono::Datelike;

use firmpulse_lib::db::ReportsDb;
use firmpulse_lib::helpers::{
    currency, dash_count, dash_currency, dash_decimal, decimal1, parse_month_key, NO_DATA,
};
use firmpulse_lib::period::ReportPeriod;
use firmpulse_lib::services::dashboard::{self, FirmwideDashboard, FirmwideResult};
use firmpulse_lib::services::presuit::{self, PresuitDashboard, PresuitResult};

const USAGE: &str = "Usage: firmpulse-report [COMMAND] [--json]

Commands:
  ytd [YEAR]         Firmwide dashboard, year to date (default: current year)
  month YEAR MONTH   Firmwide dashboard for one calendar month
  range START END    Firmwide dashboard for a custom date range (YYYY-MM-DD)
  presuit [MONTH]    Pre-suit KPI dashboard, optionally for one YYYY-MM month

With no command, renders the current year to date.";

fn main() {
    env_logger::init();
    if let Err(message) = run() {
        eprintln!("error: {}", message);
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }
    let json = args.iter().any(|a| a == "--json");
    let words: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| *a != "--json")
        .collect();

    let db = ReportsDb::open().map_err(|e| e.to_string())?;
    let today = chrono::Local::now().date_naive();

    match words.split_first() {
        None => firmwide(&db, &ReportPeriod::Ytd { year: today.year() }, json),
        Some((&"ytd", rest)) => {
            let year = match rest.first() {
                Some(raw) => parse_year(raw)?,
                None => today.year(),
            };
            firmwide(&db, &ReportPeriod::Ytd { year }, json)
        }
        Some((&"month", rest)) => {
            let (year, month) = match rest {
                [y, m] => (parse_year(y)?, parse_month(m)?),
                _ => return Err(format!("month takes YEAR and MONTH\n\n{}", USAGE)),
            };
            firmwide(&db, &ReportPeriod::Monthly { year, month }, json)
        }
        Some((&"range", rest)) => {
            let (start, end) = match rest {
                [s, e] => (parse_date(s)?, parse_date(e)?),
                _ => return Err(format!("range takes START and END\n\n{}", USAGE)),
            };
            firmwide(&db, &ReportPeriod::Custom { start, end }, json)
        }
        Some((&"presuit", rest)) => {
            let month = match rest.first() {
                Some(raw) => {
                    if parse_month_key(raw).is_none() {
                        return Err(format!("'{}' is not a YYYY-MM month", raw));
                    }
                    Some(*raw)
                }
                None => None,
            };
            presuit_report(&db, month, json)
        }
        Some((other, _)) => Err(format!("Unknown command '{}'\n\n{}", other, USAGE)),
    }
}

fn parse_year(raw: &str) -> Result<i32, String> {
    raw.parse()
        .map_err(|_| format!("'{}' is not a year", raw))
}

fn parse_month(raw: &str) -> Result<u32, String> {
    let month: u32 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a month number", raw))?;
    if !(1..=12).contains(&month) {
        return Err(format!("month {} is out of range 1-12", month));
    }
    Ok(month)
}

fn parse_date(raw: &str) -> Result<chrono::NaiveDate, String> {
    raw.parse()
        .map_err(|_| format!("'{}' is not a YYYY-MM-DD date", raw))
}

// =============================================================================
// Firmwide rendering
// =============================================================================

fn firmwide(db: &ReportsDb, period: &ReportPeriod, json: bool) -> Result<(), String> {
    let result = dashboard::firmwide_dashboard(db, period);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).map_err(|e| e.to_string())?
        );
        return Ok(());
    }
    match result {
        FirmwideResult::Success { data } => {
            render_firmwide(&data);
            Ok(())
        }
        FirmwideResult::Error { message } => Err(message),
    }
}

fn render_firmwide(data: &FirmwideDashboard) {
    println!();
    println!(
        "Firmwide report: {} ({} to {})",
        data.period_label, data.range.start, data.range.end
    );
    println!();
    println!("  Cases:           {}", data.num_cases);
    println!("  Total settled:   {}", currency(data.total_settlement));
    println!("  Total fees:      {}", currency(data.total_fees));
    println!("  Avg settlement:  {}", currency(data.avg_settlement));
    println!("  Avg fee:         {}", currency(data.avg_fee));
    println!();
    println!(
        "  Track split: pre-suit {}%, litigation {}%, unknown {}%",
        decimal1(data.split.pre_pct),
        decimal1(data.split.lit_pct),
        decimal1(data.split.unknown_pct)
    );
    println!(
        "  Goal: {} ({}% reached)",
        currency(data.revenue_goal),
        decimal1(data.goal_progress)
    );
    println!(
        "  Google reviews: {} ({} gained since {})",
        data.reviews.current, data.reviews.gained, data.reviews.baseline
    );
    println!();
    println!("  Per person:");
    for person in &data.people {
        println!(
            "    {:<10} {:>3} cases   settled {:>15}   fees {:>15}   last {}",
            person.person_name,
            person.cases,
            currency(person.settlement_total),
            currency(person.fee_total),
            person.latest_date.as_deref().unwrap_or(NO_DATA)
        );
    }
    println!();
}

// =============================================================================
// Pre-suit rendering
// =============================================================================

fn presuit_report(db: &ReportsDb, month: Option<&str>, json: bool) -> Result<(), String> {
    let result = presuit::presuit_dashboard(db, month);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).map_err(|e| e.to_string())?
        );
        return Ok(());
    }
    match result {
        PresuitResult::Success { data } => {
            render_presuit(&data);
            Ok(())
        }
        PresuitResult::Empty { message } => {
            println!("{}", message);
            Ok(())
        }
        PresuitResult::Error { message } => Err(message),
    }
}

fn render_presuit(data: &PresuitDashboard) {
    println!();
    match &data.month_filter {
        Some(month) => println!("Pre-suit dashboard: {}", month),
        None => println!("Pre-suit dashboard: all months"),
    }
    println!(
        "  Months on record: {}",
        if data.month_options.is_empty() {
            NO_DATA.to_string()
        } else {
            data.month_options.join(", ")
        }
    );
    println!();
    println!(
        "  {:<10} {:>8} {:>14} {:>10} {:>11} {:>5}",
        "Person", "Demands", "Settled(KPI)", "Lien days", "No-contact", "NPS"
    );
    for summary in &data.kpi_summaries {
        println!(
            "  {:<10} {:>8} {:>14} {:>10} {:>11} {:>5}",
            summary.person_name,
            dash_count(summary.demands_sent),
            dash_currency(summary.settlements_amount),
            dash_decimal(summary.avg_lien_resolution_days),
            dash_count(summary.files_without_14_day_contact),
            dash_decimal(summary.nps_score)
        );
    }
    println!();
    println!("  Pre-suit settlements:");
    for person in &data.people {
        println!(
            "    {:<10} {:>3} cases   settled {:>15}   fees {:>15}   last {}",
            person.person_name,
            person.cases,
            currency(person.settlement_total),
            currency(person.fee_total),
            person.latest_date.as_deref().unwrap_or(NO_DATA)
        );
    }
    println!();
}

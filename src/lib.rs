pub mod db;
pub mod helpers;
mod migrations;
pub mod period;
pub mod roster;
pub mod services;

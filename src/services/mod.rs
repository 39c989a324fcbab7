// Service layer between storage and presentation.
// Read services return tagged status enums; save services surface validation
// failures separately from storage failures.

pub mod dashboard;
pub mod entry;
pub mod goals;
pub mod presuit;

pub mod status;
pub mod views;

pub use status::{DueState, ProblemStatus, compute_status, review_interval_days};
pub use views::{DueRow, UpcomingRow, list_due, list_upcoming};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Quality of one attempt, rendered as ○/△/× in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptResult {
    Good,
    Fair,
    Poor,
}

impl AttemptResult {
    /// Accepts both the storage form and the display marks, so snapshots
    /// recorded with either vocabulary import cleanly.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "good" | "○" => Some(Self::Good),
            "fair" | "△" => Some(Self::Fair),
            "poor" | "×" => Some(Self::Poor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

/// One dated practice record for a problem. Per problem, attempt_no and
/// done_date are each unique; created_at is a record-modification
/// timestamp used only as a tie-breaker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: i64,
    pub problem_id: i64,
    pub attempt_no: u32,
    pub done_date: NaiveDate,
    pub minutes: Option<u32>,
    pub score: Option<f64>,
    pub result: AttemptResult,
    pub created_at: DateTime<Utc>,
}

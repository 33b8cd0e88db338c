use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level grouping, e.g. one exam subject. Subjects are seeded once
/// and reordered by the user; deletion is not exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

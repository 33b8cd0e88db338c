use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named run of problems within a subject, e.g. "1-1" or "第2回".
/// (subject_id, name) is unique; sort_order is dense within the subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: i64,
    /// Legacy exports predate subjects and omit this field; they belong
    /// to the default subject.
    #[serde(default = "default_subject_id")]
    pub subject_id: i64,
    pub name: String,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

fn default_subject_id() -> i64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_series_without_subject_defaults_to_one() {
        let series: Series = serde_json::from_value(json!({
            "id": 7,
            "name": "1-1",
            "sortOrder": 0,
            "createdAt": "2023-01-01T00:00:00Z",
        }))
        .unwrap();
        assert_eq!(series.subject_id, 1);
        assert_eq!(series.name, "1-1");
    }
}

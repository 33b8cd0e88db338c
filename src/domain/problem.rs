use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of exercise a problem is. The kind decides whether the
/// problem carries a numeric index and where it sorts in the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    Problem,
    Comprehensive,
    Drill,
    ConfirmationTest,
}

impl ProblemKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "problem" => Some(Self::Problem),
            "comprehensive" => Some(Self::Comprehensive),
            "drill" => Some(Self::Drill),
            "confirmation_test" => Some(Self::ConfirmationTest),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Problem => "problem",
            Self::Comprehensive => "comprehensive",
            Self::Drill => "drill",
            Self::ConfirmationTest => "confirmation_test",
        }
    }

    /// Fixed ordering rank: regular problems first, then comprehensive,
    /// then the unnumbered session kinds.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Problem => 0,
            Self::Comprehensive => 1,
            Self::Drill => 2,
            Self::ConfirmationTest => 3,
        }
    }

    /// Whether this kind carries a numeric index. Drills and confirmation
    /// tests are recorded as whole sessions without a number.
    pub fn requires_number(&self) -> bool {
        matches!(self, Self::Problem | Self::Comprehensive)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Problem => "Problem",
            Self::Comprehensive => "Comprehensive",
            Self::Drill => "Drill",
            Self::ConfirmationTest => "Confirmation test",
        }
    }

    /// Display label for a problem of this kind, e.g. "Problem 3" or "Drill".
    pub fn label(&self, number: Option<u32>) -> String {
        match number {
            Some(n) => format!("{} {}", self.display_name(), n),
            None => self.display_name().to_string(),
        }
    }
}

/// A recurring exercise, identified by (series, kind, number) and
/// practiced repeatedly over time. Created lazily on first attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: i64,
    pub series_id: i64,
    pub kind: ProblemKind,
    pub number: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl Problem {
    pub fn label(&self) -> String {
        self.kind.label(self.number)
    }
}

pub mod attempt;
pub mod ordering;
pub mod problem;
pub mod series;
pub mod subject;

pub use attempt::{Attempt, AttemptResult};
pub use problem::{Problem, ProblemKind};
pub use series::Series;
pub use subject::Subject;

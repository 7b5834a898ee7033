#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// The structure grader and its phases.
pub mod grader;
/// Table and summary rendering of verdicts.
pub mod report;
/// The names and coverage mode a file is graded against.
pub mod rubric;
/// Verdicts, diagnostics and grading errors.
pub mod verdict;

pub use grader::StructureGrader;
pub use report::{verdict_line, verdict_table};
pub use rubric::{MethodCoverage, Rubric, RubricError};
pub use verdict::{
    Diagnostic, FailureReason, GradeError, Level, Phase, Status, StructuralMismatch, Verdict,
};

pub use crate::types::LineRef;

//! # structgrade
//!
//! Parses a Java source file with tree-sitter and certifies that it declares
//! a required interface, classes implementing it, and an entry point that
//! calls the interface methods.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Environment-driven configuration
pub mod config;
/// For all things related to grading
pub mod grade;
/// Tree-sitter front end for Java sources
pub mod java;
/// Shared types such as source line references
pub mod types;

use std::path::Path;

pub use grade::{GradeError, Rubric, StructureGrader, Verdict};

/// Grades `path` against the reference rubric.
pub fn grade(path: impl AsRef<Path>) -> Result<Verdict, GradeError> {
    StructureGrader::default().grade(path)
}

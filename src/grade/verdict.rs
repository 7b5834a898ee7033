#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use serde::Serialize;

use crate::{java::ParseFailure, types::LineRef};

/// Steps of a grading run, in the order they execute.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Phase {
    /// Locating and reading the source file.
    Read,
    /// Parsing the source into a `SourceUnit`.
    Parse,
    /// Looking for the required interface.
    InterfacePresence,
    /// Looking for the required classes.
    ClassPresence,
    /// Checking the classes implement the interface.
    Conformance,
    /// Checking the classes declare the interface methods.
    MethodCoverage,
    /// Checking the entry point calls the interface methods.
    InvocationCoverage,
    /// Closing line of a passing run.
    Summary,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Read => "read",
            Phase::Parse => "parse",
            Phase::InterfacePresence => "interface",
            Phase::ClassPresence => "classes",
            Phase::Conformance => "conformance",
            Phase::MethodCoverage => "methods",
            Phase::InvocationCoverage => "invocations",
            Phase::Summary => "summary",
        };
        write!(f, "{name}")
    }
}

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Level {
    /// A check that passed, or progress information.
    Info,
    /// The check that failed the run.
    Error,
}

/// One line of the diagnostic trail.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Diagnostic {
    /// phase that produced this line.
    pub phase:    Phase,
    /// severity.
    pub level:    Level,
    /// human readable message.
    pub message:  String,
    /// where in the source the message points, if anywhere.
    pub location: Option<LineRef>,
}

/// A parsed file that does not have the required structure.
#[derive(thiserror::Error, Debug, Clone, Serialize, PartialEq, Eq)]
pub enum StructuralMismatch {
    /// The interface is not declared.
    #[error("Interface {interface} not found.")]
    InterfaceMissing {
        /// the interface looked for.
        interface: String,
    },
    /// One or more required classes are not declared.
    #[error("Class {} not found.", .missing.join(" or "))]
    ClassesMissing {
        /// the classes that could not be found.
        missing: Vec<String>,
    },
    /// A class does not list the interface in its `implements` clause.
    #[error("{class} does not implement {interface}.")]
    ConformanceMissing {
        /// the offending class.
        class:     String,
        /// the interface it should implement.
        interface: String,
    },
    /// A class lacks the required public methods.
    #[error("{class} does not declare public method {expected} from {interface}.")]
    MethodCoverageMissing {
        /// the offending class.
        class:     String,
        /// the methods looked for, joined per coverage mode.
        expected:  String,
        /// the interface the methods come from.
        interface: String,
    },
    /// The entry point never calls any of the methods.
    #[error("{expected} method not executed in {entry_point}.")]
    InvocationMissing {
        /// the methods looked for, joined with `or`.
        expected:    String,
        /// the entry point method name.
        entry_point: String,
    },
}

impl StructuralMismatch {
    /// The phase that reports this mismatch.
    pub fn phase(&self) -> Phase {
        match self {
            StructuralMismatch::InterfaceMissing { .. } => Phase::InterfacePresence,
            StructuralMismatch::ClassesMissing { .. } => Phase::ClassPresence,
            StructuralMismatch::ConformanceMissing { .. } => Phase::Conformance,
            StructuralMismatch::MethodCoverageMissing { .. } => Phase::MethodCoverage,
            StructuralMismatch::InvocationMissing { .. } => Phase::InvocationCoverage,
        }
    }
}

/// Why a verdict is negative.
#[derive(thiserror::Error, Debug, Clone, Serialize, PartialEq, Eq)]
pub enum FailureReason {
    /// The path does not resolve to a readable file.
    #[error("Source file does not exist: {path}")]
    FileNotFound {
        /// the path as given.
        path: String,
    },
    /// The file parsed but lacks the required structure.
    #[error(transparent)]
    Structural(#[from] StructuralMismatch),
}

/// Terminal state of a grading run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum Status {
    /// Every check passed.
    Passed,
    /// A check failed.
    Failed(FailureReason),
}

/// The result of grading one file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Verdict {
    /// `true` iff `status` is `Passed`.
    passed:      bool,
    /// terminal state.
    status:      Status,
    /// every diagnostic recorded, in the order the checks ran.
    diagnostics: Vec<Diagnostic>,
}

impl Verdict {
    /// A passing verdict.
    pub fn passed(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            passed: true,
            status: Status::Passed,
            diagnostics,
        }
    }

    /// A failing verdict.
    pub fn failed(reason: FailureReason, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            passed: false,
            status: Status::Failed(reason),
            diagnostics,
        }
    }

    /// Whether every check passed.
    pub fn is_pass(&self) -> bool {
        self.passed
    }

    /// Returns the terminal state.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Returns the failure reason of a negative verdict.
    pub fn failure(&self) -> Option<&FailureReason> {
        match &self.status {
            Status::Passed => None,
            Status::Failed(reason) => Some(reason),
        }
    }

    /// Returns the diagnostic trail.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Messages of the diagnostic trail, in order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.diagnostics.iter().map(|d| d.message.as_str())
    }
}

/// Errors that abort a grading run instead of producing a verdict.
#[derive(thiserror::Error, Debug)]
pub enum GradeError {
    /// The file exists but is not a valid source file.
    #[error("Could not parse `{path}`: {source}")]
    Parse {
        /// the path as given.
        path:   String,
        /// what the parser rejected.
        #[source]
        source: ParseFailure,
    },
}

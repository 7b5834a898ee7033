#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::Path;

use super::{
    rubric::{MethodCoverage, Rubric},
    verdict::{
        Diagnostic, FailureReason, GradeError, Level, Phase, StructuralMismatch, Verdict,
    },
};
use crate::{
    java::{JavaSourceParser, ParseFailure, SourceParser, SourceUnit},
    types::LineRef,
};

/// A passing observation made by a phase.
struct Finding {
    /// message for the trail.
    message: String,
    /// 1-based source line the observation refers to.
    line:    Option<usize>,
}

impl Finding {
    /// A finding pointing at `line`.
    fn at(message: String, line: usize) -> Self {
        Self {
            message,
            line: Some(line),
        }
    }
}

/// Everything one phase concluded about a `SourceUnit`.
struct PhaseReport {
    /// which phase ran.
    phase:    Phase,
    /// passing observations, in scan order.
    findings: Vec<Finding>,
    /// the mismatch that fails the run, if any.
    mismatch: Option<StructuralMismatch>,
}

/// Signature shared by the structural phases.
type Check = fn(&Rubric, &SourceUnit) -> PhaseReport;

/// Structural phases in the order they run.
const CHECKS: [Check; 5] = [
    interface_presence,
    class_presence,
    conformance,
    method_coverage,
    invocation_coverage,
];

/// Accumulates the diagnostic trail of one grading run and mirrors every
/// line to the log as it is recorded.
struct Trail {
    /// file name used for `LineRef`s.
    file_name:   String,
    /// lines recorded so far.
    diagnostics: Vec<Diagnostic>,
}

impl Trail {
    /// Starts an empty trail for `file_name`.
    fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name:   file_name.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Records a diagnostic.
    fn push(&mut self, phase: Phase, level: Level, message: String, line: Option<usize>) {
        match level {
            Level::Info => tracing::info!("[{phase}] {message}"),
            Level::Error => tracing::error!("[{phase}] {message}"),
        }

        self.diagnostics.push(Diagnostic {
            phase,
            level,
            message,
            location: line.map(|l| LineRef::new(self.file_name.clone(), l)),
        });
    }

    /// Records a phase's findings and, if it failed, its mismatch.
    fn record(&mut self, report: PhaseReport) -> Option<StructuralMismatch> {
        for finding in report.findings {
            self.push(report.phase, Level::Info, finding.message, finding.line);
        }
        if let Some(mismatch) = &report.mismatch {
            self.push(report.phase, Level::Error, mismatch.to_string(), None);
        }
        report.mismatch
    }

    /// Closes the trail with a failing verdict.
    fn fail(mut self, phase: Phase, reason: FailureReason) -> Verdict {
        self.push(phase, Level::Error, reason.to_string(), None);
        Verdict::failed(reason, self.diagnostics)
    }
}

/// Certifies that a Java source file declares the rubric's interface and
/// classes and exercises the interface methods from its entry point.
#[derive(Debug, Clone)]
pub struct StructureGrader<P = JavaSourceParser> {
    /// front end used to build `SourceUnit`s.
    parser: P,
    /// names and coverage mode to check for.
    rubric: Rubric,
}

impl Default for StructureGrader {
    fn default() -> Self {
        Self::new(Rubric::default())
    }
}

impl StructureGrader {
    /// A grader using the tree-sitter Java front end.
    pub fn new(rubric: Rubric) -> Self {
        Self::with_parser(JavaSourceParser, rubric)
    }
}

impl<P: SourceParser> StructureGrader<P> {
    /// A grader using a custom front end.
    pub fn with_parser(parser: P, rubric: Rubric) -> Self {
        Self { parser, rubric }
    }

    /// Returns the rubric this grader checks.
    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    /// Grades the file at `path`.
    ///
    /// A missing or unreadable file yields a failing verdict without parsing.
    /// A file that cannot be parsed is an error, not a verdict.
    pub fn grade(&self, path: impl AsRef<Path>) -> Result<Verdict, GradeError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| shown.clone());

        let mut trail = Trail::new(file_name);
        trail.push(
            Phase::Read,
            Level::Info,
            format!("Starting structure check of {shown}"),
            None,
        );

        if !path.is_file() {
            return Ok(trail.fail(Phase::Read, FailureReason::FileNotFound { path: shown }));
        }

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("Could not read {shown}: {e}");
                return Ok(trail.fail(Phase::Read, FailureReason::FileNotFound { path: shown }));
            }
        };

        let source = String::from_utf8(bytes).map_err(|e| {
            let failure = ParseFailure::InvalidUtf8 {
                valid_up_to: e.utf8_error().valid_up_to(),
            };
            tracing::error!("[{}] Error parsing {shown}: {failure}", Phase::Parse);
            GradeError::Parse {
                path:   shown.clone(),
                source: failure,
            }
        })?;

        self.grade_with_trail(&source, &shown, trail)
    }

    /// Grades in-memory source; `file_name` only labels diagnostics.
    pub fn grade_source(&self, source: &str, file_name: &str) -> Result<Verdict, GradeError> {
        self.grade_with_trail(source, file_name, Trail::new(file_name))
    }

    /// Runs the structural phases on an already parsed unit.
    pub fn grade_unit(&self, unit: &SourceUnit) -> Verdict {
        self.run_checks(unit, Trail::new("<unit>"))
    }

    /// Parses `source` and runs the structural phases, continuing `trail`.
    fn grade_with_trail(
        &self,
        source: &str,
        label: &str,
        mut trail: Trail,
    ) -> Result<Verdict, GradeError> {
        let unit = self.parser.parse(source).map_err(|failure| {
            tracing::error!("[{}] Error parsing {label}: {failure}", Phase::Parse);
            GradeError::Parse {
                path:   label.to_string(),
                source: failure,
            }
        })?;

        trail.push(
            Phase::Parse,
            Level::Info,
            format!("Parsed {label}: {} type declaration(s).", unit.types.len()),
            None,
        );

        Ok(self.run_checks(&unit, trail))
    }

    /// Runs every structural phase in order, stopping at the first failure.
    fn run_checks(&self, unit: &SourceUnit, mut trail: Trail) -> Verdict {
        for check in CHECKS {
            if let Some(mismatch) = trail.record(check(&self.rubric, unit)) {
                return Verdict::failed(mismatch.into(), trail.diagnostics);
            }
        }

        trail.push(Phase::Summary, Level::Info, "All structural checks passed.".to_string(), None);
        Verdict::passed(trail.diagnostics)
    }
}

/// Phase 2: the interface is declared somewhere in the unit, as a class or
/// interface.
fn interface_presence(rubric: &Rubric, unit: &SourceUnit) -> PhaseReport {
    let interface = rubric.interface();
    match unit.find_class_or_interface(interface) {
        Some(decl) => PhaseReport {
            phase:    Phase::InterfacePresence,
            findings: vec![Finding::at(format!("Interface {interface} found."), decl.line)],
            mismatch: None,
        },
        None => PhaseReport {
            phase:    Phase::InterfacePresence,
            findings: Vec::new(),
            mismatch: Some(StructuralMismatch::InterfaceMissing {
                interface: interface.to_string(),
            }),
        },
    }
}

/// Phase 3: every rubric class is declared.
fn class_presence(rubric: &Rubric, unit: &SourceUnit) -> PhaseReport {
    let (findings, missing) = rubric.classes().iter().fold(
        (Vec::new(), Vec::new()),
        |(mut findings, mut missing), class| {
            match unit.find_class_or_interface(class) {
                Some(decl) => {
                    findings.push(Finding::at(format!("Class {class} found."), decl.line))
                }
                None => missing.push(class.clone()),
            }
            (findings, missing)
        },
    );

    PhaseReport {
        phase: Phase::ClassPresence,
        findings,
        mismatch: (!missing.is_empty()).then_some(StructuralMismatch::ClassesMissing { missing }),
    }
}

/// Phase 4: every rubric class lists the interface in `implements`.
fn conformance(rubric: &Rubric, unit: &SourceUnit) -> PhaseReport {
    let interface = rubric.interface();
    let mut findings = Vec::new();

    for class in rubric.classes() {
        match unit
            .types_named(class)
            .find(|decl| decl.is_class_or_interface() && decl.implements(interface))
        {
            Some(decl) => {
                findings.push(Finding::at(format!("{class} implements {interface}."), decl.line))
            }
            None => {
                return PhaseReport {
                    phase: Phase::Conformance,
                    findings,
                    mismatch: Some(StructuralMismatch::ConformanceMissing {
                        class:     class.clone(),
                        interface: interface.to_string(),
                    }),
                };
            }
        }
    }

    PhaseReport {
        phase: Phase::Conformance,
        findings,
        mismatch: None,
    }
}

/// Phase 5: every rubric class declares the rubric methods publicly, either
/// one of them or all of them depending on the coverage mode.
fn method_coverage(rubric: &Rubric, unit: &SourceUnit) -> PhaseReport {
    let mut findings = Vec::new();

    for class in rubric.classes() {
        let mut implemented = 0;
        for method in rubric.methods() {
            let public = unit
                .types_named(class)
                .filter(|decl| decl.is_class_or_interface())
                .flat_map(|decl| decl.methods_named(method))
                .find(|m| m.is_public());

            if let Some(m) = public {
                implemented += 1;
                findings.push(Finding::at(
                    format!("Method {method} implemented in {class}."),
                    m.line,
                ));
            }
        }

        let covered = match rubric.coverage() {
            MethodCoverage::Any => implemented > 0,
            MethodCoverage::All => implemented == rubric.methods().len(),
        };

        if !covered {
            return PhaseReport {
                phase: Phase::MethodCoverage,
                findings,
                mismatch: Some(StructuralMismatch::MethodCoverageMissing {
                    class:     class.clone(),
                    expected:  rubric.coverage().describe(rubric.methods()),
                    interface: rubric.interface().to_string(),
                }),
            };
        }
    }

    PhaseReport {
        phase: Phase::MethodCoverage,
        findings,
        mismatch: None,
    }
}

/// Phase 6: some entry point method calls at least one rubric method. Entry
/// points declared in enums, records and anonymous classes count too.
fn invocation_coverage(rubric: &Rubric, unit: &SourceUnit) -> PhaseReport {
    let entry_point = rubric.entry_point();
    let findings: Vec<Finding> = unit
        .methods_named(entry_point)
        .flat_map(|m| m.calls())
        .filter(|call| rubric.is_rubric_method(&call.name))
        .map(|call| {
            Finding::at(format!("Method {} is executed in {entry_point}.", call.name), call.line)
        })
        .collect();

    let mismatch = findings.is_empty().then(|| StructuralMismatch::InvocationMissing {
        expected:    MethodCoverage::Any.describe(rubric.methods()),
        entry_point: entry_point.to_string(),
    });

    PhaseReport {
        phase: Phase::InvocationCoverage,
        findings,
        mismatch,
    }
}

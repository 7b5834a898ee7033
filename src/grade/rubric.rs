#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{fmt::Display, str::FromStr};

use anyhow::bail;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// How many of the rubric methods each class has to declare publicly.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum MethodCoverage {
    /// At least one of the methods, public.
    #[default]
    Any,
    /// Every method, public.
    All,
}

impl MethodCoverage {
    /// Joins method names the way diagnostics for this mode read.
    pub fn describe(&self, methods: &[String]) -> String {
        match self {
            MethodCoverage::Any => methods.iter().join(" or "),
            MethodCoverage::All => methods.iter().join(" and "),
        }
    }
}

impl FromStr for MethodCoverage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "loose" => Ok(MethodCoverage::Any),
            "all" | "strict" => Ok(MethodCoverage::All),
            other => bail!("Unknown method coverage mode `{other}` (expected `any` or `all`)"),
        }
    }
}

impl Display for MethodCoverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MethodCoverage::Any => write!(f, "any"),
            MethodCoverage::All => write!(f, "all"),
        }
    }
}

/// The names a source file has to declare and use to pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rubric {
    /// Interface every class must implement.
    interface:   String,
    /// Classes that must exist and implement `interface`.
    classes:     Vec<String>,
    /// Interface methods the classes implement and the entry point calls.
    methods:     Vec<String>,
    /// Method whose body must invoke one of `methods`.
    entry_point: String,
    /// How strictly `methods` are required per class.
    coverage:    MethodCoverage,
}

/// Reasons a `Rubric` cannot be built.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RubricError {
    /// The class list is empty.
    #[error("A rubric needs at least one class")]
    NoClasses,
    /// The method list is empty.
    #[error("A rubric needs at least one method")]
    NoMethods,
}

/// Interface of the reference assignment.
const DEFAULT_INTERFACE: &str = "AnimalInterface";
/// Entry point of the reference assignment.
const DEFAULT_ENTRY_POINT: &str = "main";

/// Classes of the reference assignment.
fn default_classes() -> Vec<String> {
    vec![String::from("Dog"), String::from("Cat")]
}

/// Interface methods of the reference assignment.
fn default_methods() -> Vec<String> {
    vec![String::from("sound"), String::from("eat")]
}

impl Default for Rubric {
    fn default() -> Self {
        Self {
            interface:   DEFAULT_INTERFACE.to_string(),
            classes:     default_classes(),
            methods:     default_methods(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            coverage:    MethodCoverage::default(),
        }
    }
}

#[bon::bon]
impl Rubric {
    /// Builds a rubric; unset names fall back to the reference assignment and
    /// empty class or method lists are rejected.
    #[builder(on(String, into), finish_fn = build)]
    pub fn new(
        #[builder(default = DEFAULT_INTERFACE.to_string())]
        interface: String,
        #[builder(default = default_classes(), with = FromIterator::from_iter)]
        classes: Vec<String>,
        #[builder(default = default_methods(), with = FromIterator::from_iter)]
        methods: Vec<String>,
        #[builder(default = DEFAULT_ENTRY_POINT.to_string())]
        entry_point: String,
        #[builder(default)]
        coverage: MethodCoverage,
    ) -> Result<Self, RubricError> {
        if classes.is_empty() {
            return Err(RubricError::NoClasses);
        }
        if methods.is_empty() {
            return Err(RubricError::NoMethods);
        }

        Ok(Self {
            interface,
            classes,
            methods,
            entry_point,
            coverage,
        })
    }
}

impl Rubric {
    /// Returns the required interface name.
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Returns the required class names.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Returns the required method names.
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// Returns the entry point method name.
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// Returns the method coverage mode.
    pub fn coverage(&self) -> MethodCoverage {
        self.coverage
    }

    /// Returns a copy of this rubric with a different coverage mode.
    pub fn with_coverage(mut self, coverage: MethodCoverage) -> Self {
        self.coverage = coverage;
        self
    }

    /// Whether `name` is one of the rubric methods.
    pub fn is_rubric_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rubric_matches_reference_assignment() {
        let rubric = Rubric::default();
        assert_eq!(rubric.interface(), "AnimalInterface");
        assert_eq!(rubric.classes(), ["Dog", "Cat"]);
        assert_eq!(rubric.methods(), ["sound", "eat"]);
        assert_eq!(rubric.entry_point(), "main");
        assert_eq!(rubric.coverage(), MethodCoverage::Any);
    }

    #[test]
    fn builder_defaults_match_default() {
        assert_eq!(Rubric::builder().build(), Ok(Rubric::default()));
    }

    #[test]
    fn builder_rejects_empty_lists() {
        let no_classes = Rubric::builder().classes(Vec::<String>::new()).build();
        assert_eq!(no_classes, Err(RubricError::NoClasses));

        let no_methods = Rubric::builder()
            .methods(Vec::<String>::new())
            .coverage(MethodCoverage::All)
            .build();
        assert_eq!(no_methods, Err(RubricError::NoMethods));
    }

    #[test]
    fn coverage_parses_aliases() {
        assert_eq!("ANY".parse::<MethodCoverage>().unwrap(), MethodCoverage::Any);
        assert_eq!(" strict ".parse::<MethodCoverage>().unwrap(), MethodCoverage::All);
        assert!("sometimes".parse::<MethodCoverage>().is_err());
    }

    #[test]
    fn coverage_describes_methods() {
        let methods = vec![String::from("sound"), String::from("eat")];
        assert_eq!(MethodCoverage::Any.describe(&methods), "sound or eat");
        assert_eq!(MethodCoverage::All.describe(&methods), "sound and eat");
    }
}

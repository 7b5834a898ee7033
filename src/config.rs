#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::OnceLock;

use anyhow::{Context, Result};

use crate::grade::{MethodCoverage, Rubric};

/// Environment variable naming the required interface.
pub const INTERFACE_VAR: &str = "STRUCTGRADE_INTERFACE";
/// Environment variable listing the required classes, comma separated.
pub const CLASSES_VAR: &str = "STRUCTGRADE_CLASSES";
/// Environment variable listing the required methods, comma separated.
pub const METHODS_VAR: &str = "STRUCTGRADE_METHODS";
/// Environment variable naming the entry point method.
pub const ENTRY_POINT_VAR: &str = "STRUCTGRADE_ENTRY_POINT";
/// Environment variable selecting `any` or `all` method coverage.
pub const METHOD_COVERAGE_VAR: &str = "STRUCTGRADE_METHOD_COVERAGE";

/// Runtime configuration shared across the crate.
#[derive(Debug, Clone)]
pub struct ConfigState {
    /// Rubric assembled from defaults and environment overrides.
    rubric: Rubric,
}

impl ConfigState {
    /// Construct a new configuration instance from the process environment.
    fn new() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construct a configuration from an arbitrary variable lookup; unset or
    /// blank variables keep the rubric defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let defaults = Rubric::default();

        let coverage = match read(METHOD_COVERAGE_VAR) {
            Some(value) => value
                .parse::<MethodCoverage>()
                .with_context(|| format!("Invalid value for {METHOD_COVERAGE_VAR}"))?,
            None => defaults.coverage(),
        };

        let rubric = Rubric::builder()
            .interface(read(INTERFACE_VAR).unwrap_or_else(|| defaults.interface().to_string()))
            .classes(
                read(CLASSES_VAR)
                    .map(|v| split_list(&v))
                    .filter(|list| !list.is_empty())
                    .unwrap_or_else(|| defaults.classes().to_vec()),
            )
            .methods(
                read(METHODS_VAR)
                    .map(|v| split_list(&v))
                    .filter(|list| !list.is_empty())
                    .unwrap_or_else(|| defaults.methods().to_vec()),
            )
            .entry_point(read(ENTRY_POINT_VAR).unwrap_or_else(|| defaults.entry_point().to_string()))
            .coverage(coverage)
            .build()?;

        Ok(Self { rubric })
    }

    /// Returns the configured rubric.
    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }
}

/// Splits a comma separated list, dropping empty entries.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Global storage for the lazily constructed configuration state.
static CONFIG_SLOT: OnceLock<ConfigState> = OnceLock::new();

/// Ensure the global configuration has been initialized and return it.
pub fn ensure_initialized() -> Result<&'static ConfigState> {
    if let Some(cfg) = CONFIG_SLOT.get() {
        return Ok(cfg);
    }

    let cfg = ConfigState::new()?;
    Ok(CONFIG_SLOT.get_or_init(|| cfg))
}

/// Returns the configured rubric.
pub fn rubric() -> Result<Rubric> {
    Ok(ensure_initialized()?.rubric().clone())
}

//! Types for driving module composition.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::module::{ComposeError, ComposedModule};

/// Problems with the module set itself, detected before anything composes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
  #[error("module {0:?} is defined more than once")]
  DuplicateModule(String),

  #[error("module {module:?}: unknown defaults module {defaults:?}")]
  UnknownDefaults { module: String, defaults: String },

  #[error("module {module:?}: {defaults:?} is a {kind} module, not a defaults module")]
  NotDefaults {
    module: String,
    defaults: String,
    kind: String,
  },

  #[error("defaults dependency cycle detected")]
  CycleDetected,
}

/// Why a module produced no property set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleFailure {
  #[error(transparent)]
  Compose(#[from] ComposeError),

  /// The composition task died before reporting a result.
  #[error("module {0:?}: composition task panicked")]
  Panicked(String),
}

/// Outcome of both phases for a whole configuration.
#[derive(Debug, Default, Serialize)]
pub struct DriverResult {
  /// Modules with a final property set.
  pub composed: BTreeMap<String, ComposedModule>,

  /// Modules whose composition failed, with the reason.
  #[serde(serialize_with = "serialize_failures")]
  pub failed: BTreeMap<String, ModuleFailure>,

  /// Modules not composed because a defaults module they depend on failed.
  /// Maps skipped module -> the failed dependency.
  pub skipped: BTreeMap<String, String>,

  /// Number of artifacts recorded by install steps.
  pub installed: usize,
}

impl DriverResult {
  pub fn is_success(&self) -> bool {
    self.failed.is_empty() && self.skipped.is_empty()
  }

  pub fn total(&self) -> usize {
    self.composed.len() + self.failed.len() + self.skipped.len()
  }
}

fn serialize_failures<S>(failures: &BTreeMap<String, ModuleFailure>, serializer: S) -> Result<S::Ok, S::Error>
where
  S: serde::Serializer,
{
  serializer.collect_map(failures.iter().map(|(name, failure)| (name, failure.to_string())))
}

/// Configuration for running the driver.
#[derive(Debug, Clone)]
pub struct DriverConfig {
  /// Maximum number of modules composed in parallel.
  pub parallelism: usize,
}

impl Default for DriverConfig {
  fn default() -> Self {
    Self {
      parallelism: num_cpus(),
    }
  }
}

/// Get the number of CPUs for default parallelism.
fn num_cpus() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn result_success_when_empty() {
    let result = DriverResult::default();
    assert!(result.is_success());
    assert_eq!(result.total(), 0);
  }

  #[test]
  fn result_failure_with_skipped_module() {
    let mut result = DriverResult::default();
    result.skipped.insert("libart".to_string(), "art_defaults".to_string());
    assert!(!result.is_success());
    assert_eq!(result.total(), 1);
  }

  #[test]
  fn failures_serialize_as_messages() {
    let mut result = DriverResult::default();
    result.failed.insert(
      "libart".to_string(),
      ModuleFailure::Compose(ComposeError::UnknownArch {
        module: "libart".to_string(),
        arch: "riscv".to_string(),
      }),
    );

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
      json["failed"]["libart"],
      r#"module "libart": unknown codegen architecture "riscv""#
    );
  }

  #[test]
  fn default_parallelism() {
    assert!(DriverConfig::default().parallelism >= 1);
  }
}

//! Module kinds, definitions and composition errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::props::ModuleProperties;
use super::steps::{InstallStep, LoadStep};
use crate::codegen::CodegenProperties;
use crate::platform::Placement;

/// Errors that abort composition of a single module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
  /// A codegen architecture list named something outside the supported set.
  #[error("module {module:?}: unknown codegen architecture {arch:?}")]
  UnknownArch { module: String, arch: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
  /// Plain defaults: codegen fragments only.
  Defaults,
  /// Defaults carrying the global, device and host flags.
  GlobalDefaults,
  /// Defaults adding the debug optimization flag.
  DebugDefaults,
  Library,
  Binary,
  Test,
  TestLibrary,
}

impl ModuleKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Defaults => "defaults",
      Self::GlobalDefaults => "global_defaults",
      Self::DebugDefaults => "debug_defaults",
      Self::Library => "library",
      Self::Binary => "binary",
      Self::Test => "test",
      Self::TestLibrary => "test_library",
    }
  }

  /// Whether other modules may list this one under `defaults`.
  pub fn is_defaults(&self) -> bool {
    matches!(self, Self::Defaults | Self::GlobalDefaults | Self::DebugDefaults)
  }

  /// Whether codegen fragments contribute their static and shared library lists.
  pub fn links_as_library(&self) -> bool {
    !matches!(self, Self::Binary | Self::Test)
  }

  /// Steps run in the load phase, in order.
  pub fn load_steps(&self) -> Vec<LoadStep> {
    let codegen = LoadStep::Codegen {
      link_libs: self.links_as_library(),
    };
    match self {
      Self::Defaults | Self::Library | Self::TestLibrary => vec![codegen],
      Self::GlobalDefaults => vec![codegen, LoadStep::DefaultFlags],
      Self::DebugDefaults => vec![codegen, LoadStep::DebugFlags],
      Self::Binary | Self::Test => vec![codegen, LoadStep::CustomLinker, LoadStep::Prefer32Bit],
    }
  }

  /// Steps run in the install phase, in order.
  pub fn install_steps(&self) -> Vec<InstallStep> {
    match self {
      Self::Test | Self::TestLibrary => vec![InstallStep::RecordTest],
      _ => Vec::new(),
    }
  }
}

impl fmt::Display for ModuleKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

fn default_true() -> bool {
  true
}

/// A module as declared in a build file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDef {
  pub name: String,
  pub kind: ModuleKind,
  /// Defaults modules whose final properties are applied first, in order.
  #[serde(default)]
  pub defaults: Vec<String>,
  #[serde(default = "default_true")]
  pub host_supported: bool,
  #[serde(default = "default_true")]
  pub device_supported: bool,
  #[serde(default)]
  pub properties: ModuleProperties,
  #[serde(default)]
  pub codegen: CodegenProperties,
}

impl ModuleDef {
  pub fn new(name: impl Into<String>, kind: ModuleKind) -> Self {
    Self {
      name: name.into(),
      kind,
      defaults: Vec::new(),
      host_supported: true,
      device_supported: true,
      properties: ModuleProperties::default(),
      codegen: CodegenProperties::default(),
    }
  }

  pub fn defaults(name: impl Into<String>) -> Self {
    Self::new(name, ModuleKind::Defaults)
  }

  pub fn global_defaults(name: impl Into<String>) -> Self {
    Self::new(name, ModuleKind::GlobalDefaults)
  }

  pub fn debug_defaults(name: impl Into<String>) -> Self {
    Self::new(name, ModuleKind::DebugDefaults)
  }

  pub fn library(name: impl Into<String>) -> Self {
    Self::new(name, ModuleKind::Library)
  }

  pub fn binary(name: impl Into<String>) -> Self {
    Self::new(name, ModuleKind::Binary)
  }

  pub fn test(name: impl Into<String>) -> Self {
    Self::new(name, ModuleKind::Test)
  }

  pub fn test_library(name: impl Into<String>) -> Self {
    Self::new(name, ModuleKind::TestLibrary)
  }

  pub fn with_defaults<I, S>(mut self, defaults: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.defaults.extend(defaults.into_iter().map(Into::into));
    self
  }

  pub fn with_placements(mut self, host_supported: bool, device_supported: bool) -> Self {
    self.host_supported = host_supported;
    self.device_supported = device_supported;
    self
  }

  pub fn properties_mut(&mut self) -> &mut ModuleProperties {
    &mut self.properties
  }

  pub fn codegen_mut(&mut self) -> &mut CodegenProperties {
    &mut self.codegen
  }

  pub fn supports(&self, placement: Placement) -> bool {
    match placement {
      Placement::Host => self.host_supported,
      Placement::Device => self.device_supported,
    }
  }
}

//! Module assembly.
//!
//! Composition is split in two phases. At definition time a
//! [`PendingModule`] records the ordered steps its kind needs. Once the whole
//! configuration is known the driver composes it, consuming the pending
//! module so that no step can run twice, and later runs the install steps of
//! the resulting [`ComposedModule`].

pub mod install;
pub mod props;
pub mod steps;
pub mod types;

use serde::Serialize;
use tracing::debug;

use crate::context::BuildContext;
use crate::platform::Placement;

pub use install::{Installer, LayoutInstaller};
pub use props::{ModuleProperties, PlacementProperties, TargetProperties};
pub use steps::{InstallStep, LoadStep};
pub use types::{ComposeError, ModuleDef, ModuleKind};

/// A module whose load steps have not run yet.
#[derive(Debug, Clone)]
pub struct PendingModule {
  def: ModuleDef,
  load: Vec<LoadStep>,
  install: Vec<InstallStep>,
}

impl PendingModule {
  pub fn new(def: ModuleDef) -> Self {
    let load = def.kind.load_steps();
    let install = def.kind.install_steps();
    Self { def, load, install }
  }

  pub fn def(&self) -> &ModuleDef {
    &self.def
  }

  pub fn name(&self) -> &str {
    &self.def.name
  }

  pub fn load_steps(&self) -> &[LoadStep] {
    &self.load
  }

  /// Runs the load steps.
  ///
  /// The result is `inherited` (the final properties of each defaults module,
  /// in order), then the module's declared properties, then whatever the
  /// steps append. On error nothing is returned for the module.
  pub fn compose(self, ctx: &BuildContext, inherited: &[&ModuleProperties]) -> Result<ComposedModule, ComposeError> {
    let mut properties = ModuleProperties::default();
    for base in inherited {
      properties.append(base);
    }
    properties.append(&self.def.properties);

    for step in &self.load {
      step.apply(&self.def, ctx, &mut properties)?;
    }

    debug!(module = %self.def.name, kind = %self.def.kind, "composed module");

    let placements = Placement::ALL
      .into_iter()
      .filter(|placement| self.def.supports(*placement))
      .collect();

    Ok(ComposedModule {
      name: self.def.name,
      kind: self.def.kind,
      placements,
      properties,
      install: self.install,
    })
  }
}

/// A module with its final property set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedModule {
  pub name: String,
  pub kind: ModuleKind,
  pub placements: Vec<Placement>,
  pub properties: ModuleProperties,
  #[serde(skip)]
  install: Vec<InstallStep>,
}

impl ComposedModule {
  pub fn install_steps(&self) -> &[InstallStep] {
    &self.install
  }

  /// Runs the install steps; returns the number of artifacts recorded.
  pub fn install(&self, ctx: &BuildContext, installer: &dyn Installer) -> usize {
    self
      .install
      .iter()
      .map(|step| step.run(&self.name, &self.placements, ctx, installer))
      .sum()
  }
}

//! Where installed artifacts land.

use std::path::PathBuf;

use crate::platform::{Arch, Placement};

/// Decides the install location of a module variant.
pub trait Installer: Send + Sync {
  fn install_path(&self, placement: Placement, arch: Arch, module: &str) -> PathBuf;
}

/// `<root>/<placement>/<arch>/<module>/<module>`
#[derive(Debug, Clone)]
pub struct LayoutInstaller {
  root: PathBuf,
}

impl LayoutInstaller {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }
}

impl Installer for LayoutInstaller {
  fn install_path(&self, placement: Placement, arch: Arch, module: &str) -> PathBuf {
    self
      .root
      .join(placement.tag())
      .join(arch.as_str())
      .join(module)
      .join(module)
  }
}

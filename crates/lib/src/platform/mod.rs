//! Platform facts supplied by the host build system.
//!
//! These are treated as given: which sanitizers are active, where the boot
//! image is based, which architectures the device is built for and whether
//! the platform supports the concurrent read barrier.

pub mod arch;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use arch::{Arch, UnknownArch};

/// Whether something applies to the host build or to the device build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
  Host,
  Device,
}

impl Placement {
  pub const ALL: [Placement; 2] = [Placement::Host, Placement::Device];

  /// Tag used in test registry keys.
  pub fn tag(&self) -> &'static str {
    match self {
      Self::Host => "host",
      Self::Device => "device",
    }
  }
}

impl fmt::Display for Placement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.tag())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformFacts {
  /// Primary and secondary device architectures.
  pub device_arches: Vec<Arch>,
  /// Architectures host variants are built and installed for.
  pub host_variant_arches: Vec<Arch>,
  pub sanitize_device: Vec<String>,
  pub sanitize_host: Vec<String>,
  pub device_base_address: String,
  pub host_base_address: String,
  pub read_barrier_capable: bool,
}

impl Default for PlatformFacts {
  fn default() -> Self {
    Self {
      device_arches: vec![Arch::Arm64, Arch::Arm],
      host_variant_arches: vec![Arch::X86, Arch::X86_64],
      sanitize_device: Vec::new(),
      sanitize_host: Vec::new(),
      device_base_address: "0x70000000".to_string(),
      host_base_address: "0x60000000".to_string(),
      read_barrier_capable: true,
    }
  }
}

impl PlatformFacts {
  pub fn sanitized(&self, placement: Placement) -> bool {
    match placement {
      Placement::Host => !self.sanitize_host.is_empty(),
      Placement::Device => !self.sanitize_device.is_empty(),
    }
  }

  pub fn base_address(&self, placement: Placement) -> &str {
    match placement {
      Placement::Host => &self.host_base_address,
      Placement::Device => &self.device_base_address,
    }
  }

  /// Architectures a module is compiled and installed for on `placement`.
  pub fn variant_arches(&self, placement: Placement) -> &[Arch] {
    match placement {
      Placement::Host => &self.host_variant_arches,
      Placement::Device => &self.device_arches,
    }
  }
}

//! Typed module property sets.
//!
//! Properties are only ever combined by field-wise concatenation. Scalar
//! properties take the appended value when it is set.

use serde::{Deserialize, Serialize};

use crate::codegen::ArchFragment;
use crate::flags::FlagSet;
use crate::platform::Placement;

/// Properties scoped to one placement (`target.android` or `target.host`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementProperties {
  #[serde(skip_serializing_if = "FlagSet::is_empty")]
  pub cflags: FlagSet,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub srcs: Vec<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub whole_static_libs: Vec<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub shared_libs: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub compile_multilib: Option<String>,
}

impl PlacementProperties {
  pub fn append(&mut self, other: &PlacementProperties) {
    self.cflags.extend_from(&other.cflags);
    self.srcs.extend(other.srcs.iter().cloned());
    self.whole_static_libs.extend(other.whole_static_libs.iter().cloned());
    self.shared_libs.extend(other.shared_libs.iter().cloned());
    if other.compile_multilib.is_some() {
      self.compile_multilib.clone_from(&other.compile_multilib);
    }
  }

  /// Appends an architecture fragment. Library lists are only taken when the
  /// module links as a library.
  pub fn append_fragment(&mut self, fragment: &ArchFragment, link_libs: bool) {
    self.srcs.extend(fragment.srcs.iter().cloned());
    self.cflags.extend_from(&fragment.cflags);
    if link_libs {
      self
        .whole_static_libs
        .extend(fragment.static_link.whole_static_libs.iter().cloned());
      self.shared_libs.extend(fragment.shared_link.shared_libs.iter().cloned());
    }
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetProperties {
  #[serde(skip_serializing_if = "PlacementProperties::is_empty")]
  pub android: PlacementProperties,
  #[serde(skip_serializing_if = "PlacementProperties::is_empty")]
  pub host: PlacementProperties,
}

impl TargetProperties {
  pub fn placement(&self, placement: Placement) -> &PlacementProperties {
    match placement {
      Placement::Device => &self.android,
      Placement::Host => &self.host,
    }
  }

  pub fn placement_mut(&mut self, placement: Placement) -> &mut PlacementProperties {
    match placement {
      Placement::Device => &mut self.android,
      Placement::Host => &mut self.host,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.android.is_empty() && self.host.is_empty()
  }
}

/// The accumulated property set of a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleProperties {
  #[serde(skip_serializing_if = "FlagSet::is_empty")]
  pub cflags: FlagSet,
  #[serde(skip_serializing_if = "FlagSet::is_empty")]
  pub asflags: FlagSet,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub srcs: Vec<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub whole_static_libs: Vec<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub shared_libs: Vec<String>,
  #[serde(skip_serializing_if = "TargetProperties::is_empty")]
  pub target: TargetProperties,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dynamic_linker: Option<String>,
}

impl ModuleProperties {
  pub fn append(&mut self, other: &ModuleProperties) {
    self.cflags.extend_from(&other.cflags);
    self.asflags.extend_from(&other.asflags);
    self.srcs.extend(other.srcs.iter().cloned());
    self.whole_static_libs.extend(other.whole_static_libs.iter().cloned());
    self.shared_libs.extend(other.shared_libs.iter().cloned());
    self.target.android.append(&other.target.android);
    self.target.host.append(&other.target.host);
    if other.dynamic_linker.is_some() {
      self.dynamic_linker.clone_from(&other.dynamic_linker);
    }
  }

  /// Flags the compiler sees for `placement`: global flags followed by the
  /// placement's own.
  pub fn effective_cflags(&self, placement: Placement) -> FlagSet {
    let mut flags = self.cflags.clone();
    flags.extend_from(&self.target.placement(placement).cflags);
    flags
  }
}

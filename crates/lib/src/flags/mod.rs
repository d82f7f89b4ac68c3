//! Compiler and assembler flag composition.
//!
//! Flags are derived from knobs and platform facts for three contexts:
//! global (every placement), device and host. Every list is append-only and
//! its order is significant, since later flags override earlier ones at the
//! compiler level.

pub mod global;
pub mod placement;

use serde::{Deserialize, Serialize};

use crate::knob::Knobs;
use crate::platform::PlatformFacts;

pub use global::{GlobalFlags, ReadBarrierType, debug_flags, global_flags};
pub use placement::{device_flags, frame_size_limit, host_flags};

/// Ordered list of flags. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet(Vec<String>);

impl FlagSet {
  pub fn new() -> Self {
    Self(Vec::new())
  }

  pub fn push(&mut self, flag: impl Into<String>) {
    self.0.push(flag.into());
  }

  pub fn extend_from(&mut self, other: &FlagSet) {
    self.0.extend(other.0.iter().cloned());
  }

  pub fn contains(&self, flag: &str) -> bool {
    self.0.iter().any(|f| f == flag)
  }

  /// Index of the first occurrence of `flag`.
  pub fn position(&self, flag: &str) -> Option<usize> {
    self.0.iter().position(|f| f == flag)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, String> {
    self.0.iter()
  }

  pub fn as_slice(&self) -> &[String] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl From<Vec<String>> for FlagSet {
  fn from(flags: Vec<String>) -> Self {
    Self(flags)
  }
}

impl<S: Into<String>> FromIterator<S> for FlagSet {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self(iter.into_iter().map(Into::into).collect())
  }
}

impl<'a> IntoIterator for &'a FlagSet {
  type Item = &'a String;
  type IntoIter = std::slice::Iter<'a, String>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}

/// The flag bundle applied by global defaults modules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultFlags {
  pub global: GlobalFlags,
  pub device: FlagSet,
  pub host: FlagSet,
}

impl DefaultFlags {
  pub fn compose(knobs: &Knobs, facts: &PlatformFacts) -> Self {
    Self {
      global: global_flags(knobs, facts),
      device: device_flags(knobs, facts),
      host: host_flags(knobs, facts),
    }
  }
}

//! Codegen architecture selection and per-architecture property merge.
//!
//! A module lists property fragments per architecture under `codegen`. The
//! fragments of the architectures selected for each placement are appended to
//! the module's `target.android` and `target.host` buckets; fragments of other
//! architectures are simply never merged.

pub mod merge;
pub mod select;

use serde::Serialize;

use crate::knob::Knobs;
use crate::platform::PlatformFacts;

pub use merge::{ArchFragment, CodegenProperties, SharedProperties, StaticProperties, merge_codegen};
pub use select::{select_device_arches, select_host_arches};

/// The codegen architecture lists for one configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodegenArches {
  pub device: Vec<String>,
  pub host: Vec<String>,
}

impl CodegenArches {
  pub fn resolve(knobs: &Knobs, facts: &PlatformFacts) -> Self {
    Self {
      device: select_device_arches(knobs, facts),
      host: select_host_arches(knobs),
    }
  }
}

//! Codegen architecture selection.
//!
//! Override lists are used verbatim: names are not checked against [`Arch`]
//! here, the merge step rejects unknown ones.

use std::collections::BTreeSet;

use crate::knob::{Knobs, names};
use crate::platform::{Arch, PlatformFacts};

fn split_override(knobs: &Knobs, name: &str) -> Option<Vec<String>> {
  knobs
    .string_opt(name)
    .map(|list| list.split_whitespace().map(str::to_string).collect::<Vec<_>>())
    .filter(|list| !list.is_empty())
}

/// Device codegen architectures.
///
/// Without an override, every configured device architecture is included
/// together with the 32-bit companion of each 64-bit one, sorted.
pub fn select_device_arches(knobs: &Knobs, facts: &PlatformFacts) -> Vec<String> {
  if let Some(list) = split_override(knobs, names::ART_TARGET_CODEGEN_ARCHS) {
    return list;
  }

  let mut arches = BTreeSet::new();
  for arch in &facts.device_arches {
    arches.insert(*arch);
    if let Some(companion) = arch.companion_32bit() {
      arches.insert(companion);
    }
  }
  arches.into_iter().map(|arch| arch.as_str().to_string()).collect()
}

/// Host codegen architectures, defaulting to every supported architecture.
pub fn select_host_arches(knobs: &Knobs) -> Vec<String> {
  split_override(knobs, names::ART_HOST_CODEGEN_ARCHS)
    .unwrap_or_else(|| Arch::ALL.iter().map(|arch| arch.as_str().to_string()).collect())
}

//! Flags shared by every placement.

use tracing::warn;

use super::FlagSet;
use crate::knob::{Knobs, names};
use crate::platform::PlatformFacts;

pub const DEFAULT_NDEBUG_OPT_FLAG: &str = "-O3";
pub const DEFAULT_DEBUG_OPT_FLAG: &str = "-O2";
pub const DEFAULT_GC_TYPE: &str = "CMS";
pub const DEBUG_GC_TYPE: &str = "SS";
pub const DEFAULT_IMT_SIZE: &str = "43";

/// Compiler and assembler flags for every placement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalFlags {
  pub cflags: FlagSet,
  pub asflags: FlagSet,
}

/// Read barrier variants the runtime knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadBarrierType {
  #[default]
  Baker,
  Brooks,
  TableLookup,
}

impl ReadBarrierType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Baker => "BAKER",
      Self::Brooks => "BROOKS",
      Self::TableLookup => "TABLELOOKUP",
    }
  }

  /// Case-sensitive; `None` for names outside the known set.
  pub fn parse(value: &str) -> Option<Self> {
    match value {
      "BAKER" => Some(Self::Baker),
      "BROOKS" => Some(Self::Brooks),
      "TABLELOOKUP" => Some(Self::TableLookup),
      _ => None,
    }
  }
}

/// Composes the global compiler and assembler flags.
///
/// The read barrier needs both the knob not being explicitly `false` and the
/// platform reporting the capability.
pub fn global_flags(knobs: &Knobs, facts: &PlatformFacts) -> GlobalFlags {
  let mut cflags = FlagSet::new();
  let mut asflags = FlagSet::new();

  cflags.push(knobs.string(names::ART_NDEBUG_OPT_FLAG, DEFAULT_NDEBUG_OPT_FLAG));

  let mut gc_type = knobs.string(names::ART_DEFAULT_GC_TYPE, DEFAULT_GC_TYPE);
  let mut tlab = false;
  if knobs.is_true(names::ART_TEST_DEBUG_GC) {
    gc_type = DEBUG_GC_TYPE.to_string();
    tlab = true;
  }

  cflags.push(format!("-DART_DEFAULT_GC_TYPE_IS_{}", gc_type));
  if tlab {
    cflags.push("-DART_USE_TLAB=1");
  }

  let imt_size = knobs.string(names::ART_IMT_SIZE, DEFAULT_IMT_SIZE);
  cflags.push(format!("-DIMT_SIZE={}", imt_size));

  if knobs.tristate(names::ART_ENABLE_VDEX).is_not_false() {
    cflags.push("-DART_ENABLE_VDEX");
  }

  if knobs.is_true(names::ART_HEAP_POISONING) {
    cflags.push("-DART_HEAP_POISONING=1");
    asflags.push("-DART_HEAP_POISONING=1");
  }

  if knobs.tristate(names::ART_USE_READ_BARRIER).is_not_false() && facts.read_barrier_capable {
    let barrier_type = knobs.string(names::ART_READ_BARRIER_TYPE, ReadBarrierType::default().as_str());
    if ReadBarrierType::parse(&barrier_type).is_none() {
      warn!(barrier_type = %barrier_type, "unrecognised read barrier type");
    }

    let barrier_define = format!("-DART_READ_BARRIER_TYPE_IS_{}=1", barrier_type);
    for flags in [&mut cflags, &mut asflags] {
      flags.push("-DART_USE_READ_BARRIER=1");
      flags.push(barrier_define.clone());
    }
  }

  if knobs.is_true(names::ART_USE_OLD_ARM_BACKEND) {
    cflags.push("-DART_USE_OLD_ARM_BACKEND=1");
    asflags.push("-DART_USE_OLD_ARM_BACKEND=1");
  }

  GlobalFlags { cflags, asflags }
}

/// Flags appended by debug defaults, on top of the global ones.
pub fn debug_flags(knobs: &Knobs) -> FlagSet {
  let mut cflags = FlagSet::new();
  cflags.push(knobs.string(names::ART_DEBUG_OPT_FLAG, DEFAULT_DEBUG_OPT_FLAG));
  cflags
}

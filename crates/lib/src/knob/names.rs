//! Recognised knob names.

pub const ART_DEFAULT_GC_TYPE: &str = "ART_DEFAULT_GC_TYPE";
pub const ART_TEST_DEBUG_GC: &str = "ART_TEST_DEBUG_GC";
pub const ART_IMT_SIZE: &str = "ART_IMT_SIZE";
pub const ART_HEAP_POISONING: &str = "ART_HEAP_POISONING";
pub const ART_USE_READ_BARRIER: &str = "ART_USE_READ_BARRIER";
pub const ART_READ_BARRIER_TYPE: &str = "ART_READ_BARRIER_TYPE";
pub const ART_USE_OLD_ARM_BACKEND: &str = "ART_USE_OLD_ARM_BACKEND";
pub const ART_ENABLE_VDEX: &str = "ART_ENABLE_VDEX";
pub const ART_NDEBUG_OPT_FLAG: &str = "ART_NDEBUG_OPT_FLAG";
pub const ART_DEBUG_OPT_FLAG: &str = "ART_DEBUG_OPT_FLAG";
pub const ART_TARGET_LINUX: &str = "ART_TARGET_LINUX";
pub const LIBART_IMG_TARGET_MIN_BASE_ADDRESS_DELTA: &str = "LIBART_IMG_TARGET_MIN_BASE_ADDRESS_DELTA";
pub const LIBART_IMG_TARGET_MAX_BASE_ADDRESS_DELTA: &str = "LIBART_IMG_TARGET_MAX_BASE_ADDRESS_DELTA";
pub const LIBART_IMG_HOST_MIN_BASE_ADDRESS_DELTA: &str = "LIBART_IMG_HOST_MIN_BASE_ADDRESS_DELTA";
pub const LIBART_IMG_HOST_MAX_BASE_ADDRESS_DELTA: &str = "LIBART_IMG_HOST_MAX_BASE_ADDRESS_DELTA";
pub const ART_HOST_CODEGEN_ARCHS: &str = "ART_HOST_CODEGEN_ARCHS";
pub const ART_TARGET_CODEGEN_ARCHS: &str = "ART_TARGET_CODEGEN_ARCHS";
pub const CUSTOM_TARGET_LINKER: &str = "CUSTOM_TARGET_LINKER";
pub const HOST_PREFER_32_BIT: &str = "HOST_PREFER_32_BIT";

/// How a knob is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnobKind {
  /// Tri-state boolean.
  Bool,
  /// String with an optional default.
  String,
}

impl KnobKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Bool => "bool",
      Self::String => "string",
    }
  }
}

/// Description of a recognised knob.
#[derive(Debug, Clone, Copy)]
pub struct KnobInfo {
  pub name: &'static str,
  pub kind: KnobKind,
  /// Value used when unset. `None` means the knob has no effect when unset.
  pub default: Option<&'static str>,
  pub effect: &'static str,
}

const fn knob(name: &'static str, kind: KnobKind, default: Option<&'static str>, effect: &'static str) -> KnobInfo {
  KnobInfo {
    name,
    kind,
    default,
    effect,
  }
}

pub const ALL: &[KnobInfo] = &[
  knob(ART_DEFAULT_GC_TYPE, KnobKind::String, Some("CMS"), "default garbage collector type"),
  knob(ART_TEST_DEBUG_GC, KnobKind::Bool, None, "forces the SS collector and enables TLAB"),
  knob(ART_IMT_SIZE, KnobKind::String, Some("43"), "interface method table size"),
  knob(ART_HEAP_POISONING, KnobKind::Bool, None, "heap reference poisoning"),
  knob(ART_USE_READ_BARRIER, KnobKind::Bool, Some("true"), "concurrent copying read barrier"),
  knob(ART_READ_BARRIER_TYPE, KnobKind::String, Some("BAKER"), "read barrier variant"),
  knob(ART_USE_OLD_ARM_BACKEND, KnobKind::Bool, None, "legacy ARM code generator"),
  knob(ART_ENABLE_VDEX, KnobKind::Bool, Some("true"), "vdex secondary artifact format"),
  knob(ART_NDEBUG_OPT_FLAG, KnobKind::String, Some("-O3"), "optimization flag for release builds"),
  knob(ART_DEBUG_OPT_FLAG, KnobKind::String, Some("-O2"), "optimization flag for debug builds"),
  knob(ART_TARGET_LINUX, KnobKind::Bool, None, "targets Linux instead of Android"),
  knob(LIBART_IMG_TARGET_MIN_BASE_ADDRESS_DELTA, KnobKind::String, Some("-0x1000000"), "device image min base delta"),
  knob(LIBART_IMG_TARGET_MAX_BASE_ADDRESS_DELTA, KnobKind::String, Some("0x1000000"), "device image max base delta"),
  knob(LIBART_IMG_HOST_MIN_BASE_ADDRESS_DELTA, KnobKind::String, Some("-0x1000000"), "host image min base delta"),
  knob(LIBART_IMG_HOST_MAX_BASE_ADDRESS_DELTA, KnobKind::String, Some("0x1000000"), "host image max base delta"),
  knob(ART_HOST_CODEGEN_ARCHS, KnobKind::String, None, "space-separated host codegen architectures"),
  knob(ART_TARGET_CODEGEN_ARCHS, KnobKind::String, None, "space-separated device codegen architectures"),
  knob(CUSTOM_TARGET_LINKER, KnobKind::String, None, "dynamic linker override for executables"),
  knob(HOST_PREFER_32_BIT, KnobKind::Bool, None, "prefer 32-bit host multilib"),
];

/// Looks up a recognised knob by name.
pub fn lookup(name: &str) -> Option<&'static KnobInfo> {
  ALL.iter().find(|info| info.name == name)
}

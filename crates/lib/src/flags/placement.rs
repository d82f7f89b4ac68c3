//! Device and host specific flags.

use super::FlagSet;
use crate::knob::{Knobs, names};
use crate::platform::{Placement, PlatformFacts};

pub const DEFAULT_FRAME_SIZE_LIMIT: u32 = 1736;
pub const DEVICE_SANITIZED_FRAME_SIZE_LIMIT: u32 = 7400;
pub const HOST_SANITIZED_FRAME_SIZE_LIMIT: u32 = 6400;

pub const DEFAULT_MIN_BASE_ADDRESS_DELTA: &str = "-0x1000000";
pub const DEFAULT_MAX_BASE_ADDRESS_DELTA: &str = "0x1000000";

/// Stack frame size limit for `placement`, raised when a sanitizer is active.
pub fn frame_size_limit(placement: Placement, facts: &PlatformFacts) -> u32 {
  match (placement, facts.sanitized(placement)) {
    (_, false) => DEFAULT_FRAME_SIZE_LIMIT,
    (Placement::Device, true) => DEVICE_SANITIZED_FRAME_SIZE_LIMIT,
    (Placement::Host, true) => HOST_SANITIZED_FRAME_SIZE_LIMIT,
  }
}

fn push_frame_size(cflags: &mut FlagSet, limit: u32) {
  cflags.push(format!("-Wframe-larger-than={}", limit));
  cflags.push(format!("-DART_FRAME_SIZE_LIMIT={}", limit));
}

fn push_base_address_deltas(cflags: &mut FlagSet, knobs: &Knobs, min_knob: &str, max_knob: &str) {
  let min_delta = knobs.string(min_knob, DEFAULT_MIN_BASE_ADDRESS_DELTA);
  let max_delta = knobs.string(max_knob, DEFAULT_MAX_BASE_ADDRESS_DELTA);
  cflags.push(format!("-DART_BASE_ADDRESS_MIN_DELTA={}", min_delta));
  cflags.push(format!("-DART_BASE_ADDRESS_MAX_DELTA={}", max_delta));
}

/// Device cflags: frame-size limit, base address, the target OS marker
/// (`-DART_TARGET_LINUX` or `-DART_TARGET_ANDROID`) and any base-address deltas.
pub fn device_flags(knobs: &Knobs, facts: &PlatformFacts) -> FlagSet {
  let mut cflags = FlagSet::new();

  push_frame_size(&mut cflags, frame_size_limit(Placement::Device, facts));

  cflags.push(format!("-DART_BASE_ADDRESS={}", facts.base_address(Placement::Device)));
  if knobs.is_true(names::ART_TARGET_LINUX) {
    cflags.push("-DART_TARGET_LINUX");
  } else {
    cflags.push("-DART_TARGET_ANDROID");
  }

  push_base_address_deltas(
    &mut cflags,
    knobs,
    names::LIBART_IMG_TARGET_MIN_BASE_ADDRESS_DELTA,
    names::LIBART_IMG_TARGET_MAX_BASE_ADDRESS_DELTA,
  );

  cflags
}

/// Host cflags. Same as the device set minus the target marker.
pub fn host_flags(knobs: &Knobs, facts: &PlatformFacts) -> FlagSet {
  let mut cflags = FlagSet::new();

  push_frame_size(&mut cflags, frame_size_limit(Placement::Host, facts));

  cflags.push(format!("-DART_BASE_ADDRESS={}", facts.base_address(Placement::Host)));

  push_base_address_deltas(
    &mut cflags,
    knobs,
    names::LIBART_IMG_HOST_MIN_BASE_ADDRESS_DELTA,
    names::LIBART_IMG_HOST_MAX_BASE_ADDRESS_DELTA,
  );

  cflags
}

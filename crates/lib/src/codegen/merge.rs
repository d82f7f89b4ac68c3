//! Per-architecture property fragments and their merge into a module.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::CodegenArches;
use crate::flags::FlagSet;
use crate::module::props::TargetProperties;
use crate::module::types::ComposeError;
use crate::platform::{Arch, Placement};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticProperties {
  pub whole_static_libs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedProperties {
  pub shared_libs: Vec<String>,
}

/// Properties that only apply when code is generated for one architecture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchFragment {
  pub srcs: Vec<String>,
  pub cflags: FlagSet,
  #[serde(rename = "static")]
  pub static_link: StaticProperties,
  #[serde(rename = "shared")]
  pub shared_link: SharedProperties,
}

/// One fragment slot per supported architecture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenProperties {
  pub arm: ArchFragment,
  pub arm64: ArchFragment,
  pub mips: ArchFragment,
  pub mips64: ArchFragment,
  pub x86: ArchFragment,
  pub x86_64: ArchFragment,
}

impl CodegenProperties {
  pub fn fragment(&self, arch: Arch) -> &ArchFragment {
    match arch {
      Arch::Arm => &self.arm,
      Arch::Arm64 => &self.arm64,
      Arch::Mips => &self.mips,
      Arch::Mips64 => &self.mips64,
      Arch::X86 => &self.x86,
      Arch::X86_64 => &self.x86_64,
    }
  }

  pub fn fragment_mut(&mut self, arch: Arch) -> &mut ArchFragment {
    match arch {
      Arch::Arm => &mut self.arm,
      Arch::Arm64 => &mut self.arm64,
      Arch::Mips => &mut self.mips,
      Arch::Mips64 => &mut self.mips64,
      Arch::X86 => &mut self.x86,
      Arch::X86_64 => &mut self.x86_64,
    }
  }
}

fn resolve<'a>(
  module: &str,
  codegen: &'a CodegenProperties,
  names: &[String],
) -> Result<Vec<&'a ArchFragment>, ComposeError> {
  names
    .iter()
    .map(|name| {
      name
        .parse::<Arch>()
        .map(|arch| codegen.fragment(arch))
        .map_err(|_| ComposeError::UnknownArch {
          module: module.to_string(),
          arch: name.clone(),
        })
    })
    .collect()
}

/// Merges the fragments of the selected architectures into `target`.
///
/// Device fragments go to `target.android`, host fragments to `target.host`,
/// in list order. Every name is resolved before anything is appended, so an
/// unknown architecture leaves `target` untouched.
pub fn merge_codegen(
  module: &str,
  codegen: &CodegenProperties,
  arches: &CodegenArches,
  link_libs: bool,
  target: &mut TargetProperties,
) -> Result<(), ComposeError> {
  let device = resolve(module, codegen, &arches.device)?;
  let host = resolve(module, codegen, &arches.host)?;

  for (placement, fragments) in [(Placement::Device, device), (Placement::Host, host)] {
    let bucket = target.placement_mut(placement);
    for fragment in fragments {
      bucket.append_fragment(fragment, link_libs);
    }
  }

  debug!(
    module,
    device = ?arches.device,
    host = ?arches.host,
    "merged codegen fragments"
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn arches(device: &[&str], host: &[&str]) -> CodegenArches {
    CodegenArches {
      device: device.iter().map(|s| s.to_string()).collect(),
      host: host.iter().map(|s| s.to_string()).collect(),
    }
  }

  fn codegen() -> CodegenProperties {
    let mut codegen = CodegenProperties::default();
    for arch in Arch::ALL {
      let fragment = codegen.fragment_mut(arch);
      fragment.srcs.push(format!("arch/{}/entrypoints.cc", arch));
      fragment.cflags.push(format!("-DCODEGEN_{}", arch.as_str().to_uppercase()));
      fragment.static_link.whole_static_libs.push(format!("libvixl-{}", arch));
      fragment.shared_link.shared_libs.push(format!("libart-disassembler-{}", arch));
    }
    codegen
  }

  #[test]
  fn device_and_host_go_to_their_buckets() {
    let mut target = TargetProperties::default();
    merge_codegen("libart", &codegen(), &arches(&["arm", "arm64"], &["x86"]), true, &mut target).unwrap();

    assert_eq!(target.android.srcs, vec!["arch/arm/entrypoints.cc", "arch/arm64/entrypoints.cc"]);
    assert_eq!(target.android.cflags.as_slice(), ["-DCODEGEN_ARM", "-DCODEGEN_ARM64"]);
    assert_eq!(target.android.whole_static_libs, vec!["libvixl-arm", "libvixl-arm64"]);
    assert_eq!(target.host.srcs, vec!["arch/x86/entrypoints.cc"]);
    assert_eq!(target.host.shared_libs, vec!["libart-disassembler-x86"]);
  }

  #[test]
  fn merge_follows_list_order() {
    let mut target = TargetProperties::default();
    merge_codegen("libart", &codegen(), &arches(&[], &["x86_64", "arm"]), true, &mut target).unwrap();
    assert_eq!(target.host.srcs, vec!["arch/x86_64/entrypoints.cc", "arch/arm/entrypoints.cc"]);
  }

  #[test]
  fn merge_is_additive() {
    let mut target = TargetProperties::default();
    target.android.srcs.push("runtime.cc".to_string());
    target.android.cflags.push("-DEXISTING");

    merge_codegen("libart", &codegen(), &arches(&["arm"], &[]), true, &mut target).unwrap();

    assert_eq!(target.android.srcs, vec!["runtime.cc", "arch/arm/entrypoints.cc"]);
    assert_eq!(target.android.cflags.as_slice(), ["-DEXISTING", "-DCODEGEN_ARM"]);
  }

  #[test]
  fn unselected_fragments_are_not_merged() {
    let mut target = TargetProperties::default();
    merge_codegen("libart", &codegen(), &arches(&["arm64"], &["x86_64"]), true, &mut target).unwrap();
    assert!(!target.android.srcs.iter().any(|s| s.contains("mips")));
    assert!(!target.host.srcs.iter().any(|s| s.contains("arm")));
  }

  #[test]
  fn executables_ignore_library_lists() {
    let mut target = TargetProperties::default();
    merge_codegen("dex2oat", &codegen(), &arches(&["arm"], &["x86"]), false, &mut target).unwrap();
    assert_eq!(target.android.srcs.len(), 1);
    assert!(target.android.whole_static_libs.is_empty());
    assert!(target.host.shared_libs.is_empty());
  }

  #[test]
  fn unknown_device_arch_fails_without_touching_target() {
    let mut target = TargetProperties::default();
    target.android.srcs.push("runtime.cc".to_string());
    let before = target.clone();

    let err = merge_codegen("libart", &codegen(), &arches(&["arm", "riscv"], &["x86"]), true, &mut target).unwrap_err();

    assert_eq!(
      err,
      ComposeError::UnknownArch {
        module: "libart".to_string(),
        arch: "riscv".to_string(),
      }
    );
    assert_eq!(target, before);
  }

  #[test]
  fn unknown_host_arch_fails_without_touching_device_bucket() {
    let mut target = TargetProperties::default();
    let err = merge_codegen("libart", &codegen(), &arches(&["arm"], &["sparc"]), true, &mut target).unwrap_err();

    assert!(err.to_string().contains("sparc"));
    assert!(err.to_string().contains("libart"));
    assert!(target.is_empty());
  }

  #[test]
  fn fragment_json_uses_static_and_shared_keys() {
    let fragment: ArchFragment = serde_json::from_str(
      r#"{ "srcs": ["a.S"], "static": { "whole_static_libs": ["libx"] }, "shared": { "shared_libs": ["liby"] } }"#,
    )
    .unwrap();
    assert_eq!(fragment.srcs, vec!["a.S"]);
    assert_eq!(fragment.static_link.whole_static_libs, vec!["libx"]);
    assert_eq!(fragment.shared_link.shared_libs, vec!["liby"]);
    assert!(fragment.cflags.is_empty());
  }
}

//! Composition steps registered per module kind.

use tracing::debug;

use super::install::Installer;
use super::props::ModuleProperties;
use super::types::{ComposeError, ModuleDef};
use crate::codegen::merge_codegen;
use crate::context::BuildContext;
use crate::flags::{DefaultFlags, debug_flags};
use crate::knob::names;
use crate::platform::Placement;

pub const PREFER_32_BIT_MULTILIB: &str = "prefer32";

/// A load-phase step. Runs once per module, before compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStep {
  /// Merge the fragments of the selected codegen architectures.
  Codegen { link_libs: bool },
  /// Global compiler/assembler flags plus device and host flags.
  DefaultFlags,
  /// Debug optimization flag.
  DebugFlags,
  /// `CUSTOM_TARGET_LINKER` as the dynamic linker.
  CustomLinker,
  /// `HOST_PREFER_32_BIT` as the host multilib preference.
  Prefer32Bit,
}

impl LoadStep {
  pub fn name(&self) -> &'static str {
    match self {
      Self::Codegen { .. } => "codegen",
      Self::DefaultFlags => "default_flags",
      Self::DebugFlags => "debug_flags",
      Self::CustomLinker => "custom_linker",
      Self::Prefer32Bit => "prefer_32_bit",
    }
  }

  pub fn apply(&self, def: &ModuleDef, ctx: &BuildContext, props: &mut ModuleProperties) -> Result<(), ComposeError> {
    debug!(module = %def.name, step = self.name(), "running load step");

    match self {
      Self::Codegen { link_libs } => {
        merge_codegen(&def.name, &def.codegen, ctx.arches(), *link_libs, &mut props.target)?;
      }
      Self::DefaultFlags => {
        let flags = DefaultFlags::compose(ctx.knobs(), ctx.facts());
        props.cflags.extend_from(&flags.global.cflags);
        props.asflags.extend_from(&flags.global.asflags);
        props.target.android.cflags.extend_from(&flags.device);
        props.target.host.cflags.extend_from(&flags.host);
      }
      Self::DebugFlags => {
        props.cflags.extend_from(&debug_flags(ctx.knobs()));
      }
      Self::CustomLinker => {
        if let Some(linker) = ctx.knobs().string_opt(names::CUSTOM_TARGET_LINKER) {
          props.dynamic_linker = Some(linker);
        }
      }
      Self::Prefer32Bit => {
        if ctx.knobs().is_true(names::HOST_PREFER_32_BIT) {
          props.target.host.compile_multilib = Some(PREFER_32_BIT_MULTILIB.to_string());
        }
      }
    }

    Ok(())
  }
}

/// An install-phase step. Runs once per module, after installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStep {
  /// Record every installed variant in the test registry.
  RecordTest,
}

impl InstallStep {
  /// Runs the step; returns the number of artifacts recorded.
  pub fn run(&self, module: &str, placements: &[Placement], ctx: &BuildContext, installer: &dyn Installer) -> usize {
    match self {
      Self::RecordTest => {
        let mut recorded = 0;
        for &placement in placements {
          for &arch in ctx.facts().variant_arches(placement) {
            let path = installer.install_path(placement, arch, module);
            ctx.registry().record(placement, arch.as_str(), module, &path);
            recorded += 1;
          }
        }
        debug!(module, recorded, "recorded installed tests");
        recorded
      }
    }
  }
}

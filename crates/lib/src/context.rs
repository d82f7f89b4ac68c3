//! Per-configuration build context.

use std::sync::Arc;

use tracing::info;

use crate::codegen::CodegenArches;
use crate::knob::Knobs;
use crate::platform::PlatformFacts;
use crate::registry::TestRegistry;

/// Everything composition steps may read, frozen for one configuration.
///
/// Codegen architectures are selected and the test registry is created here,
/// once, before any module is composed.
#[derive(Debug)]
pub struct BuildContext {
  knobs: Knobs,
  facts: PlatformFacts,
  arches: CodegenArches,
  registry: Arc<TestRegistry>,
}

impl BuildContext {
  pub fn new(knobs: Knobs, facts: PlatformFacts) -> Self {
    let arches = CodegenArches::resolve(&knobs, &facts);
    info!(
      device = ?arches.device,
      host = ?arches.host,
      "selected codegen architectures"
    );

    Self {
      knobs,
      facts,
      arches,
      registry: Arc::new(TestRegistry::new()),
    }
  }

  pub fn knobs(&self) -> &Knobs {
    &self.knobs
  }

  pub fn facts(&self) -> &PlatformFacts {
    &self.facts
  }

  pub fn arches(&self) -> &CodegenArches {
    &self.arches
  }

  pub fn registry(&self) -> &Arc<TestRegistry> {
    &self.registry
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::knob::names;

  #[test]
  fn arches_are_resolved_at_creation() {
    let knobs = Knobs::from_pairs([(names::ART_TARGET_CODEGEN_ARCHS, "mips")]);
    let ctx = BuildContext::new(knobs, PlatformFacts::default());

    assert_eq!(ctx.arches().device, vec!["mips"]);
    assert_eq!(ctx.arches().host.len(), 6);
    assert!(ctx.registry().is_empty());
  }
}

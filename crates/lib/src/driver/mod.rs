//! Two-phase composition driver.
//!
//! This module stands in for the host build system's hook scheduler:
//! - load phase: modules are composed wave by wave, modules within a wave
//!   run in parallel
//! - a failed module only aborts itself; modules inheriting from it are
//!   skipped, siblings carry on
//! - install phase: install steps of every composed module run in parallel,
//!   after all composition has finished

pub mod dag;
pub mod types;

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::context::BuildContext;
use crate::module::{ComposeError, ComposedModule, Installer, ModuleProperties, PendingModule};

pub use dag::ModuleGraph;
pub use types::{DriverConfig, DriverError, DriverResult, ModuleFailure};

/// Compose every module of `graph`, then run install steps.
///
/// The graph is consumed: each pending module is composed at most once.
pub async fn run(
  mut graph: ModuleGraph,
  ctx: Arc<BuildContext>,
  installer: Arc<dyn Installer>,
  config: &DriverConfig,
) -> DriverResult {
  let waves = graph.waves();
  info!(
    module_count = graph.len(),
    wave_count = waves.len(),
    "starting load phase"
  );

  let mut result = DriverResult::default();
  let semaphore = Arc::new(Semaphore::new(config.parallelism.max(1)));

  for (wave_idx, wave) in waves.iter().enumerate() {
    debug!(wave = wave_idx, modules = wave.len(), "composing wave");

    let mut ready = Vec::new();
    for name in wave {
      if let Some(dep) = failed_dependency(graph.defaults_of(name), &result) {
        warn!(module = %name, failed_dep = %dep, "skipping module due to failed defaults");
        result.skipped.insert(name.clone(), dep);
        continue;
      }

      let inherited: Vec<ModuleProperties> = graph
        .defaults_of(name)
        .iter()
        .filter_map(|dep| result.composed.get(dep))
        .map(|module| module.properties.clone())
        .collect();

      if let Some(pending) = graph.take(name) {
        ready.push((pending, inherited));
      }
    }

    let names: Vec<String> = ready.iter().map(|(pending, _)| pending.name().to_string()).collect();
    let mut outcomes = compose_wave(ready, &ctx, &semaphore).await;

    for name in names {
      match outcomes.remove(&name) {
        Some(Ok(module)) => {
          result.composed.insert(name, module);
        }
        Some(Err(e)) => {
          error!(module = %name, error = %e, "module composition failed");
          result.failed.insert(name, ModuleFailure::Compose(e));
        }
        None => {
          error!(module = %name, "composition task panicked");
          result.failed.insert(name.clone(), ModuleFailure::Panicked(name));
        }
      }
    }
  }

  info!(
    composed = result.composed.len(),
    failed = result.failed.len(),
    skipped = result.skipped.len(),
    "load phase complete"
  );

  result.installed = install_all(&result.composed, &ctx, &installer, &semaphore).await;

  info!(
    installed = result.installed,
    tests = ctx.registry().len(),
    registry = crate::registry::TestRegistry::NAME,
    "install phase complete"
  );

  result
}

/// Returns the first defaults module that failed or was skipped.
fn failed_dependency(defaults: &[String], result: &DriverResult) -> Option<String> {
  defaults
    .iter()
    .find(|dep| result.failed.contains_key(*dep) || result.skipped.contains_key(*dep))
    .cloned()
}

async fn compose_wave(
  modules: Vec<(PendingModule, Vec<ModuleProperties>)>,
  ctx: &Arc<BuildContext>,
  semaphore: &Arc<Semaphore>,
) -> BTreeMap<String, Result<ComposedModule, ComposeError>> {
  let mut join_set = JoinSet::new();

  for (pending, inherited) in modules {
    let ctx = Arc::clone(ctx);
    let semaphore = Arc::clone(semaphore);

    join_set.spawn(async move {
      let _permit = semaphore.acquire_owned().await.ok();
      let name = pending.name().to_string();
      let inherited: Vec<&ModuleProperties> = inherited.iter().collect();
      (name, pending.compose(&ctx, &inherited))
    });
  }

  let mut outcomes = BTreeMap::new();
  while let Some(joined) = join_set.join_next().await {
    match joined {
      Ok((name, outcome)) => {
        outcomes.insert(name, outcome);
      }
      Err(e) => {
        error!(error = %e, "composition task failed to join");
      }
    }
  }
  outcomes
}

async fn install_all(
  composed: &BTreeMap<String, ComposedModule>,
  ctx: &Arc<BuildContext>,
  installer: &Arc<dyn Installer>,
  semaphore: &Arc<Semaphore>,
) -> usize {
  let mut join_set = JoinSet::new();

  for module in composed.values().filter(|module| !module.install_steps().is_empty()) {
    let module = module.clone();
    let ctx = Arc::clone(ctx);
    let installer = Arc::clone(installer);
    let semaphore = Arc::clone(semaphore);

    join_set.spawn(async move {
      let _permit = semaphore.acquire_owned().await.ok();
      module.install(&ctx, installer.as_ref())
    });
  }

  let mut installed = 0;
  while let Some(joined) = join_set.join_next().await {
    match joined {
      Ok(count) => installed += count,
      Err(e) => error!(error = %e, "install task failed to join"),
    }
  }
  installed
}

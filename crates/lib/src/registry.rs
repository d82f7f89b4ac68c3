//! Registry of installed test artifacts.
//!
//! This is the only state shared between concurrently running install steps.
//! One registry exists per build configuration; it is created together with
//! the [`BuildContext`](crate::context::BuildContext) before any step runs and
//! handed out through an `Arc`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::platform::Placement;

#[derive(Debug, Default)]
pub struct TestRegistry {
  tests: Mutex<BTreeMap<String, Vec<PathBuf>>>,
}

impl TestRegistry {
  /// Name the registry is published under.
  pub const NAME: &'static str = "art_tests";

  pub fn new() -> Self {
    Self::default()
  }

  /// Key for a (placement, architecture, module) combination, e.g. `host_x86_64_art_runtime_tests`.
  pub fn key(placement: Placement, arch: &str, module: &str) -> String {
    format!("{}_{}_{}", placement.tag(), arch, module)
  }

  /// Appends `path` to the list for the combination. The lock is held only
  /// for the append.
  pub fn record(&self, placement: Placement, arch: &str, module: &str, path: impl AsRef<Path>) {
    let key = Self::key(placement, arch, module);
    let path = path.as_ref().to_path_buf();
    trace!(key = %key, path = %path.display(), "recording installed test");

    self.lock().entry(key).or_default().push(path);
  }

  pub fn get(&self, key: &str) -> Option<Vec<PathBuf>> {
    self.lock().get(key).cloned()
  }

  /// Copy of the whole map. Meant to be read once every install step of the
  /// configuration has finished.
  pub fn snapshot(&self) -> BTreeMap<String, Vec<PathBuf>> {
    self.lock().clone()
  }

  /// Number of keys.
  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.lock().is_empty()
  }

  // A panic while holding the lock cannot leave the map half-updated, so a
  // poisoned lock is still usable.
  fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Vec<PathBuf>>> {
    self.tests.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

//! Environment sources knobs are read from.

use std::collections::BTreeMap;

/// A source of truth for environment variable values.
///
/// Implementations return `None` for unset names. An empty string is a
/// legitimate return value; [`Knobs`](super::Knobs) treats it as unset.
pub trait EnvSource: Send + Sync {
  fn get(&self, name: &str) -> Option<String>;
}

/// Reads from the current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
  fn get(&self, name: &str) -> Option<String> {
    std::env::var(name).ok()
  }
}

/// In-memory environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
  vars: BTreeMap<String, String>,
}

impl MapEnv {
  pub fn new(vars: BTreeMap<String, String>) -> Self {
    Self { vars }
  }

  pub fn from_pairs<I, K, V>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    Self {
      vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }
}

impl EnvSource for MapEnv {
  fn get(&self, name: &str) -> Option<String> {
    self.vars.get(name).cloned()
  }
}

/// Stack of sources; the first layer holding a non-empty value wins.
#[derive(Default)]
pub struct LayeredEnv {
  layers: Vec<Box<dyn EnvSource>>,
}

impl LayeredEnv {
  pub fn new() -> Self {
    Self { layers: Vec::new() }
  }

  /// Adds a layer with lower precedence than every layer already present.
  pub fn with_layer(mut self, layer: impl EnvSource + 'static) -> Self {
    self.layers.push(Box::new(layer));
    self
  }
}

impl EnvSource for LayeredEnv {
  fn get(&self, name: &str) -> Option<String> {
    self
      .layers
      .iter()
      .filter_map(|layer| layer.get(name))
      .find(|value| !value.is_empty())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn process_env_reads_variables() {
    temp_env::with_vars(
      [("ART_IMT_SIZE", Some("71")), ("ART_HEAP_POISONING", None::<&str>)],
      || {
        assert_eq!(ProcessEnv.get("ART_IMT_SIZE"), Some("71".to_string()));
        assert_eq!(ProcessEnv.get("ART_HEAP_POISONING"), None);
      },
    );
  }

  #[test]
  fn layers_are_consulted_in_order() {
    let env = LayeredEnv::new()
      .with_layer(MapEnv::from_pairs([("A", "cli")]))
      .with_layer(MapEnv::from_pairs([("A", "file"), ("B", "file")]))
      .with_layer(MapEnv::from_pairs([("A", "process"), ("B", "process"), ("C", "process")]));

    assert_eq!(env.get("A"), Some("cli".to_string()));
    assert_eq!(env.get("B"), Some("file".to_string()));
    assert_eq!(env.get("C"), Some("process".to_string()));
    assert_eq!(env.get("D"), None);
  }

  #[test]
  fn empty_value_does_not_shadow_lower_layers() {
    let env = LayeredEnv::new()
      .with_layer(MapEnv::from_pairs([("A", "")]))
      .with_layer(MapEnv::from_pairs([("A", "lower")]));

    assert_eq!(env.get("A"), Some("lower".to_string()));
  }

  #[test]
  #[serial]
  fn process_env_as_lowest_layer() {
    temp_env::with_var("ART_TARGET_LINUX", Some("true"), || {
      let env = LayeredEnv::new()
        .with_layer(MapEnv::from_pairs([("ART_IMT_SIZE", "12")]))
        .with_layer(ProcessEnv);

      assert_eq!(env.get("ART_TARGET_LINUX"), Some("true".to_string()));
      assert_eq!(env.get("ART_IMT_SIZE"), Some("12".to_string()));
    });
  }
}

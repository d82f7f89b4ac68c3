//! Build files: the module set and configuration for one composition run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::knob::{EnvSource, Knobs, LayeredEnv, MapEnv, ProcessEnv};
use crate::module::ModuleDef;
use crate::platform::PlatformFacts;

const DEFAULT_INSTALL_ROOT: &str = "out";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read build file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse build file {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildFile {
  pub platform: PlatformFacts,
  /// Knob values that take precedence over the process environment.
  pub env: BTreeMap<String, String>,
  pub install_root: PathBuf,
  pub modules: Vec<ModuleDef>,
}

impl Default for BuildFile {
  fn default() -> Self {
    Self {
      platform: PlatformFacts::default(),
      env: BTreeMap::new(),
      install_root: PathBuf::from(DEFAULT_INSTALL_ROOT),
      modules: Vec::new(),
    }
  }
}

impl BuildFile {
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let file: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), modules = file.modules.len(), "loaded build file");
    Ok(file)
  }

  /// Parses build file text. Errors carry the placeholder path `<inline>`.
  pub fn from_json(text: &str) -> Result<Self, ConfigError> {
    serde_json::from_str(text).map_err(|source| ConfigError::Parse {
      path: PathBuf::from("<inline>"),
      source,
    })
  }

  /// Knobs for this file: `overrides` first, then `env`, then the process
  /// environment.
  pub fn knobs(&self, overrides: MapEnv) -> Knobs {
    self.knobs_over(overrides, ProcessEnv)
  }

  fn knobs_over(&self, overrides: MapEnv, base: impl EnvSource + 'static) -> Knobs {
    let env = LayeredEnv::new()
      .with_layer(overrides)
      .with_layer(MapEnv::new(self.env.clone()))
      .with_layer(base);
    Knobs::new(env)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::knob::names;
  use crate::module::ModuleKind;
  use crate::platform::Arch;

  mod parsing {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
      let file = BuildFile::from_json("{}").unwrap();
      assert_eq!(file, BuildFile::default());
      assert_eq!(file.install_root, PathBuf::from("out"));
      assert_eq!(file.platform.device_arches, vec![Arch::Arm64, Arch::Arm]);
    }

    #[test]
    fn full_file() {
      let file = BuildFile::from_json(
        r#"{
          "platform": { "device_arches": ["arm64"], "sanitize_host": ["address"] },
          "env": { "ART_HEAP_POISONING": "true" },
          "install_root": "/tmp/art",
          "modules": [
            { "name": "art_defaults", "kind": "global_defaults" },
            {
              "name": "libart",
              "kind": "library",
              "defaults": ["art_defaults"],
              "properties": { "srcs": ["runtime.cc"] },
              "codegen": { "arm64": { "srcs": ["arch/arm64/quick.S"], "static": { "whole_static_libs": ["libvixl"] } } }
            }
          ]
        }"#,
      )
      .unwrap();

      assert_eq!(file.platform.device_arches, vec![Arch::Arm64]);
      assert!(file.platform.sanitized(crate::platform::Placement::Host));
      assert_eq!(file.env["ART_HEAP_POISONING"], "true");
      assert_eq!(file.modules.len(), 2);

      let libart = &file.modules[1];
      assert_eq!(libart.kind, ModuleKind::Library);
      assert_eq!(libart.defaults, vec!["art_defaults"]);
      assert!(libart.host_supported && libart.device_supported);
      assert_eq!(libart.properties.srcs, vec!["runtime.cc"]);
      assert_eq!(libart.codegen.arm64.static_link.whole_static_libs, vec!["libvixl"]);
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
      let err = BuildFile::from_json(r#"{ "modules": [ { "name": "x", "kind": "genrule" } ] }"#).unwrap_err();
      assert!(matches!(err, ConfigError::Parse { .. }));
      assert!(err.to_string().contains("<inline>"));
    }

    #[test]
    fn unknown_platform_arch_is_a_parse_error() {
      let err = BuildFile::from_json(r#"{ "platform": { "device_arches": ["riscv64"] } }"#).unwrap_err();
      assert!(matches!(err, ConfigError::Parse { .. }));
    }
  }

  mod loading {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_from_disk() {
      let temp = TempDir::new().unwrap();
      let path = temp.path().join("art.json");
      std::fs::write(&path, r#"{ "modules": [ { "name": "art_defaults", "kind": "global_defaults" } ] }"#).unwrap();

      let file = BuildFile::load(&path).unwrap();
      assert_eq!(file.modules[0].name, "art_defaults");
    }

    #[test]
    fn missing_file_names_the_path() {
      let temp = TempDir::new().unwrap();
      let path = temp.path().join("missing.json");

      let err = BuildFile::load(&path).unwrap_err();
      assert!(matches!(err, ConfigError::Read { .. }));
      assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn invalid_json_names_the_path() {
      let temp = TempDir::new().unwrap();
      let path = temp.path().join("broken.json");
      std::fs::write(&path, "{ not json").unwrap();

      let err = BuildFile::load(&path).unwrap_err();
      assert!(matches!(err, ConfigError::Parse { ref path, .. } if path.ends_with("broken.json")));
    }
  }

  mod knob_layers {
    use super::*;

    fn file_with_env(pairs: &[(&str, &str)]) -> BuildFile {
      BuildFile {
        env: pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        ..BuildFile::default()
      }
    }

    #[test]
    fn overrides_beat_file_env_and_base() {
      let file = file_with_env(&[(names::ART_IMT_SIZE, "64"), (names::ART_HEAP_POISONING, "true")]);
      let knobs = file.knobs_over(
        MapEnv::from_pairs([(names::ART_IMT_SIZE, "71")]),
        MapEnv::from_pairs([
          (names::ART_IMT_SIZE, "32"),
          (names::ART_HEAP_POISONING, "false"),
          (names::ART_ENABLE_VDEX, "false"),
        ]),
      );

      assert_eq!(knobs.string_opt(names::ART_IMT_SIZE).as_deref(), Some("71"));
      assert!(knobs.is_true(names::ART_HEAP_POISONING));
      assert!(knobs.tristate(names::ART_ENABLE_VDEX).is_false());
    }

    #[test]
    fn empty_file_value_falls_through() {
      let file = file_with_env(&[(names::ART_DEFAULT_GC_TYPE, "")]);
      let knobs = file.knobs_over(MapEnv::default(), MapEnv::from_pairs([(names::ART_DEFAULT_GC_TYPE, "SS")]));
      assert_eq!(knobs.string(names::ART_DEFAULT_GC_TYPE, "CMS"), "SS");
    }
  }
}

//! Knob resolution.
//!
//! Knobs are named configuration values read from an [`EnvSource`]. String
//! knobs fall back to a default when unset or empty. Boolean knobs are
//! tri-state, so callers can tell "not set" apart from "set to false" when a
//! feature defaults to enabled.

pub mod names;
mod source;

use std::fmt;
use std::sync::Arc;

pub use source::{EnvSource, LayeredEnv, MapEnv, ProcessEnv};

/// Observed state of a boolean knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tristate {
  True,
  False,
  Absent,
}

impl Tristate {
  /// Only the literal strings `"true"` and `"false"` are recognised.
  pub fn parse(raw: Option<&str>) -> Self {
    match raw {
      Some("true") => Self::True,
      Some("false") => Self::False,
      _ => Self::Absent,
    }
  }

  /// Explicitly `true`.
  pub fn is_true(self) -> bool {
    self == Self::True
  }

  pub fn is_false(self) -> bool {
    self == Self::False
  }

  /// True for both `True` and `Absent`. Used for features that are on by default.
  pub fn is_not_false(self) -> bool {
    self != Self::False
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::True => "true",
      Self::False => "false",
      Self::Absent => "absent",
    }
  }
}

impl fmt::Display for Tristate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Read-only view over an environment source with default-filled semantics.
///
/// Cloning is cheap; all clones share the same source.
#[derive(Clone)]
pub struct Knobs {
  env: Arc<dyn EnvSource>,
}

impl Knobs {
  pub fn new(env: impl EnvSource + 'static) -> Self {
    Self { env: Arc::new(env) }
  }

  /// Knobs backed by an in-memory map, mostly useful in tests.
  pub fn from_pairs<I, K, V>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    Self::new(MapEnv::from_pairs(pairs))
  }

  /// Knobs with nothing set.
  pub fn empty() -> Self {
    Self::new(MapEnv::default())
  }

  /// Returns the configured value, or `None` when unset or empty.
  pub fn string_opt(&self, name: &str) -> Option<String> {
    self.env.get(name).filter(|value| !value.is_empty())
  }

  /// Returns the configured value if present and non-empty, else `default`.
  pub fn string(&self, name: &str, default: &str) -> String {
    self.string_opt(name).unwrap_or_else(|| default.to_string())
  }

  /// Reads `name` as a tri-state; anything other than `true`/`false` is `Absent`.
  pub fn tristate(&self, name: &str) -> Tristate {
    Tristate::parse(self.env.get(name).as_deref())
  }

  /// Opt-in features: only an explicit `true` counts.
  pub fn is_true(&self, name: &str) -> bool {
    self.tristate(name).is_true()
  }
}

impl fmt::Debug for Knobs {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Knobs").finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  mod tristate {
    use super::*;

    #[test]
    fn only_literal_strings_are_recognised() {
      assert_eq!(Tristate::parse(Some("true")), Tristate::True);
      assert_eq!(Tristate::parse(Some("false")), Tristate::False);

      for other in ["", "TRUE", "True", "1", "0", "yes", "no", " true", "false "] {
        assert_eq!(Tristate::parse(Some(other)), Tristate::Absent, "input {:?}", other);
      }
      assert_eq!(Tristate::parse(None), Tristate::Absent);
    }

    #[test]
    fn absent_is_not_false() {
      assert!(Tristate::Absent.is_not_false());
      assert!(!Tristate::Absent.is_true());
      assert!(!Tristate::Absent.is_false());
      assert!(!Tristate::False.is_not_false());
    }
  }

  mod knobs {
    use super::*;

    #[test]
    fn string_falls_back_to_default_when_unset() {
      let knobs = Knobs::empty();
      assert_eq!(knobs.string(names::ART_IMT_SIZE, "43"), "43");
    }

    #[test]
    fn string_falls_back_to_default_when_empty() {
      let knobs = Knobs::from_pairs([(names::ART_IMT_SIZE, "")]);
      assert_eq!(knobs.string(names::ART_IMT_SIZE, "43"), "43");
      assert_eq!(knobs.string_opt(names::ART_IMT_SIZE), None);
    }

    #[test]
    fn string_returns_configured_value() {
      let knobs = Knobs::from_pairs([(names::ART_IMT_SIZE, "64")]);
      assert_eq!(knobs.string(names::ART_IMT_SIZE, "43"), "64");
    }

    #[test]
    fn tristate_for_every_known_knob() {
      for info in names::ALL {
        assert_eq!(Knobs::empty().tristate(info.name), Tristate::Absent);
        assert_eq!(Knobs::from_pairs([(info.name, "true")]).tristate(info.name), Tristate::True);
        assert_eq!(Knobs::from_pairs([(info.name, "false")]).tristate(info.name), Tristate::False);
        assert_eq!(Knobs::from_pairs([(info.name, "on")]).tristate(info.name), Tristate::Absent);
      }
    }

    #[test]
    fn unknown_names_resolve_as_absent() {
      let knobs = Knobs::from_pairs([("SOMETHING_ELSE", "true")]);
      assert_eq!(knobs.tristate("NOT_A_KNOB"), Tristate::Absent);
      assert_eq!(knobs.string_opt("NOT_A_KNOB"), None);
    }
  }
}

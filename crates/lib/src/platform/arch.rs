use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// CPU architectures code can be generated for.
///
/// The derived ordering matches the lexicographic ordering of the names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Arch {
  #[serde(rename = "arm")]
  Arm,
  #[serde(rename = "arm64")]
  Arm64,
  #[serde(rename = "mips")]
  Mips,
  #[serde(rename = "mips64")]
  Mips64,
  #[serde(rename = "x86")]
  X86,
  #[serde(rename = "x86_64")]
  X86_64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown architecture {0:?}")]
pub struct UnknownArch(pub String);

impl Arch {
  /// Every supported architecture, in sorted order.
  pub const ALL: [Arch; 6] = [
    Arch::Arm,
    Arch::Arm64,
    Arch::Mips,
    Arch::Mips64,
    Arch::X86,
    Arch::X86_64,
  ];

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Arm => "arm",
      Self::Arm64 => "arm64",
      Self::Mips => "mips",
      Self::Mips64 => "mips64",
      Self::X86 => "x86",
      Self::X86_64 => "x86_64",
    }
  }

  /// The 32-bit architecture a 64-bit device build also needs code for.
  pub fn companion_32bit(&self) -> Option<Arch> {
    match self {
      Self::Arm64 => Some(Self::Arm),
      Self::Mips64 => Some(Self::Mips),
      Self::X86_64 => Some(Self::X86),
      Self::Arm | Self::Mips | Self::X86 => None,
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Arch {
  type Err = UnknownArch;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|arch| arch.as_str() == s)
      .ok_or_else(|| UnknownArch(s.to_string()))
  }
}

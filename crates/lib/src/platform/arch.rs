use std::fmt;

use serde::{Deserialize, Serialize};

/// Target CPU architectures as the package settings name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
  X86_64,
  X86,
  Armv7,
  Armv8,
}

impl Arch {
  /// Detect the host CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86_64" => Some(Self::X86_64),
      "x86" => Some(Self::X86),
      "arm" => Some(Self::Armv7),
      "aarch64" => Some(Self::Armv8),
      _ => None,
    }
  }

  /// Parse the `arch` value of a settings block.
  ///
  /// Returns `None` for architectures this generator has no rules for.
  pub fn from_setting(value: &str) -> Option<Self> {
    match value.trim().to_ascii_lowercase().as_str() {
      "x86_64" | "amd64" => Some(Self::X86_64),
      "x86" | "i686" => Some(Self::X86),
      "armv7" | "armv7hf" => Some(Self::Armv7),
      "armv8" | "aarch64" | "arm64" => Some(Self::Armv8),
      _ => None,
    }
  }

  /// Returns the settings identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::X86 => "x86",
      Self::Armv7 => "armv7",
      Self::Armv8 => "armv8",
    }
  }

  /// Whether microarchitecture options mean anything on this architecture.
  pub fn supports_march(&self) -> bool {
    matches!(self, Self::X86_64)
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn settings_aliases_parse() {
    assert_eq!(Arch::from_setting("x86_64"), Some(Arch::X86_64));
    assert_eq!(Arch::from_setting("AMD64"), Some(Arch::X86_64));
    assert_eq!(Arch::from_setting("armv8"), Some(Arch::Armv8));
    assert_eq!(Arch::from_setting("sparc"), None);
  }

  #[test]
  fn only_x86_64_supports_march() {
    assert!(Arch::X86_64.supports_march());
    assert!(!Arch::X86.supports_march());
    assert!(!Arch::Armv8.supports_march());
  }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating systems that appear in build settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
  Linux,
  MacOs,
  Windows,
  FreeBsd,
}

impl Os {
  /// Detect the host operating system at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      "freebsd" => Some(Self::FreeBsd),
      _ => None,
    }
  }

  /// Parse an `os` setting or a `platform.system()` style name.
  pub fn from_setting(value: &str) -> Option<Self> {
    match value.trim().to_ascii_lowercase().as_str() {
      "linux" => Some(Self::Linux),
      "macos" | "darwin" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      "freebsd" => Some(Self::FreeBsd),
      _ => None,
    }
  }

  /// Returns the lowercase identifier used in support tables
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "macos",
      Self::Windows => "windows",
      Self::FreeBsd => "freebsd",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn current_returns_supported_os() {
    assert!(Os::current().is_some(), "Current OS should be supported");
  }

  #[test]
  fn darwin_is_macos() {
    assert_eq!(Os::from_setting("Darwin"), Some(Os::MacOs));
    assert_eq!(Os::from_setting("Macos"), Some(Os::MacOs));
  }

  #[test]
  fn settings_use_capitalized_names() {
    assert_eq!(Os::from_setting("Linux"), Some(Os::Linux));
    assert_eq!(Os::from_setting("Windows"), Some(Os::Windows));
    assert_eq!(Os::from_setting("Haiku"), None);
  }
}

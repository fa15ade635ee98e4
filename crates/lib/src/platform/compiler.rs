//! Compiler identity and version parsing.
//!
//! Settings carry the compiler as free-form strings (`gcc`, `apple-clang`,
//! `Visual Studio`) and the version as a dotted string (`4.9`, `10`,
//! `12.0.5`). Versions compare numerically component by component, with
//! missing trailing components treated as zero, so `5` equals `5.0`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Compiler families with known microarchitecture support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Compiler {
  Gcc,
  Clang,
  AppleClang,
  Msvc,
}

impl Compiler {
  /// Parse the `compiler` value of a settings block.
  pub fn from_setting(value: &str) -> Option<Self> {
    match value.trim().to_ascii_lowercase().as_str() {
      "gcc" => Some(Self::Gcc),
      "clang" => Some(Self::Clang),
      "apple-clang" | "apple_clang" => Some(Self::AppleClang),
      "visual studio" | "msvc" => Some(Self::Msvc),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Gcc => "gcc",
      Self::Clang => "clang",
      Self::AppleClang => "apple-clang",
      Self::Msvc => "msvc",
    }
  }
}

impl fmt::Display for Compiler {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid compiler version '{0}'")]
pub struct VersionParseError(pub String);

/// A dotted numeric compiler version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompilerVersion {
  parts: Vec<u32>,
}

impl CompilerVersion {
  pub fn new(parts: Vec<u32>) -> Self {
    Self { parts }
  }

  pub fn parts(&self) -> &[u32] {
    &self.parts
  }

  fn component(&self, idx: usize) -> u32 {
    self.parts.get(idx).copied().unwrap_or(0)
  }
}

impl FromStr for CompilerVersion {
  type Err = VersionParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
      return Err(VersionParseError(s.to_string()));
    }
    let parts = trimmed
      .split('.')
      .map(|part| part.parse::<u32>())
      .collect::<Result<Vec<_>, _>>()
      .map_err(|_| VersionParseError(s.to_string()))?;
    Ok(Self { parts })
  }
}

impl TryFrom<String> for CompilerVersion {
  type Error = VersionParseError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<CompilerVersion> for String {
  fn from(value: CompilerVersion) -> Self {
    value.to_string()
  }
}

impl fmt::Display for CompilerVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let joined: Vec<String> = self.parts.iter().map(u32::to_string).collect();
    write!(f, "{}", joined.join("."))
  }
}

impl Ord for CompilerVersion {
  fn cmp(&self, other: &Self) -> Ordering {
    let len = self.parts.len().max(other.parts.len());
    for idx in 0..len {
      match self.component(idx).cmp(&other.component(idx)) {
        Ordering::Equal => continue,
        unequal => return unequal,
      }
    }
    Ordering::Equal
  }
}

impl PartialOrd for CompilerVersion {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl PartialEq for CompilerVersion {
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl Eq for CompilerVersion {}

//! The static microarchitecture support table.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::MarchId;
use crate::platform::Toolchain;
use crate::platform::compiler::{Compiler, CompilerVersion};
use crate::platform::os::Os;

const BUILTIN_TABLE: &str = include_str!("../../data/march-support.toml");

#[derive(Debug, Error)]
pub enum TableError {
  #[error("failed to read support table {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse support table: {0}")]
  Parse(#[from] toml::de::Error),
}

/// Grants `marchs` to `compiler` on `os` from `min_version` on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SupportEntry {
  pub os: Os,
  pub compiler: Compiler,
  pub min_version: CompilerVersion,
  #[serde(default)]
  pub marchs: Vec<MarchId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SupportTable {
  #[serde(default = "MarchId::baseline")]
  pub baseline: MarchId,
  #[serde(default, rename = "entry")]
  pub entries: Vec<SupportEntry>,
}

impl SupportTable {
  /// The table shipped with the crate.
  pub fn builtin() -> Result<Self, TableError> {
    Self::from_toml_str(BUILTIN_TABLE)
  }

  pub fn load(path: &Path) -> Result<Self, TableError> {
    let content = std::fs::read_to_string(path).map_err(|source| TableError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_toml_str(&content)
  }

  pub fn from_toml_str(content: &str) -> Result<Self, TableError> {
    Ok(toml::from_str(content)?)
  }

  /// Load `path` if given, otherwise the builtin table.
  pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, TableError> {
    match path {
      Some(path) => Self::load(path),
      None => Self::builtin(),
    }
  }

  /// Extensions granted to `toolchain` beyond the baseline.
  ///
  /// Returns `None` when the toolchain is not covered by any entry, which
  /// callers treat as "baseline only".
  pub fn supported(&self, toolchain: &Toolchain) -> Option<BTreeSet<MarchId>> {
    let (os, compiler, version) = match (&toolchain.os, &toolchain.compiler, &toolchain.version) {
      (Some(os), Some(compiler), Some(version)) => (*os, *compiler, version),
      _ => return None,
    };

    let mut known = false;
    let mut granted = BTreeSet::new();
    for entry in self.entries.iter().filter(|e| e.os == os && e.compiler == compiler) {
      known = true;
      if *version >= entry.min_version {
        granted.extend(entry.marchs.iter().cloned());
      }
    }

    known.then_some(granted)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn table() -> SupportTable {
    SupportTable::builtin().unwrap()
  }

  #[test]
  fn builtin_table_parses() {
    let table = table();
    assert!(table.baseline.is_baseline());
    assert!(!table.entries.is_empty());
  }

  #[test]
  fn grants_accumulate_with_version() {
    let table = table();
    let gcc5 = table.supported(&Toolchain::parse("Linux", "gcc", "5")).unwrap();
    assert!(gcc5.contains(&MarchId::from("haswell")));
    assert!(!gcc5.contains(&MarchId::from("skylake")));

    let gcc9 = table.supported(&Toolchain::parse("Linux", "gcc", "9")).unwrap();
    assert!(gcc9.contains(&MarchId::from("haswell")));
    assert!(gcc9.contains(&MarchId::from("skylake")));
  }

  #[test]
  fn below_minimum_is_known_but_empty() {
    let granted = table().supported(&Toolchain::parse("Linux", "gcc", "4.9")).unwrap();
    assert!(granted.is_empty());
  }

  #[test]
  fn unknown_pair_is_none() {
    assert!(table().supported(&Toolchain::parse("Linux", "intel", "19")).is_none());
    assert!(table().supported(&Toolchain::parse("Linux", "gcc", "latest")).is_none());
  }

  #[test]
  fn empty_entry_marks_pair_known() {
    let granted = table().supported(&Toolchain::parse("Windows", "Visual Studio", "15")).unwrap();
    assert!(granted.is_empty());
  }

  #[test]
  fn custom_table_from_toml() {
    let table = SupportTable::from_toml_str(
      r#"
        [[entry]]
        os = "linux"
        compiler = "clang"
        min_version = "10"
        marchs = ["znver2"]
      "#,
    )
    .unwrap();
    assert!(table.baseline.is_baseline());
    let granted = table.supported(&Toolchain::parse("Linux", "clang", "11")).unwrap();
    assert!(granted.contains(&MarchId::from("znver2")));
  }
}

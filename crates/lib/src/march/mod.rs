//! Microarchitecture identifiers, the support table, and the filter.

pub mod filter;
pub mod table;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::BASELINE_MARCH;

pub use filter::{Filtered, MarchFilter, test_carrier};
pub use table::{SupportEntry, SupportTable, TableError};

/// An instruction-set baseline name such as `x86-64` or `haswell`.
///
/// Opaque: the generator never interprets the string, it only checks it
/// against the support table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarchId(String);

impl MarchId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn baseline() -> Self {
    Self(BASELINE_MARCH.to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn is_baseline(&self) -> bool {
    self.0 == BASELINE_MARCH
  }
}

impl fmt::Display for MarchId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<&str> for MarchId {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

/// Candidate list swept by full builds.
pub fn default_candidates() -> Vec<MarchId> {
  ["x86-64", "haswell", "skylake"].into_iter().map(MarchId::from).collect()
}

//! Narrowing candidate microarchitectures to what a toolchain supports.

use tracing::debug;

use super::{MarchId, SupportTable};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::platform::Toolchain;

/// Result of filtering one candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filtered {
  pub accepted: Vec<MarchId>,
  /// Set when the toolchain is unknown and only the baseline survived.
  pub diagnostic: Option<Diagnostic>,
}

pub struct MarchFilter {
  table: SupportTable,
}

impl MarchFilter {
  pub fn new(table: SupportTable) -> Self {
    Self { table }
  }

  pub fn table(&self) -> &SupportTable {
    &self.table
  }

  /// Candidates the toolchain described by raw settings strings supports.
  pub fn valid_extensions(&self, os: &str, compiler: &str, version: &str, candidates: &[MarchId]) -> Vec<MarchId> {
    self.filter(&Toolchain::parse(os, compiler, version), candidates).accepted
  }

  /// Keep the candidates `toolchain` supports.
  ///
  /// Order is preserved, duplicates are dropped, and nothing outside
  /// `candidates` is ever added, so filtering a filtered list is a no-op.
  pub fn filter(&self, toolchain: &Toolchain, candidates: &[MarchId]) -> Filtered {
    let granted = self.table.supported(toolchain);
    let diagnostic = match &granted {
      Some(_) => None,
      None => {
        debug!(toolchain = %toolchain, "toolchain not in support table, baseline only");
        Some(Diagnostic::info(DiagnosticKind::BaselineOnly {
          toolchain: toolchain.to_string(),
        }))
      }
    };

    let mut accepted: Vec<MarchId> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
      let supported = *candidate == self.table.baseline
        || granted.as_ref().map(|g| g.contains(candidate)).unwrap_or(false);
      if supported && !accepted.contains(candidate) {
        accepted.push(candidate.clone());
      }
    }

    debug!(
      toolchain = %toolchain,
      candidates = candidates.len(),
      accepted = accepted.len(),
      "filtered microarchitectures"
    );

    Filtered { accepted, diagnostic }
  }
}

/// The microarchitecture whose variants carry the test run.
///
/// `preferred` when it was accepted, otherwise the first accepted id.
pub fn test_carrier(accepted: &[MarchId], preferred: &MarchId) -> Option<MarchId> {
  if accepted.contains(preferred) {
    Some(preferred.clone())
  } else {
    accepted.first().cloned()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::march::default_candidates;

  fn filter() -> MarchFilter {
    MarchFilter::new(SupportTable::builtin().unwrap())
  }

  fn ids(list: &[&str]) -> Vec<MarchId> {
    list.iter().map(|s| MarchId::from(*s)).collect()
  }

  #[test]
  fn old_gcc_gets_baseline_only() {
    let accepted = filter().valid_extensions("linux", "gcc", "4.9", &default_candidates());
    assert_eq!(accepted, ids(&["x86-64"]));
  }

  #[test]
  fn modern_gcc_gets_everything_in_order() {
    let accepted = filter().valid_extensions("Linux", "gcc", "9", &ids(&["skylake", "x86-64", "haswell"]));
    assert_eq!(accepted, ids(&["skylake", "x86-64", "haswell"]));
  }

  #[test]
  fn gcc5_stops_at_haswell() {
    let accepted = filter().valid_extensions("Linux", "gcc", "5.4", &default_candidates());
    assert_eq!(accepted, ids(&["x86-64", "haswell"]));
  }

  #[test]
  fn unknown_pair_falls_back_with_diagnostic() {
    let result = filter().filter(&Toolchain::parse("Solaris", "suncc", "12"), &default_candidates());
    assert_eq!(result.accepted, ids(&["x86-64"]));
    assert!(matches!(
      result.diagnostic.map(|d| d.kind),
      Some(DiagnosticKind::BaselineOnly { .. })
    ));
  }

  #[test]
  fn never_invents_or_duplicates() {
    let accepted = filter().valid_extensions("Linux", "gcc", "9", &ids(&["haswell", "haswell", "znver9"]));
    assert_eq!(accepted, ids(&["haswell"]));
  }

  #[test]
  fn filtering_is_idempotent() {
    let f = filter();
    for (os, compiler, version) in [
      ("Linux", "gcc", "4.9"),
      ("Linux", "gcc", "5"),
      ("Linux", "clang", "3.8"),
      ("Macos", "apple-clang", "10"),
      ("Windows", "Visual Studio", "15"),
      ("Linux", "intel", "19"),
    ] {
      let once = f.valid_extensions(os, compiler, version, &default_candidates());
      let twice = f.valid_extensions(os, compiler, version, &once);
      assert_eq!(once, twice, "{os}/{compiler}-{version}");
    }
  }

  #[test]
  fn carrier_prefers_requested_march() {
    let accepted = ids(&["haswell", "x86-64"]);
    assert_eq!(test_carrier(&accepted, &MarchId::baseline()), Some(MarchId::baseline()));
    assert_eq!(
      test_carrier(&ids(&["haswell", "skylake"]), &MarchId::baseline()),
      Some(MarchId::from("haswell"))
    );
    assert_eq!(test_carrier(&[], &MarchId::baseline()), None);
  }
}

//! Diagnostics surfaced alongside the finished matrix.
//!
//! Nothing the resolver or the filter does to a configuration is silent:
//! every removal, coercion, and fallback is recorded here and reported with
//! the job list.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Info,
  Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
  /// An option was removed because it does not apply.
  Removed { option: String, reason: String },
  /// An option was forced to a compatible value.
  Coerced {
    option: String,
    from: String,
    to: String,
    reason: String,
  },
  /// The toolchain is not in the support table; only the baseline is built.
  BaselineOnly { toolchain: String },
  /// A job identical to an earlier one was dropped.
  DuplicateJob { hash: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
  pub severity: Severity,
  #[serde(flatten)]
  pub kind: DiagnosticKind,
  /// Branch or base configuration the diagnostic was raised for.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub context: Option<String>,
}

impl Diagnostic {
  pub fn info(kind: DiagnosticKind) -> Self {
    Self {
      severity: Severity::Info,
      kind,
      context: None,
    }
  }

  pub fn warning(kind: DiagnosticKind) -> Self {
    Self {
      severity: Severity::Warning,
      kind,
      context: None,
    }
  }

  /// Attach a context unless one is already set.
  pub fn in_context(mut self, context: impl Into<String>) -> Self {
    if self.context.is_none() {
      self.context = Some(context.into());
    }
    self
  }

  pub fn is_warning(&self) -> bool {
    self.severity == Severity::Warning
  }
}

impl fmt::Display for DiagnosticKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DiagnosticKind::Removed { option, reason } => write!(f, "removed option '{option}': {reason}"),
      DiagnosticKind::Coerced {
        option,
        from,
        to,
        reason,
      } => write!(f, "option '{option}' changed from '{from}' to '{to}': {reason}"),
      DiagnosticKind::BaselineOnly { toolchain } => {
        write!(f, "no microarchitecture support known for {toolchain}, building baseline only")
      }
      DiagnosticKind::DuplicateJob { hash } => write!(f, "dropped duplicate job {hash}"),
    }
  }
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.context {
      Some(context) => write!(f, "[{}] {}", context, self.kind),
      None => write!(f, "{}", self.kind),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_includes_context() {
    let diag = Diagnostic::warning(DiagnosticKind::Coerced {
      option: "db".into(),
      from: "pruned".into(),
      to: "full".into(),
      reason: "Keoken requires a full index".into(),
    })
    .in_context("bch-keoken");
    assert_eq!(
      diag.to_string(),
      "[bch-keoken] option 'db' changed from 'pruned' to 'full': Keoken requires a full index"
    );
  }

  #[test]
  fn first_context_wins() {
    let diag = Diagnostic::info(DiagnosticKind::DuplicateJob { hash: "abc".into() })
      .in_context("inner")
      .in_context("outer");
    assert_eq!(diag.context.as_deref(), Some("inner"));
  }

  #[test]
  fn serializes_flat() {
    let diag = Diagnostic::info(DiagnosticKind::BaselineOnly {
      toolchain: "linux/gcc-4.9".into(),
    });
    let json = serde_json::to_value(&diag).unwrap();
    assert_eq!(json["kind"], "baseline_only");
    assert_eq!(json["severity"], "info");
    assert_eq!(json["toolchain"], "linux/gcc-4.9");
  }
}

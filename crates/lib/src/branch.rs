//! Feature branches: the caller-declared combinations the expander fans out over.
//!
//! A branch is a named set of fixed assignments. Branches are listed, never
//! generated as a cross-product, so meaningless cells such as
//! "BTC with Keoken" are simply never declared.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::config::MatrixConfig;
use crate::options::{Currency, OptionMap, OptionRoles, OptionSchema, SchemaError};

#[derive(Debug, Error)]
pub enum BranchError {
  #[error("failed to read branch file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse branch file: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("branch '{0}' is declared twice")]
  Duplicate(String),

  #[error("branch '{name}': {source}")]
  Assignment {
    name: String,
    #[source]
    source: SchemaError,
  },
}

/// A named set of option assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBranch {
  pub name: String,
  #[serde(default)]
  pub set: BTreeMap<String, serde_json::Value>,
}

impl FeatureBranch {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      set: BTreeMap::new(),
    }
  }

  pub fn with(mut self, option: impl Into<String>, value: serde_json::Value) -> Self {
    self.set.insert(option.into(), value);
    self
  }

  /// Clone `base` and apply this branch's assignments, type-checked by `schema`.
  pub fn apply(&self, schema: &OptionSchema, base: &OptionMap) -> Result<OptionMap, BranchError> {
    let mut options = base.clone();
    for (option, raw) in &self.set {
      let name = schema.canonical_name(option);
      let value = schema.coerce(name, raw).map_err(|source| BranchError::Assignment {
        name: self.name.clone(),
        source,
      })?;
      options.set(name, value);
    }
    Ok(options)
  }

  fn currency(&self, roles: &OptionRoles) -> Option<Currency> {
    self
      .set
      .get(&roles.currency)
      .and_then(|v| v.as_str())
      .and_then(|s| s.parse().ok())
  }
}

#[derive(Debug, Deserialize)]
struct BranchFile {
  #[serde(default, rename = "branch")]
  branches: Vec<FeatureBranch>,
}

/// The ordered list of branches one base tuple is expanded into.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchPlan {
  branches: Vec<FeatureBranch>,
}

impl BranchPlan {
  pub fn new(branches: Vec<FeatureBranch>) -> Result<Self, BranchError> {
    let mut seen = HashSet::new();
    for branch in &branches {
      if !seen.insert(branch.name.as_str()) {
        return Err(BranchError::Duplicate(branch.name.clone()));
      }
    }
    Ok(Self { branches })
  }

  /// The full sweep: BCH with and without Keoken, then BTC.
  pub fn sweep(roles: &OptionRoles) -> Self {
    Self {
      branches: vec![
        keoken_branch(roles),
        FeatureBranch::new("bch")
          .with(&roles.currency, json!(Currency::Bch.as_str()))
          .with(&roles.keoken, json!(false)),
        FeatureBranch::new("btc").with(&roles.currency, json!(Currency::Btc.as_str())),
      ],
    }
  }

  /// Single-currency mode: that currency, preceded by a Keoken branch when
  /// the currency supports it. The plain branch then pins Keoken off.
  pub fn single(roles: &OptionRoles, currency: Currency) -> Self {
    let mut branches = Vec::new();
    let mut plain =
      FeatureBranch::new(currency.as_str().to_ascii_lowercase()).with(&roles.currency, json!(currency.as_str()));
    if currency.supports_keoken() {
      branches.push(keoken_branch(roles));
      plain = plain.with(&roles.keoken, json!(false));
    }
    branches.push(plain);
    Self { branches }
  }

  /// Builtin plan for the directives in `config`.
  pub fn from_config(roles: &OptionRoles, config: &MatrixConfig) -> Self {
    match config.currency {
      Some(currency) => Self::single(roles, currency),
      None => Self::sweep(roles),
    }
  }

  /// Load branches from a TOML file of `[[branch]]` tables.
  pub fn load(path: &Path) -> Result<Self, BranchError> {
    let content = std::fs::read_to_string(path).map_err(|source| BranchError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_toml_str(&content)
  }

  pub fn from_toml_str(content: &str) -> Result<Self, BranchError> {
    let file: BranchFile = toml::from_str(content)?;
    Self::new(file.branches)
  }

  /// Narrow a declared plan to one currency.
  ///
  /// Branches pinned to another currency are dropped; branches that leave the
  /// currency open are pinned to `currency`.
  pub fn for_currency(self, roles: &OptionRoles, currency: Currency) -> Self {
    let branches = self
      .branches
      .into_iter()
      .filter(|b| b.currency(roles).map(|c| c == currency).unwrap_or(true))
      .map(|b| b.with(&roles.currency, json!(currency.as_str())))
      .collect();
    Self { branches }
  }

  pub fn branches(&self) -> &[FeatureBranch] {
    &self.branches
  }

  pub fn len(&self) -> usize {
    self.branches.len()
  }

  pub fn is_empty(&self) -> bool {
    self.branches.is_empty()
  }
}

fn keoken_branch(roles: &OptionRoles) -> FeatureBranch {
  FeatureBranch::new("bch-keoken")
    .with(&roles.currency, json!(Currency::Bch.as_str()))
    .with(&roles.keoken, json!(true))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::schema;

  fn names(plan: &BranchPlan) -> Vec<&str> {
    plan.branches().iter().map(|b| b.name.as_str()).collect()
  }

  #[test]
  fn sweep_declares_three_branches() {
    let schema = schema();
    assert_eq!(names(&BranchPlan::sweep(&schema.roles)), ["bch-keoken", "bch", "btc"]);
  }

  #[test]
  fn single_bch_adds_keoken_branch() {
    let schema = schema();
    let plan = BranchPlan::single(&schema.roles, Currency::Bch);
    assert_eq!(names(&plan), ["bch-keoken", "bch"]);
    assert_eq!(plan.branches()[0].set.get("keoken"), Some(&json!(true)));
    assert_eq!(plan.branches()[1].set.get("keoken"), Some(&json!(false)));
  }

  #[test]
  fn single_btc_has_no_keoken_branch() {
    let schema = schema();
    let plan = BranchPlan::single(&schema.roles, Currency::Btc);
    assert_eq!(names(&plan), ["btc"]);
    assert!(!plan.branches()[0].set.contains_key("keoken"));
  }

  #[test]
  fn apply_type_checks_assignments() {
    let schema = schema();
    let branch = FeatureBranch::new("bad").with("currency", json!("XMR"));
    let err = branch.apply(&schema, &schema.defaults()).unwrap_err();
    assert!(matches!(err, BranchError::Assignment { name, .. } if name == "bad"));
  }

  #[test]
  fn apply_clones_rather_than_mutates() {
    let schema = schema();
    let base = schema.defaults();
    let branched = FeatureBranch::new("btc")
      .with("currency", json!("BTC"))
      .apply(&schema, &base)
      .unwrap();
    assert_eq!(base.get_str("currency"), Some("BCH"));
    assert_eq!(branched.get_str("currency"), Some("BTC"));
  }

  #[test]
  fn loads_storage_branches_from_toml() {
    let plan = BranchPlan::from_toml_str(
      r#"
        [[branch]]
        name = "bch-full"
        [branch.set]
        currency = "BCH"
        db = "full"

        [[branch]]
        name = "bch"
        [branch.set]
        currency = "BCH"

        [[branch]]
        name = "any-legacy"
        [branch.set]
        db = "legacy"
      "#,
    )
    .unwrap();
    assert_eq!(names(&plan), ["bch-full", "bch", "any-legacy"]);
    assert_eq!(plan.branches()[0].set.get("db"), Some(&json!("full")));
  }

  #[test]
  fn duplicate_names_rejected() {
    let err = BranchPlan::new(vec![FeatureBranch::new("a"), FeatureBranch::new("a")]).unwrap_err();
    assert!(matches!(err, BranchError::Duplicate(name) if name == "a"));
  }

  #[test]
  fn for_currency_drops_other_currencies() {
    let schema = schema();
    let plan = BranchPlan::sweep(&schema.roles).for_currency(&schema.roles, Currency::Btc);
    assert_eq!(names(&plan), ["btc"]);

    let open = BranchPlan::new(vec![FeatureBranch::new("legacy").with("db", json!("legacy"))])
      .unwrap()
      .for_currency(&schema.roles, Currency::Ltc);
    assert_eq!(open.branches()[0].set.get("currency"), Some(&json!("LTC")));
  }
}

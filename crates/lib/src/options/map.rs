//! A concrete option assignment for one package build.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::value::OptionValue;
use crate::consts::DEPENDENCY_SCOPE;

/// Option values for the package being built.
///
/// Three namespaces are kept apart:
/// - `values`: the package's own options (`pkg:name`)
/// - `dependencies`: values forced on every package in the graph (`*:name`)
/// - `foreign`: options upstream scoped to some other package, carried verbatim
///
/// All maps are [`BTreeMap`]s so serialization and hashing are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionMap {
  package: String,
  values: BTreeMap<String, OptionValue>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  dependencies: BTreeMap<String, OptionValue>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  foreign: BTreeMap<String, OptionValue>,
}

impl OptionMap {
  pub fn new(package: impl Into<String>) -> Self {
    Self {
      package: package.into(),
      values: BTreeMap::new(),
      dependencies: BTreeMap::new(),
      foreign: BTreeMap::new(),
    }
  }

  pub fn package(&self) -> &str {
    &self.package
  }

  pub fn get(&self, name: &str) -> Option<&OptionValue> {
    self.values.get(name)
  }

  pub fn get_bool(&self, name: &str) -> Option<bool> {
    self.get(name).and_then(OptionValue::as_bool)
  }

  pub fn get_str(&self, name: &str) -> Option<&str> {
    self.get(name).and_then(OptionValue::as_str)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }

  /// Set an option, returning the previous value.
  pub fn set(&mut self, name: impl Into<String>, value: OptionValue) -> Option<OptionValue> {
    self.values.insert(name.into(), value)
  }

  /// Remove an option entirely (the recipe layer's `del options.x`).
  pub fn remove(&mut self, name: &str) -> Option<OptionValue> {
    self.values.remove(name)
  }

  pub fn dependency(&self, name: &str) -> Option<&OptionValue> {
    self.dependencies.get(name)
  }

  pub fn set_dependency(&mut self, name: impl Into<String>, value: OptionValue) {
    self.dependencies.insert(name.into(), value);
  }

  pub fn remove_dependency(&mut self, name: &str) -> Option<OptionValue> {
    self.dependencies.remove(name)
  }

  pub fn set_foreign(&mut self, key: impl Into<String>, value: OptionValue) {
    self.foreign.insert(key.into(), value);
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
    self.values.iter()
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Fully qualified key for one of this package's options.
  pub fn scoped_key(&self, name: &str) -> String {
    format!("{}:{}", self.package, name)
  }

  /// Flatten every namespace into `scope:name -> value` strings.
  ///
  /// This is the shape the recipe layer consumes and the one used for logs.
  pub fn to_flat(&self) -> BTreeMap<String, String> {
    let own = self.values.iter().map(|(k, v)| (self.scoped_key(k), v.to_string()));
    let deps = self
      .dependencies
      .iter()
      .map(|(k, v)| (format!("{DEPENDENCY_SCOPE}:{k}"), v.to_string()));
    let foreign = self.foreign.iter().map(|(k, v)| (k.clone(), v.to_string()));
    own.chain(deps).chain(foreign).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn set_returns_previous_value() {
    let mut map = OptionMap::new("kth-node");
    assert_eq!(map.set("keoken", OptionValue::Bool(false)), None);
    assert_eq!(
      map.set("keoken", OptionValue::Bool(true)),
      Some(OptionValue::Bool(false))
    );
    assert_eq!(map.get_bool("keoken"), Some(true));
  }

  #[test]
  fn flat_view_scopes_every_namespace() {
    let mut map = OptionMap::new("kth-node");
    map.set("currency", OptionValue::Enum("BCH".into()));
    map.set_dependency("currency", OptionValue::Enum("BCH".into()));
    map.set_foreign("boost:shared", OptionValue::Bool(false));

    let flat = map.to_flat();
    assert_eq!(flat.get("kth-node:currency").map(String::as_str), Some("BCH"));
    assert_eq!(flat.get("*:currency").map(String::as_str), Some("BCH"));
    assert_eq!(flat.get("boost:shared").map(String::as_str), Some("False"));
  }

  #[test]
  fn clones_are_independent() {
    let mut base = OptionMap::new("kth-node");
    base.set("db", OptionValue::Enum("default".into()));
    let mut branch = base.clone();
    branch.set("db", OptionValue::Enum("full".into()));
    assert_eq!(base.get_str("db"), Some("default"));
    assert_eq!(branch.get_str("db"), Some("full"));
  }
}

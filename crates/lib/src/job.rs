//! Build jobs and the base tuples they are expanded from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::options::{OptionMap, OptionSchema, SchemaError};
use crate::settings::Settings;
use crate::util::hash::Hashable;

/// One fully resolved, schedulable build configuration.
///
/// Jobs are value objects: two jobs with the same fields are interchangeable,
/// and [`Hashable::compute_hash`] gives them the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
  pub settings: Settings,
  pub options: OptionMap,
  /// Environment variables the runner applies for this job only.
  #[serde(default)]
  pub env: BTreeMap<String, String>,
  /// Upstream references forced for this job, in order.
  #[serde(default)]
  pub build_requires: Vec<String>,
  #[serde(default)]
  pub reference: Option<String>,
}

impl Hashable for Job {}

impl Job {
  pub fn new(settings: Settings, options: OptionMap) -> Self {
    Self {
      settings,
      options,
      env: BTreeMap::new(),
      build_requires: Vec::new(),
      reference: None,
    }
  }

  /// Same job with a different option map.
  pub fn with_options(&self, options: OptionMap) -> Self {
    Self {
      settings: self.settings.clone(),
      options,
      env: self.env.clone(),
      build_requires: self.build_requires.clone(),
      reference: self.reference.clone(),
    }
  }
}

/// A base tuple as the upstream enumerator hands it over.
///
/// Options are raw `scope:name -> value` pairs; [`BaseTuple::into_job`]
/// type-checks them against a schema on top of its defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseTuple {
  pub settings: Settings,
  #[serde(default)]
  pub options: BTreeMap<String, serde_json::Value>,
  #[serde(default)]
  pub env: BTreeMap<String, String>,
  #[serde(default)]
  pub build_requires: Vec<String>,
  #[serde(default)]
  pub reference: Option<String>,
}

impl BaseTuple {
  pub fn into_job(self, schema: &OptionSchema) -> Result<Job, SchemaError> {
    let options = schema.assign(&self.options)?;
    Ok(Job {
      settings: self.settings,
      options,
      env: self.env,
      build_requires: self.build_requires,
      reference: self.reference,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::gcc_settings;

  #[test]
  fn identical_jobs_share_a_hash() {
    let schema = OptionSchema::builtin().unwrap();
    let a = Job::new(gcc_settings("9"), schema.defaults());
    let b = a.clone();
    assert_eq!(a.compute_hash().unwrap(), b.compute_hash().unwrap());
  }

  #[test]
  fn option_change_changes_hash() {
    let schema = OptionSchema::builtin().unwrap();
    let a = Job::new(gcc_settings("9"), schema.defaults());
    let mut options = a.options.clone();
    options.set("mining", crate::options::OptionValue::Bool(true));
    let b = a.with_options(options);
    assert_ne!(a.compute_hash().unwrap(), b.compute_hash().unwrap());
  }

  #[test]
  fn base_tuple_applies_schema_defaults() {
    let schema = OptionSchema::builtin().unwrap();
    let tuple: BaseTuple = serde_json::from_str(
      r#"{
        "settings": {"os":"Linux","compiler":"gcc","compiler.version":"9","arch":"x86_64","build_type":"Release"},
        "options": {"kth-node:shared": false, "kth-node:currency": "BTC"},
        "env": {"CONAN_CPU_COUNT": "4"}
      }"#,
    )
    .unwrap();
    let job = tuple.into_job(&schema).unwrap();
    assert_eq!(job.options.get_str("currency"), Some("BTC"));
    assert_eq!(job.options.get_str("db"), Some("default"));
    assert_eq!(job.env.get("CONAN_CPU_COUNT").map(String::as_str), Some("4"));
    assert!(job.build_requires.is_empty());
  }

  #[test]
  fn job_round_trips_through_json() {
    let schema = OptionSchema::builtin().unwrap();
    let job = Job::new(gcc_settings("9"), schema.defaults());
    let json = serde_json::to_string(&job).unwrap();
    let back: Job = serde_json::from_str(&json).unwrap();
    assert_eq!(job, back);
  }
}

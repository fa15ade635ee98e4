//! Process-level directives for one matrix run.
//!
//! Directives are read from the environment once, at startup, into an
//! immutable [`MatrixConfig`] that is handed to the expander. Nothing below
//! this module reads the environment.
//!
//! | Variable          | Meaning                                   | Default |
//! |-------------------|-------------------------------------------|---------|
//! | `KTH_RUN_TESTS`   | enable the test option on test carriers   | false   |
//! | `KTH_FULL_BUILD`  | sweep all supported microarchitectures    | false   |
//! | `KTH_CI_CURRENCY` | build a single currency instead of a sweep | unset  |
//! | `KTH_MARCH_TABLE` | support table file replacing the builtin  | unset   |

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::consts::{ENV_CI_CURRENCY, ENV_FULL_BUILD, ENV_MARCH_TABLE, ENV_RUN_TESTS};
use crate::march::{MarchId, default_candidates};
use crate::options::{Currency, ParseChoiceError};

/// Malformed directives. These are caller errors and abort the run.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("{var} must be a boolean (true/false/1/0), got '{value}'")]
  InvalidFlag { var: String, value: String },

  #[error("{var}: {source}")]
  InvalidCurrency {
    var: String,
    #[source]
    source: ParseChoiceError,
  },

  #[error("{var} is not valid unicode")]
  NotUnicode { var: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixConfig {
  pub run_tests: bool,
  pub full_build: bool,
  /// Single-currency mode when set.
  pub currency: Option<Currency>,
  /// Microarchitectures swept by full builds, before filtering.
  pub candidates: Vec<MarchId>,
  /// Preferred test-carrying microarchitecture; the support table's
  /// baseline when unset.
  pub test_march: Option<MarchId>,
  pub march_table: Option<PathBuf>,
}

impl Default for MatrixConfig {
  fn default() -> Self {
    Self {
      run_tests: false,
      full_build: false,
      currency: None,
      candidates: default_candidates(),
      test_march: None,
      march_table: None,
    }
  }
}

impl MatrixConfig {
  /// Read every directive from the process environment.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut config = Self::default();

    if let Some(value) = env_var(ENV_RUN_TESTS)? {
      config.run_tests = parse_flag(ENV_RUN_TESTS, &value)?;
    }
    if let Some(value) = env_var(ENV_FULL_BUILD)? {
      config.full_build = parse_flag(ENV_FULL_BUILD, &value)?;
    }
    if let Some(value) = env_var(ENV_CI_CURRENCY)? {
      let currency = value.parse::<Currency>().map_err(|source| ConfigError::InvalidCurrency {
        var: ENV_CI_CURRENCY.to_string(),
        source,
      })?;
      config.currency = Some(currency);
    }
    if let Some(value) = env_var(ENV_MARCH_TABLE)? {
      config.march_table = Some(PathBuf::from(value));
    }

    Ok(config)
  }

  /// Candidate list for this run: the full sweep or just `baseline`.
  ///
  /// A full sweep always includes `baseline`, leading the list when the
  /// configured candidates leave it out.
  pub fn marchs(&self, baseline: &MarchId) -> Vec<MarchId> {
    if !self.full_build {
      return vec![baseline.clone()];
    }
    let mut marchs = self.candidates.clone();
    if !marchs.contains(baseline) {
      marchs.insert(0, baseline.clone());
    }
    marchs
  }

  /// Whether several microarchitectures compete for the test run.
  pub fn restricts_marchs(&self, baseline: &MarchId) -> bool {
    self.marchs(baseline).len() > 1
  }

  /// `test_march`, falling back to `baseline`.
  pub fn carrier_march<'a>(&'a self, baseline: &'a MarchId) -> &'a MarchId {
    self.test_march.as_ref().unwrap_or(baseline)
  }
}

/// Unset and empty variables both count as absent.
fn env_var(name: &str) -> Result<Option<String>, ConfigError> {
  match std::env::var(name) {
    Ok(value) if value.trim().is_empty() => Ok(None),
    Ok(value) => Ok(Some(value)),
    Err(std::env::VarError::NotPresent) => Ok(None),
    Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { var: name.to_string() }),
  }
}

fn parse_flag(var: &str, value: &str) -> Result<bool, ConfigError> {
  match value.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Ok(true),
    "0" | "false" | "no" | "off" => Ok(false),
    _ => Err(ConfigError::InvalidFlag {
      var: var.to_string(),
      value: value.to_string(),
    }),
  }
}

//! Tagged option values and the typed enumerations the resolver reasons about.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single option value.
///
/// Enumerations keep their textual form; the schema guarantees the string is
/// one of the declared choices. Typed views such as [`Currency`] and
/// [`DbMode`] are parsed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionValue {
  Bool(bool),
  Enum(String),
  Text(String),
}

impl OptionValue {
  pub fn as_bool(&self) -> Option<bool> {
    match self {
      OptionValue::Bool(b) => Some(*b),
      _ => None,
    }
  }

  /// The string payload of an enum or free-text value.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      OptionValue::Enum(s) | OptionValue::Text(s) => Some(s),
      OptionValue::Bool(_) => None,
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      OptionValue::Bool(_) => "bool",
      OptionValue::Enum(_) => "enum",
      OptionValue::Text(_) => "text",
    }
  }
}

impl fmt::Display for OptionValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      // The recipe layer spells booleans with a capital letter.
      OptionValue::Bool(true) => write!(f, "True"),
      OptionValue::Bool(false) => write!(f, "False"),
      OptionValue::Enum(s) | OptionValue::Text(s) => write!(f, "{s}"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseChoiceError {
  pub kind: &'static str,
  pub value: String,
  pub expected: &'static str,
}

/// Currency flavor the node is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
  Bch,
  Btc,
  Ltc,
}

impl Currency {
  pub const ALL: [Currency; 3] = [Currency::Bch, Currency::Btc, Currency::Ltc];

  pub fn as_str(&self) -> &'static str {
    match self {
      Currency::Bch => "BCH",
      Currency::Btc => "BTC",
      Currency::Ltc => "LTC",
    }
  }

  /// Whether the Keoken extension can be compiled for this currency.
  pub fn supports_keoken(&self) -> bool {
    matches!(self, Currency::Bch)
  }
}

impl FromStr for Currency {
  type Err = ParseChoiceError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_uppercase().as_str() {
      "BCH" => Ok(Currency::Bch),
      "BTC" => Ok(Currency::Btc),
      "LTC" => Ok(Currency::Ltc),
      _ => Err(ParseChoiceError {
        kind: "currency",
        value: s.to_string(),
        expected: "BCH, BTC, LTC",
      }),
    }
  }
}

impl fmt::Display for Currency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Storage backend layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DbMode {
  Legacy,
  LegacyFull,
  Pruned,
  Default,
  Full,
}

impl DbMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      DbMode::Legacy => "legacy",
      DbMode::LegacyFull => "legacy_full",
      DbMode::Pruned => "pruned",
      DbMode::Default => "default",
      DbMode::Full => "full",
    }
  }

  /// Keoken needs the full transaction index.
  pub fn supports_keoken(&self) -> bool {
    !matches!(self, DbMode::Pruned | DbMode::Default)
  }
}

impl FromStr for DbMode {
  type Err = ParseChoiceError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "legacy" => Ok(DbMode::Legacy),
      "legacy_full" => Ok(DbMode::LegacyFull),
      "pruned" => Ok(DbMode::Pruned),
      "default" => Ok(DbMode::Default),
      "full" => Ok(DbMode::Full),
      _ => Err(ParseChoiceError {
        kind: "storage mode",
        value: s.to_string(),
        expected: "legacy, legacy_full, pruned, default, full",
      }),
    }
  }
}

impl fmt::Display for DbMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn currency_parse_is_case_insensitive() {
    assert_eq!("bch".parse::<Currency>(), Ok(Currency::Bch));
    assert_eq!("BTC".parse::<Currency>(), Ok(Currency::Btc));
    let err = "DOGE".parse::<Currency>().unwrap_err();
    assert!(err.to_string().contains("DOGE"));
  }

  #[test]
  fn keoken_storage_compatibility() {
    assert!(DbMode::Full.supports_keoken());
    assert!(DbMode::LegacyFull.supports_keoken());
    assert!(!DbMode::Pruned.supports_keoken());
    assert!(!DbMode::Default.supports_keoken());
  }

  #[test]
  fn bools_display_like_the_recipe_layer() {
    assert_eq!(OptionValue::Bool(true).to_string(), "True");
    assert_eq!(OptionValue::Enum("BCH".into()).to_string(), "BCH");
  }
}

//! Versioned option schema.
//!
//! The schema is data: a TOML document naming the package, declaring every
//! option with its kind and default, assigning the options the resolver
//! reasons about to fixed roles, and listing migrations from older recipe
//! versions. Recipe revisions change the document, never the resolver.
//!
//! # Example
//!
//! ```toml
//! package = "kth-node"
//! version = 2
//! propagate = ["currency", "db"]
//!
//! [roles]
//! currency = "currency"
//! # ...
//!
//! [options.currency]
//! kind = "enum"
//! values = ["BCH", "BTC", "LTC"]
//! default = "BCH"
//!
//! [migrations.renamed]
//! microarchitecture = "march_id"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::map::OptionMap;
use super::value::OptionValue;
use crate::consts::DEPENDENCY_SCOPE;

const BUILTIN_SCHEMA: &str = include_str!("../../data/node-schema.toml");

/// Errors raised while loading a schema or assigning values against it.
#[derive(Debug, Error)]
pub enum SchemaError {
  #[error("failed to read schema {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse schema: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("role '{role}' refers to undeclared option '{name}'")]
  UnknownRole { role: &'static str, name: String },

  #[error("propagated option '{0}' is not declared")]
  UnknownPropagated(String),

  #[error("default '{default}' of option '{name}' is not one of its values")]
  InvalidDefault { name: String, default: String },

  #[error("unknown option '{0}'")]
  UnknownOption(String),

  #[error("option '{name}' expects a {expected} value, got {found}")]
  WrongType {
    name: String,
    expected: &'static str,
    found: String,
  },

  #[error("invalid value '{value}' for option '{name}' (allowed: {allowed})")]
  InvalidChoice {
    name: String,
    value: String,
    allowed: String,
  },
}

/// Declaration of a single option.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OptionDecl {
  Bool { default: bool },
  Enum { values: Vec<String>, default: String },
  Text { default: String },
}

impl OptionDecl {
  pub fn default_value(&self) -> OptionValue {
    match self {
      OptionDecl::Bool { default } => OptionValue::Bool(*default),
      OptionDecl::Enum { default, .. } => OptionValue::Enum(default.clone()),
      OptionDecl::Text { default } => OptionValue::Text(default.clone()),
    }
  }

  fn kind(&self) -> &'static str {
    match self {
      OptionDecl::Bool { .. } => "bool",
      OptionDecl::Enum { .. } => "enum",
      OptionDecl::Text { .. } => "text",
    }
  }
}

/// Option names playing the roles the resolver and expander need.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OptionRoles {
  pub shared: String,
  pub tests: String,
  pub currency: String,
  pub db: String,
  pub keoken: String,
  pub march: String,
  pub fix_march: String,
}

impl OptionRoles {
  fn entries(&self) -> [(&'static str, &str); 7] {
    [
      ("shared", &self.shared),
      ("tests", &self.tests),
      ("currency", &self.currency),
      ("db", &self.db),
      ("keoken", &self.keoken),
      ("march", &self.march),
      ("fix_march", &self.fix_march),
    ]
  }
}

/// Rename and value-alias rules applied to incoming assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Migrations {
  #[serde(default)]
  pub renamed: BTreeMap<String, String>,
  #[serde(default)]
  pub aliases: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OptionSchema {
  pub package: String,
  pub version: u32,
  pub roles: OptionRoles,
  pub options: BTreeMap<String, OptionDecl>,
  #[serde(default)]
  pub propagate: Vec<String>,
  #[serde(default)]
  pub migrations: Migrations,
}

impl OptionSchema {
  /// The schema shipped with the crate.
  pub fn builtin() -> Result<Self, SchemaError> {
    Self::from_toml_str(BUILTIN_SCHEMA)
  }

  pub fn load(path: &Path) -> Result<Self, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_toml_str(&content)
  }

  pub fn from_toml_str(content: &str) -> Result<Self, SchemaError> {
    let schema: OptionSchema = toml::from_str(content)?;
    schema.validate()?;
    Ok(schema)
  }

  fn validate(&self) -> Result<(), SchemaError> {
    for (role, name) in self.roles.entries() {
      if !self.options.contains_key(name) {
        return Err(SchemaError::UnknownRole {
          role,
          name: name.to_string(),
        });
      }
    }
    for name in &self.propagate {
      if !self.options.contains_key(name) {
        return Err(SchemaError::UnknownPropagated(name.clone()));
      }
    }
    for (name, decl) in &self.options {
      if let OptionDecl::Enum { values, default } = decl {
        if !values.contains(default) {
          return Err(SchemaError::InvalidDefault {
            name: name.clone(),
            default: default.clone(),
          });
        }
      }
    }
    Ok(())
  }

  pub fn decl(&self, name: &str) -> Option<&OptionDecl> {
    self.options.get(name)
  }

  /// Current name of an option, following rename migrations.
  pub fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
    self.migrations.renamed.get(name).map(String::as_str).unwrap_or(name)
  }

  /// An option map holding every declared default.
  pub fn defaults(&self) -> OptionMap {
    let mut map = OptionMap::new(&self.package);
    for (name, decl) in &self.options {
      map.set(name.clone(), decl.default_value());
    }
    map
  }

  /// Type-check a raw value against the declaration of `name`.
  ///
  /// `name` must already be canonical. Booleans accept JSON booleans and the
  /// recipe layer's `"True"`/`"False"` strings; enum values go through the
  /// alias migrations before the membership check.
  pub fn coerce(&self, name: &str, raw: &serde_json::Value) -> Result<OptionValue, SchemaError> {
    let decl = self
      .decl(name)
      .ok_or_else(|| SchemaError::UnknownOption(name.to_string()))?;

    let wrong_type = || SchemaError::WrongType {
      name: name.to_string(),
      expected: decl.kind(),
      found: raw.to_string(),
    };

    match decl {
      OptionDecl::Bool { .. } => match raw {
        serde_json::Value::Bool(b) => Ok(OptionValue::Bool(*b)),
        serde_json::Value::String(s) => parse_bool(s).map(OptionValue::Bool).ok_or_else(wrong_type),
        _ => Err(wrong_type()),
      },
      OptionDecl::Enum { values, .. } => {
        let text = scalar_text(raw).ok_or_else(wrong_type)?;
        let text = self
          .migrations
          .aliases
          .get(name)
          .and_then(|aliases| aliases.get(&text))
          .cloned()
          .unwrap_or(text);
        if values.contains(&text) {
          Ok(OptionValue::Enum(text))
        } else {
          Err(SchemaError::InvalidChoice {
            name: name.to_string(),
            value: text,
            allowed: values.join(", "),
          })
        }
      }
      OptionDecl::Text { .. } => scalar_text(raw).map(OptionValue::Text).ok_or_else(wrong_type),
    }
  }

  /// Build an option map from schema defaults overridden by `overrides`.
  ///
  /// Keys may be bare (`currency`), scoped to this package (`kth-node:currency`),
  /// scoped to the whole graph (`*:currency`), or scoped to another package,
  /// which is carried through untouched.
  pub fn assign(&self, overrides: &BTreeMap<String, serde_json::Value>) -> Result<OptionMap, SchemaError> {
    let mut map = self.defaults();

    for (key, raw) in overrides {
      match key.split_once(':') {
        Some((scope, name)) if scope == DEPENDENCY_SCOPE => {
          let name = self.canonical_name(name);
          map.set_dependency(name, self.coerce(name, raw)?);
        }
        Some((scope, name)) if scope == self.package => {
          let name = self.canonical_name(name);
          map.set(name, self.coerce(name, raw)?);
        }
        Some(_) => {
          let value = match raw {
            serde_json::Value::Bool(b) => OptionValue::Bool(*b),
            other => OptionValue::Text(scalar_text(other).unwrap_or_else(|| other.to_string())),
          };
          map.set_foreign(key.clone(), value);
        }
        None => {
          let name = self.canonical_name(key);
          map.set(name, self.coerce(name, raw)?);
        }
      }
    }

    Ok(map)
  }
}

fn parse_bool(s: &str) -> Option<bool> {
  match s.trim().to_ascii_lowercase().as_str() {
    "true" => Some(true),
    "false" => Some(false),
    _ => None,
  }
}

fn scalar_text(raw: &serde_json::Value) -> Option<String> {
  match raw {
    serde_json::Value::String(s) => Some(s.clone()),
    serde_json::Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

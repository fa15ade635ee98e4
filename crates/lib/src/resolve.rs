//! Constraint resolution for a single option map.
//!
//! The resolver applies the package's feature-compatibility rules in a fixed
//! order, each rule seeing the effect of the previous ones:
//!
//! 1. Off x86_64 the microarchitecture options mean nothing and are removed.
//! 2. On x86_64 without an explicit microarchitecture, `fix_march` is removed.
//! 3. Keoken is dropped for currencies other than BCH, and forces a storage
//!    mode that keeps the full index.
//! 4. The propagated subset is mirrored into the dependency namespace.
//!
//! Resolution never fails. Incompatible requests degrade to a buildable
//! combination and every change is reported as a [`Diagnostic`].

use tracing::{debug, warn};

use crate::consts::UNSET_SENTINEL;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::march::MarchId;
use crate::options::{Currency, DbMode, OptionMap, OptionSchema, OptionValue};
use crate::settings::Settings;

/// Resolved options plus everything the resolver changed on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
  pub options: OptionMap,
  pub diagnostics: Vec<Diagnostic>,
}

pub struct Resolver<'a> {
  schema: &'a OptionSchema,
}

impl<'a> Resolver<'a> {
  pub fn new(schema: &'a OptionSchema) -> Self {
    Self { schema }
  }

  pub fn resolve(&self, settings: &Settings, mut options: OptionMap) -> Resolution {
    let mut diagnostics = Vec::new();
    let roles = &self.schema.roles;

    let march_applies = settings.arch().map(|a| a.supports_march()).unwrap_or(false);
    if !march_applies {
      for name in [&roles.march, &roles.fix_march] {
        if options.remove(name).is_some() {
          let reason = format!(
            "microarchitecture is disabled for architectures other than x86_64 (arch: {})",
            settings.arch
          );
          debug!(option = %name, arch = %settings.arch, "removing option");
          diagnostics.push(Diagnostic::info(DiagnosticKind::Removed {
            option: name.clone(),
            reason,
          }));
        }
      }
    } else if options.get_str(&roles.march) == Some(UNSET_SENTINEL) && options.remove(&roles.fix_march).is_some() {
      debug!(option = %roles.fix_march, "no microarchitecture requested, dropping fix option");
      diagnostics.push(Diagnostic::info(DiagnosticKind::Removed {
        option: roles.fix_march.clone(),
        reason: "only meaningful together with an explicit microarchitecture".to_string(),
      }));
    }

    let currency = options.get_str(&roles.currency).and_then(|c| c.parse::<Currency>().ok());
    let keoken_requested = options.get_bool(&roles.keoken).unwrap_or(false);

    if keoken_requested && !currency.map(|c| c.supports_keoken()).unwrap_or(false) {
      let shown = options.get_str(&roles.currency).unwrap_or("unset").to_string();
      warn!(currency = %shown, "Keoken is only enabled for BCH, building without Keoken support");
      options.remove(&roles.keoken);
      diagnostics.push(Diagnostic::warning(DiagnosticKind::Removed {
        option: roles.keoken.clone(),
        reason: format!("Keoken is only enabled for BCH, not {shown}"),
      }));
    }

    if options.get_bool(&roles.keoken) == Some(true) {
      let db = options.get_str(&roles.db).and_then(|d| d.parse::<DbMode>().ok());
      if let Some(mode) = db.filter(|m| !m.supports_keoken()) {
        warn!(db = %mode, "Keoken needs a full storage index, switching to full");
        options.set(roles.db.clone(), OptionValue::Enum(DbMode::Full.as_str().to_string()));
        diagnostics.push(Diagnostic::warning(DiagnosticKind::Coerced {
          option: roles.db.clone(),
          from: mode.as_str().to_string(),
          to: DbMode::Full.as_str().to_string(),
          reason: "Keoken requires a storage mode with the full index".to_string(),
        }));
      }
    }

    self.propagate(&mut options);

    Resolution { options, diagnostics }
  }

  /// Clone `options` with the microarchitecture set to `march`.
  pub fn bind_march(&self, options: &OptionMap, march: &MarchId) -> OptionMap {
    let mut bound = options.clone();
    let name = &self.schema.roles.march;
    bound.set(name.clone(), OptionValue::Text(march.to_string()));
    if self.schema.propagate.contains(name) {
      bound.set_dependency(name.clone(), OptionValue::Text(march.to_string()));
    }
    bound
  }

  fn propagate(&self, options: &mut OptionMap) {
    for name in &self.schema.propagate {
      match options.get(name).cloned() {
        Some(value) => options.set_dependency(name.clone(), value),
        None => {
          options.remove_dependency(name);
        }
      }
    }
  }
}

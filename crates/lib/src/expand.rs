//! Fanning one base job out across feature branches and microarchitectures.
//!
//! For every declared branch, in order, the base options are cloned, the
//! branch assignments applied, and the result resolved once. Each accepted
//! microarchitecture then gets its own clone of the resolved options. Jobs
//! come out in branch order, then in accepted-microarchitecture order.

use tracing::{debug, warn};

use crate::branch::{BranchError, BranchPlan, FeatureBranch};
use crate::collect::{TestPolicy, assign_test_flag};
use crate::config::MatrixConfig;
use crate::diagnostic::Diagnostic;
use crate::job::Job;
use crate::march::{MarchFilter, MarchId, test_carrier};
use crate::options::{OptionSchema, OptionValue};
use crate::resolve::Resolver;
use crate::settings::Settings;

/// Jobs produced from one base, with the diagnostics raised on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
  pub jobs: Vec<Job>,
  pub diagnostics: Vec<Diagnostic>,
}

pub struct Expander<'a> {
  config: &'a MatrixConfig,
  schema: &'a OptionSchema,
  filter: &'a MarchFilter,
}

impl<'a> Expander<'a> {
  pub fn new(config: &'a MatrixConfig, schema: &'a OptionSchema, filter: &'a MarchFilter) -> Self {
    Self { config, schema, filter }
  }

  /// One job per (branch, accepted microarchitecture) pair.
  ///
  /// Off x86_64 the microarchitecture dimension collapses and each branch
  /// yields a single job without a microarchitecture option.
  pub fn expand(&self, base: &Job, branches: &[FeatureBranch], candidates: &[MarchId]) -> Result<Expansion, BranchError> {
    let resolver = Resolver::new(self.schema);
    let label = base_label(&base.settings);
    let mut expansion = Expansion::default();

    let accepted = self.accepted_marchs(base, candidates, &label, &mut expansion);

    for branch in branches {
      let options = branch.apply(self.schema, &base.options)?;
      let resolution = resolver.resolve(&base.settings, options);
      let context = format!("{label} {}", branch.name);
      expansion
        .diagnostics
        .extend(resolution.diagnostics.into_iter().map(|d| d.in_context(context.clone())));

      match &accepted {
        Some(marchs) => {
          for march in marchs {
            let options = resolver.bind_march(&resolution.options, march);
            expansion.jobs.push(base.with_options(options));
          }
        }
        None => expansion.jobs.push(base.with_options(resolution.options)),
      }
    }

    debug!(
      base = %label,
      branches = branches.len(),
      jobs = expansion.jobs.len(),
      "expanded base configuration"
    );

    Ok(expansion)
  }

  /// Expand `base` the way the configured directives ask for.
  ///
  /// Applies the run-tests directive, sweeps the configured candidates (or
  /// only the baseline), then leaves the test option on a single carrier.
  pub fn expand_base(&self, base: &Job, plan: &BranchPlan) -> Result<Expansion, BranchError> {
    let roles = &self.schema.roles;
    let mut base = base.clone();
    if self.config.run_tests && base.options.contains(&roles.tests) {
      base.options.set(roles.tests.clone(), OptionValue::Bool(true));
    }

    let baseline = &self.filter.table().baseline;
    let candidates = self.config.marchs(baseline);
    let mut expansion = self.expand(&base, plan.branches(), &candidates)?;

    let carrier = if self.config.restricts_marchs(baseline) {
      let accepted = self.filter.filter(&base.settings.toolchain(), &candidates).accepted;
      test_carrier(&accepted, self.config.carrier_march(baseline))
    } else {
      None
    };

    let policy = TestPolicy {
      test_key: roles.tests.clone(),
      march_key: roles.march.clone(),
      enabled: self.config.run_tests,
      carrier,
    };
    expansion.jobs = assign_test_flag(expansion.jobs, &policy);

    Ok(expansion)
  }

  fn accepted_marchs(
    &self,
    base: &Job,
    candidates: &[MarchId],
    label: &str,
    expansion: &mut Expansion,
  ) -> Option<Vec<MarchId>> {
    let march_applies = base.settings.arch().map(|a| a.supports_march()).unwrap_or(false);
    if !march_applies {
      return None;
    }

    let filtered = self.filter.filter(&base.settings.toolchain(), candidates);
    if let Some(diagnostic) = filtered.diagnostic {
      expansion.diagnostics.push(diagnostic.in_context(label));
    }
    if filtered.accepted.is_empty() {
      warn!(base = %label, "no candidate microarchitecture is supported, base yields no jobs");
    }
    Some(filtered.accepted)
  }
}

/// Short human label for a settings block, used in logs and diagnostics.
pub fn base_label(settings: &Settings) -> String {
  format!(
    "{}/{}-{}/{}",
    settings.os, settings.compiler, settings.compiler_version, settings.arch
  )
}

//! The full pipeline from upstream base tuples to a finished plan.

use thiserror::Error;
use tracing::{debug, info};

use crate::branch::{BranchError, BranchPlan};
use crate::collect::{JobCollector, MatrixPlan};
use crate::config::MatrixConfig;
use crate::expand::{Expander, base_label};
use crate::job::{BaseTuple, Job};
use crate::march::MarchFilter;
use crate::options::{OptionSchema, SchemaError};

#[derive(Debug, Error)]
pub enum GenerateError {
  #[error("base configuration #{index}: {source}")]
  Base {
    index: usize,
    #[source]
    source: SchemaError,
  },

  #[error(transparent)]
  Branch(#[from] BranchError),
}

pub struct Generator<'a> {
  config: &'a MatrixConfig,
  schema: &'a OptionSchema,
  filter: &'a MarchFilter,
  plan: &'a BranchPlan,
}

impl<'a> Generator<'a> {
  pub fn new(
    config: &'a MatrixConfig,
    schema: &'a OptionSchema,
    filter: &'a MarchFilter,
    plan: &'a BranchPlan,
  ) -> Self {
    Self {
      config,
      schema,
      filter,
      plan,
    }
  }

  /// Whether a base is expanded at all: Release and not shared.
  pub fn is_eligible(&self, base: &Job) -> bool {
    let shared = base.options.get_bool(&self.schema.roles.shared).unwrap_or(false);
    base.settings.is_release() && !shared
  }

  pub fn generate(&self, bases: Vec<BaseTuple>) -> Result<MatrixPlan, GenerateError> {
    let expander = Expander::new(self.config, self.schema, self.filter);
    let mut collector = JobCollector::new();
    let total = bases.len();
    let mut expanded = 0;

    info!(
      bases = total,
      branches = self.plan.len(),
      full_build = self.config.full_build,
      run_tests = self.config.run_tests,
      "generating build matrix"
    );

    for (index, tuple) in bases.into_iter().enumerate() {
      let base = tuple
        .into_job(self.schema)
        .map_err(|source| GenerateError::Base { index, source })?;

      if !self.is_eligible(&base) {
        debug!(
          base = %base_label(&base.settings),
          build_type = %base.settings.build_type,
          "skipping base, only Release non-shared builds are expanded"
        );
        continue;
      }

      let expansion = expander.expand_base(&base, self.plan)?;
      debug!(base = %base_label(&base.settings), jobs = expansion.jobs.len(), "collected");
      collector.push_expansion(expansion);
      expanded += 1;
    }

    let plan = collector.finish();
    info!(
      expanded,
      skipped = total - expanded,
      jobs = plan.jobs.len(),
      warnings = plan.warnings().count(),
      "build matrix ready"
    );
    Ok(plan)
  }
}

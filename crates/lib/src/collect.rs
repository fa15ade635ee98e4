//! Accumulating expanded jobs into the final plan.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::expand::Expansion;
use crate::job::Job;
use crate::march::MarchId;
use crate::options::OptionValue;
use crate::util::hash::{Hashable, ObjectHash};

/// How the test option is distributed over one base's jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPolicy {
  pub test_key: String,
  pub march_key: String,
  /// The run-tests directive.
  pub enabled: bool,
  /// Designated microarchitecture when several are swept.
  pub carrier: Option<MarchId>,
}

/// Leave the test option true on at most one of one base's jobs.
///
/// The chosen job is the first one built for the carrier microarchitecture,
/// or simply the first job when there is no carrier or no job bears it.
/// Every other job gets the option forced to false, whatever upstream set.
/// Jobs that do not declare the option are left alone.
pub fn assign_test_flag(mut jobs: Vec<Job>, policy: &TestPolicy) -> Vec<Job> {
  let chosen = if policy.enabled {
    let by_carrier = policy.carrier.as_ref().and_then(|carrier| {
      jobs
        .iter()
        .position(|j| j.options.get_str(&policy.march_key) == Some(carrier.as_str()))
    });
    by_carrier.or(if jobs.is_empty() { None } else { Some(0) })
  } else {
    None
  };

  for (i, job) in jobs.iter_mut().enumerate() {
    if job.options.contains(&policy.test_key) {
      job
        .options
        .set(policy.test_key.clone(), OptionValue::Bool(Some(i) == chosen));
    }
  }

  jobs
}

/// The finished matrix: the jobs to run plus everything worth reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixPlan {
  pub jobs: Vec<Job>,
  #[serde(default)]
  pub diagnostics: Vec<Diagnostic>,
}

impl MatrixPlan {
  pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
    self.diagnostics.iter().filter(|d| d.is_warning())
  }
}

/// Accumulates expansions, dropping jobs identical to one already collected.
#[derive(Debug, Default)]
pub struct JobCollector {
  jobs: Vec<Job>,
  seen: HashSet<ObjectHash>,
  diagnostics: Vec<Diagnostic>,
}

impl JobCollector {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a job; returns `false` if an identical job was already collected.
  pub fn push(&mut self, job: Job) -> bool {
    match job.compute_hash() {
      Ok(hash) => {
        if !self.seen.insert(hash.clone()) {
          debug!(hash = %hash, "dropping duplicate job");
          self
            .diagnostics
            .push(Diagnostic::warning(DiagnosticKind::DuplicateJob { hash: hash.0 }));
          return false;
        }
      }
      Err(err) => warn!(error = %err, "could not hash job, keeping it without deduplication"),
    }
    self.jobs.push(job);
    true
  }

  pub fn push_expansion(&mut self, expansion: Expansion) {
    self.diagnostics.extend(expansion.diagnostics);
    for job in expansion.jobs {
      self.push(job);
    }
  }

  pub fn record(&mut self, diagnostic: Diagnostic) {
    self.diagnostics.push(diagnostic);
  }

  pub fn len(&self) -> usize {
    self.jobs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.jobs.is_empty()
  }

  pub fn finish(self) -> MatrixPlan {
    MatrixPlan {
      jobs: self.jobs,
      diagnostics: self.diagnostics,
    }
  }
}

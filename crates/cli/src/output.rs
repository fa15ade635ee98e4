//! Terminal rendering for plans, jobs and diagnostics.
//!
//! Plans and job lines go to stdout. Diagnostics, errors and logs go to
//! stderr so `--format json` output can be piped straight into a runner.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use buildmatrix_lib::diagnostic::{Diagnostic, Severity};
use buildmatrix_lib::expand::base_label;
use buildmatrix_lib::job::Job;
use buildmatrix_lib::util::hash::ObjectHash;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const JOB: &str = "•";
  pub const ARROW: &str = "→";
}

/// Job hashes are shown with 12 characters, enough to tell a plan's jobs apart.
pub fn short_hash(hash: &ObjectHash) -> &str {
  let len = hash.0.len().min(12);
  &hash.0[..len]
}

/// One-line summary of a job: its base label plus the selected options that
/// it actually carries, as `name=value` pairs.
pub fn job_summary(job: &Job, keys: &[&str]) -> String {
  let mut line = base_label(&job.settings);
  for key in keys {
    if let Some(value) = job.options.get(key) {
      line.push_str(&format!(" {}={}", key, value));
    }
  }
  line
}

pub fn print_job(hash: &ObjectHash, job: &Job, keys: &[&str]) {
  println!(
    "  {} {} {}",
    symbols::JOB.if_supports_color(Stream::Stdout, |s| s.cyan()),
    short_hash(hash).if_supports_color(Stream::Stdout, |s| s.dimmed()),
    job_summary(job, keys)
  );
}

pub fn print_job_option(key: &str, value: &str) {
  println!(
    "      {} {}={}",
    symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    key,
    value
  );
}

/// Warnings are always shown; informational diagnostics only when verbose.
pub fn print_diagnostic(diagnostic: &Diagnostic, verbose: bool) {
  match diagnostic.severity {
    Severity::Warning => eprintln!(
      "{} {}",
      symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
      diagnostic.if_supports_color(Stream::Stderr, |s| s.yellow())
    ),
    Severity::Info if verbose => eprintln!(
      "{} {}",
      symbols::JOB.if_supports_color(Stream::Stderr, |s| s.blue()),
      diagnostic
    ),
    Severity::Info => {}
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

//! Implementation of the `bmx plan` command.
//!
//! Reads the base tuples produced by the upstream enumerator, expands them
//! according to the CI directives, and prints (or writes) the finished plan.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use buildmatrix_lib::branch::BranchPlan;
use buildmatrix_lib::collect::MatrixPlan;
use buildmatrix_lib::config::MatrixConfig;
use buildmatrix_lib::generate::Generator;
use buildmatrix_lib::job::BaseTuple;
use buildmatrix_lib::march::{MarchFilter, SupportTable};
use buildmatrix_lib::options::{Currency, OptionSchema};
use buildmatrix_lib::runner::{JsonPlanWriter, MatrixRunner};
use buildmatrix_lib::util::hash::Hashable;

use crate::output::{OutputFormat, print_diagnostic, print_job, print_job_option, print_json, print_success};

/// Command-line overrides. Flags win over environment directives.
#[derive(Debug, Default)]
pub struct PlanArgs {
  pub bases: PathBuf,
  pub format: OutputFormat,
  pub output: Option<PathBuf>,
  pub full_build: bool,
  pub run_tests: bool,
  pub currency: Option<Currency>,
  pub branches: Option<PathBuf>,
  pub schema: Option<PathBuf>,
  pub march_table: Option<PathBuf>,
  pub verbose: bool,
}

pub fn cmd_plan(args: PlanArgs) -> Result<()> {
  let config = effective_config(&args)?;

  let schema = match &args.schema {
    Some(path) => OptionSchema::load(path),
    None => OptionSchema::builtin(),
  }
  .context("Failed to load option schema")?;
  info!(
    source = %source_name(args.schema.as_deref()),
    package = %schema.package,
    version = schema.version,
    "loaded option schema"
  );

  let table = SupportTable::load_or_builtin(config.march_table.as_deref()).context("Failed to load support table")?;
  info!(
    source = %source_name(config.march_table.as_deref()),
    baseline = %table.baseline,
    entries = table.entries.len(),
    "loaded support table"
  );
  let filter = MarchFilter::new(table);

  let branches = match &args.branches {
    Some(path) => {
      let declared =
        BranchPlan::load(path).with_context(|| format!("Failed to load branches: {}", path.display()))?;
      match config.currency {
        Some(currency) => declared.for_currency(&schema.roles, currency),
        None => declared,
      }
    }
    None => BranchPlan::from_config(&schema.roles, &config),
  };
  info!(
    source = %source_name(args.branches.as_deref()),
    branches = branches.len(),
    "loaded branch plan"
  );

  let bases = read_bases(&args.bases)?;
  let plan = Generator::new(&config, &schema, &filter, &branches)
    .generate(bases)
    .context("Failed to generate build matrix")?;

  if let Some(path) = &args.output {
    let file = File::create(path).with_context(|| format!("Failed to create plan file: {}", path.display()))?;
    JsonPlanWriter::new(BufWriter::new(file))
      .run(&plan)
      .with_context(|| format!("Failed to write plan: {}", path.display()))?;
    info!(path = %path.display(), jobs = plan.jobs.len(), "plan written");
  }

  if args.format.is_json() {
    print_json(&plan)
  } else {
    print_text(&plan, &schema, args.verbose)
  }
}

fn effective_config(args: &PlanArgs) -> Result<MatrixConfig> {
  let mut config = MatrixConfig::from_env().context("Invalid CI directive")?;
  if args.full_build {
    config.full_build = true;
  }
  if args.run_tests {
    config.run_tests = true;
  }
  if let Some(currency) = args.currency {
    config.currency = Some(currency);
  }
  if let Some(path) = &args.march_table {
    config.march_table = Some(path.clone());
  }
  Ok(config)
}

fn source_name(path: Option<&Path>) -> String {
  match path {
    Some(path) => path.display().to_string(),
    None => "builtin".to_string(),
  }
}

fn read_bases(path: &Path) -> Result<Vec<BaseTuple>> {
  let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read bases: {}", path.display()))?;
  serde_json::from_str(&content).with_context(|| format!("Failed to parse bases: {}", path.display()))
}

fn print_text(plan: &MatrixPlan, schema: &OptionSchema, verbose: bool) -> Result<()> {
  let roles = &schema.roles;
  let shown = [
    roles.currency.as_str(),
    roles.keoken.as_str(),
    roles.db.as_str(),
    roles.march.as_str(),
    roles.tests.as_str(),
  ];

  for job in &plan.jobs {
    let hash = job.compute_hash().context("Failed to hash job")?;
    print_job(&hash, job, &shown);
    if verbose {
      for (key, value) in job.options.to_flat() {
        print_job_option(&key, &value);
      }
    }
  }

  for diagnostic in &plan.diagnostics {
    print_diagnostic(diagnostic, verbose);
  }

  println!();
  print_success(&format!(
    "{} job(s), {} warning(s)",
    plan.jobs.len(),
    plan.warnings().count()
  ));
  Ok(())
}

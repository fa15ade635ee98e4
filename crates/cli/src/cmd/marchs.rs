//! Implementation of the `bmx marchs` command.
//!
//! Filters a candidate list against the support table for one toolchain.

use std::path::Path;

use anyhow::{Context, Result};

use buildmatrix_lib::march::{MarchFilter, MarchId, SupportTable, default_candidates};
use buildmatrix_lib::platform::Toolchain;

use crate::output::{print_diagnostic, print_json, symbols};

pub fn cmd_marchs(
  os: &str,
  compiler: &str,
  compiler_version: &str,
  candidates: &[String],
  march_table: Option<&Path>,
  json: bool,
) -> Result<()> {
  let table = SupportTable::load_or_builtin(march_table).context("Failed to load support table")?;
  let filter = MarchFilter::new(table);

  let candidates: Vec<MarchId> = if candidates.is_empty() {
    default_candidates()
  } else {
    candidates.iter().map(|c| MarchId::new(c.as_str())).collect()
  };

  let toolchain = Toolchain::parse(os, compiler, compiler_version);
  let filtered = filter.filter(&toolchain, &candidates);

  if json {
    return print_json(&filtered.accepted);
  }

  if let Some(diagnostic) = &filtered.diagnostic {
    print_diagnostic(diagnostic, true);
  }
  for march in &filtered.accepted {
    println!("  {} {}", symbols::JOB, march);
  }

  Ok(())
}

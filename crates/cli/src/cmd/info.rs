//! Implementation of the `bmx info` command.
//!
//! Shows the host platform and the CI directives the environment currently sets.

use anyhow::{Context, Result};

use buildmatrix_lib::config::MatrixConfig;
use buildmatrix_lib::march::SupportTable;
use buildmatrix_lib::platform::platform_triple;

use crate::output::{print_error, print_json, print_stat};

pub fn cmd_info(json: bool) -> Result<()> {
  let config = match MatrixConfig::from_env() {
    Ok(config) => config,
    Err(e) => {
      print_error(&format!("Invalid CI directive: {}", e));
      return Err(e.into());
    }
  };

  if json {
    let info = serde_json::json!({ "platform": platform_triple(), "config": config });
    return print_json(&info);
  }

  println!("System:");
  match platform_triple() {
    Some(triple) => print_stat("Platform", &triple),
    None => print_stat("Platform", "could not detect platform"),
  }
  println!();
  println!("Directives:");
  print_stat("Run tests", &config.run_tests.to_string());
  print_stat("Full build", &config.full_build.to_string());
  print_stat(
    "Currency",
    config.currency.map(|c| c.as_str()).unwrap_or("all (full sweep)"),
  );
  let table = SupportTable::load_or_builtin(config.march_table.as_deref()).context("Failed to load support table")?;
  let marchs: Vec<String> = config.marchs(&table.baseline).iter().map(ToString::to_string).collect();
  print_stat("Candidates", &marchs.join(", "));
  print_stat("Test march", config.carrier_march(&table.baseline).as_str());
  if let Some(path) = &config.march_table {
    print_stat("Support table", &path.display().to_string());
  }

  Ok(())
}

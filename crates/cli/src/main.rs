use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use buildmatrix_lib::options::Currency;

mod cmd;
mod output;

use cmd::{PlanArgs, cmd_info, cmd_marchs, cmd_plan};
use output::OutputFormat;

/// bmx - CI build-variant matrix generator
#[derive(Parser)]
#[command(name = "bmx")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Expand base configurations into the job matrix
  Plan {
    /// JSON file with the upstream base configurations
    bases: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Also write the plan as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Sweep every supported microarchitecture (overrides KTH_FULL_BUILD)
    #[arg(long)]
    full_build: bool,

    /// Enable tests on the test-carrying variant (overrides KTH_RUN_TESTS)
    #[arg(long)]
    run_tests: bool,

    /// Build a single currency (overrides KTH_CI_CURRENCY)
    #[arg(long)]
    currency: Option<Currency>,

    /// TOML file declaring the feature branches
    #[arg(long)]
    branches: Option<PathBuf>,

    /// TOML option schema replacing the builtin one
    #[arg(long)]
    schema: Option<PathBuf>,

    /// TOML support table replacing the builtin one (overrides KTH_MARCH_TABLE)
    #[arg(long)]
    march_table: Option<PathBuf>,
  },

  /// Show which microarchitectures a toolchain supports
  Marchs {
    /// Platform name (e.g. Linux, Macos, Windows)
    #[arg(long)]
    os: String,

    /// Compiler name (e.g. gcc, clang, apple-clang)
    #[arg(long)]
    compiler: String,

    /// Compiler version (e.g. 9, 4.9)
    #[arg(long)]
    compiler_version: String,

    /// Candidates to filter (default: x86-64 haswell skylake)
    candidates: Vec<String>,

    /// TOML support table replacing the builtin one
    #[arg(long)]
    march_table: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// Show host platform and active CI directives
  Info {
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Plan {
      bases,
      format,
      output,
      full_build,
      run_tests,
      currency,
      branches,
      schema,
      march_table,
    } => cmd_plan(PlanArgs {
      bases,
      format,
      output,
      full_build,
      run_tests,
      currency,
      branches,
      schema,
      march_table,
      verbose: cli.verbose,
    }),
    Commands::Marchs {
      os,
      compiler,
      compiler_version,
      candidates,
      march_table,
      json,
    } => cmd_marchs(
      &os,
      &compiler,
      &compiler_version,
      &candidates,
      march_table.as_deref(),
      json,
    ),
    Commands::Info { json } => cmd_info(json),
  }
}

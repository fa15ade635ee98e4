//! End-to-end tests over the public API: files in, plan out.

use buildmatrix_lib::branch::BranchPlan;
use buildmatrix_lib::collect::MatrixPlan;
use buildmatrix_lib::config::MatrixConfig;
use buildmatrix_lib::generate::Generator;
use buildmatrix_lib::job::BaseTuple;
use buildmatrix_lib::march::{MarchFilter, SupportTable};
use buildmatrix_lib::options::{Currency, OptionSchema};
use buildmatrix_lib::runner::{JsonPlanWriter, MatrixRunner};
use tempfile::TempDir;

const BASES: &str = r#"
[
  {
    "settings": {"os": "Linux", "compiler": "gcc", "compiler.version": "9", "arch": "x86_64", "build_type": "Release"},
    "options": {"kth-node:with_tests": true, "kth-node:db": "new"}
  }
]
"#;

const BRANCHES: &str = r#"
[[branch]]
name = "ltc"
set = { currency = "LTC" }

[[branch]]
name = "bch-lean"
set = { currency = "BCH", keoken = false }
"#;

const TABLE: &str = r#"
baseline = "x86-64"

[[entry]]
os = "linux"
compiler = "gcc"
min_version = "7"
marchs = ["haswell"]
"#;

fn bases() -> Vec<BaseTuple> {
  serde_json::from_str(BASES).unwrap()
}

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
  let path = dir.path().join(name);
  std::fs::write(&path, content).unwrap();
  path
}

#[test]
fn declared_branches_replace_the_sweep() {
  let dir = TempDir::new().unwrap();
  let plan_file = write(&dir, "branches.toml", BRANCHES);

  let config = MatrixConfig::default();
  let schema = OptionSchema::builtin().unwrap();
  let filter = MarchFilter::new(SupportTable::builtin().unwrap());
  let branches = BranchPlan::load(&plan_file).unwrap();

  let plan = Generator::new(&config, &schema, &filter, &branches).generate(bases()).unwrap();
  let currencies: Vec<_> = plan.jobs.iter().filter_map(|j| j.options.get_str("currency")).collect();
  assert_eq!(currencies, ["LTC", "BCH"]);
  // legacy alias migrated
  assert!(plan.jobs.iter().all(|j| j.options.get_str("db") == Some("pruned")));
  // tests stay off without the directive
  assert!(plan.jobs.iter().all(|j| j.options.get_bool("tests") == Some(false)));
}

#[test]
fn declared_branches_narrowed_to_one_currency() {
  let schema = OptionSchema::builtin().unwrap();
  let branches = BranchPlan::from_toml_str(BRANCHES)
    .unwrap()
    .for_currency(&schema.roles, Currency::Bch);
  assert_eq!(branches.len(), 1);
  assert_eq!(branches.branches()[0].name, "bch-lean");
}

#[test]
fn custom_support_table_limits_the_sweep() {
  let dir = TempDir::new().unwrap();
  let table = write(&dir, "marchs.toml", TABLE);

  let config = MatrixConfig {
    full_build: true,
    run_tests: true,
    march_table: Some(table),
    ..MatrixConfig::default()
  };
  let schema = OptionSchema::builtin().unwrap();
  let filter = MarchFilter::new(SupportTable::load_or_builtin(config.march_table.as_deref()).unwrap());
  let branches = BranchPlan::from_config(&schema.roles, &config);

  let plan = Generator::new(&config, &schema, &filter, &branches).generate(bases()).unwrap();
  // 3 branches x {x86-64, haswell}
  assert_eq!(plan.jobs.len(), 6);
  assert!(plan.jobs.iter().all(|j| j.options.get_str("march_id") != Some("skylake")));

  let carriers: Vec<_> = plan
    .jobs
    .iter()
    .filter(|j| j.options.get_bool("tests") == Some(true))
    .map(|j| (j.options.get_str("currency"), j.options.get_str("march_id")))
    .collect();
  assert_eq!(carriers, [(Some("BCH"), Some("x86-64"))]);
}

#[test]
fn written_plan_reads_back() {
  let config = MatrixConfig::default();
  let schema = OptionSchema::builtin().unwrap();
  let filter = MarchFilter::new(SupportTable::builtin().unwrap());
  let branches = BranchPlan::from_config(&schema.roles, &config);
  let plan = Generator::new(&config, &schema, &filter, &branches).generate(bases()).unwrap();

  let mut writer = JsonPlanWriter::new(Vec::new());
  writer.run(&plan).unwrap();
  let replayed: MatrixPlan = serde_json::from_slice(&writer.into_inner()).unwrap();
  assert_eq!(replayed.jobs, plan.jobs);
}

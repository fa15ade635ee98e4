//! Constants shared across the matrix generator.

pub const APP_NAME: &str = "buildmatrix";

/// Length of the truncated job hash.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Instruction-set baseline every x86_64 toolchain supports.
pub const BASELINE_MARCH: &str = "x86-64";

/// The recipe layer's "no explicit value" marker for free-form options.
pub const UNSET_SENTINEL: &str = "_DUMMY_";

/// Prefix of option keys that apply to every package in the dependency graph.
pub const DEPENDENCY_SCOPE: &str = "*";

// Process-level directives read once at startup.
pub const ENV_RUN_TESTS: &str = "KTH_RUN_TESTS";
pub const ENV_FULL_BUILD: &str = "KTH_FULL_BUILD";
pub const ENV_CI_CURRENCY: &str = "KTH_CI_CURRENCY";
pub const ENV_MARCH_TABLE: &str = "KTH_MARCH_TABLE";

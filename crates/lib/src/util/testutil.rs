//! Test fixtures for matrix tests.

use crate::job::Job;
use crate::options::OptionSchema;
use crate::settings::Settings;

pub fn settings(os: &str, compiler: &str, version: &str, arch: &str) -> Settings {
  Settings {
    os: os.to_string(),
    compiler: compiler.to_string(),
    compiler_version: version.to_string(),
    arch: arch.to_string(),
    build_type: "Release".to_string(),
  }
}

/// Linux x86_64 Release settings for the given gcc version.
pub fn gcc_settings(version: &str) -> Settings {
  settings("Linux", "gcc", version, "x86_64")
}

pub fn schema() -> OptionSchema {
  OptionSchema::builtin().unwrap()
}

/// A base job with schema defaults.
pub fn base_job(settings: Settings) -> Job {
  Job::new(settings, schema().defaults())
}

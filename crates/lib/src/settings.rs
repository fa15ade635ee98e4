//! Build settings of a base configuration.

use serde::{Deserialize, Serialize};

use crate::platform::Toolchain;
use crate::platform::arch::Arch;

pub const RELEASE: &str = "Release";

/// Settings as the upstream enumerator produced them.
///
/// Kept as strings so a job serializes back to exactly what the external
/// runner expects; typed views are parsed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settings {
  pub os: String,
  pub compiler: String,
  #[serde(rename = "compiler.version", alias = "compiler_version")]
  pub compiler_version: String,
  pub arch: String,
  pub build_type: String,
}

impl Settings {
  pub fn arch(&self) -> Option<Arch> {
    Arch::from_setting(&self.arch)
  }

  pub fn toolchain(&self) -> Toolchain {
    Toolchain::parse(&self.os, &self.compiler, &self.compiler_version)
  }

  pub fn is_release(&self) -> bool {
    self.build_type == RELEASE
  }
}

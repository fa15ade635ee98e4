pub mod arch;
pub mod compiler;
pub mod os;

use arch::Arch;
use compiler::{Compiler, CompilerVersion};
use os::Os;
use std::fmt;

/// Host identifier combining architecture and OS (e.g., "x86_64-linux")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
  pub arch: Arch,
  pub os: Os,
}

impl Platform {
  pub fn new(arch: Arch, os: Os) -> Self {
    Self { arch, os }
  }

  /// Detect the current platform at runtime
  ///
  /// Returns `None` if the OS or architecture is not supported
  pub fn current() -> Option<Self> {
    Some(Self {
      arch: Arch::current()?,
      os: Os::current()?,
    })
  }

  /// Returns the platform triple string (e.g., "x86_64-linux")
  pub fn triple(&self) -> String {
    format!("{}-{}", self.arch, self.os)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.triple())
  }
}

/// The (platform, compiler, compiler version) triple microarchitecture
/// support depends on.
///
/// Each component is optional: settings naming an unknown OS or compiler, or
/// an unparsable version, leave it `None`, and lookups fall back to the
/// baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  pub os: Option<Os>,
  pub compiler: Option<Compiler>,
  pub version: Option<CompilerVersion>,
}

impl Toolchain {
  pub fn new(os: Option<Os>, compiler: Option<Compiler>, version: Option<CompilerVersion>) -> Self {
    Self { os, compiler, version }
  }

  /// Parse the toolchain from raw settings strings.
  pub fn parse(os: &str, compiler: &str, version: &str) -> Self {
    Self {
      os: Os::from_setting(os),
      compiler: Compiler::from_setting(compiler),
      version: version.parse().ok(),
    }
  }

  /// Whether every component was recognized.
  pub fn is_known(&self) -> bool {
    self.os.is_some() && self.compiler.is_some() && self.version.is_some()
  }
}

impl fmt::Display for Toolchain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let os = self.os.map(|o| o.as_str()).unwrap_or("unknown");
    let compiler = self.compiler.map(|c| c.as_str()).unwrap_or("unknown");
    match &self.version {
      Some(version) => write!(f, "{os}/{compiler}-{version}"),
      None => write!(f, "{os}/{compiler}"),
    }
  }
}

/// Returns the platform triple for the current system (e.g., "x86_64-linux")
///
/// Returns `None` if the current platform is not supported
pub fn platform_triple() -> Option<String> {
  Platform::current().map(|p| p.triple())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn platform_triple_format() {
    let platform = Platform::new(Arch::X86_64, Os::Linux);
    assert_eq!(platform.triple(), "x86_64-linux");

    let platform = Platform::new(Arch::Armv8, Os::MacOs);
    assert_eq!(platform.triple(), "armv8-macos");
  }

  #[test]
  fn toolchain_parses_settings_strings() {
    let tc = Toolchain::parse("Linux", "gcc", "4.9");
    assert_eq!(tc.os, Some(Os::Linux));
    assert_eq!(tc.compiler, Some(Compiler::Gcc));
    assert_eq!(tc.version, Some("4.9".parse().unwrap()));
    assert!(tc.is_known());
  }

  #[test]
  fn unknown_components_stay_none() {
    let tc = Toolchain::parse("Plan9", "tcc", "?");
    assert!(!tc.is_known());
    assert_eq!(tc.to_string(), "unknown/unknown");
  }
}

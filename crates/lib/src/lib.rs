//! buildmatrix-lib: decides which build variants CI should attempt.
//!
//! The pipeline, leaf-first:
//! - `options`: versioned option schema and concrete option maps
//! - `resolve`: feature-compatibility rules applied to one option map
//! - `march`: microarchitecture support table and filter
//! - `expand`: fan-out of a base job over feature branches and microarchitectures
//! - `collect`: deduplication, the single test carrier, and the final plan
//!
//! Everything here is synchronous and in-memory; building the jobs is the
//! external runner's business.

pub mod branch;
pub mod collect;
pub mod config;
pub mod consts;
pub mod diagnostic;
pub mod expand;
pub mod generate;
pub mod job;
pub mod march;
pub mod options;
pub mod platform;
pub mod resolve;
pub mod runner;
pub mod settings;
pub mod util;

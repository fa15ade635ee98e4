//! The seam to the external build executor.

use std::io::Write;

use thiserror::Error;
use tracing::info;

use crate::collect::MatrixPlan;

#[derive(Debug, Error)]
pub enum RunError {
  #[error("failed to write plan: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to serialize plan: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("build executor failed: {0}")]
  Executor(String),
}

/// Receives the finished matrix. Implementations decide how (and how
/// concurrently) the jobs are built.
pub trait MatrixRunner {
  fn run(&mut self, plan: &MatrixPlan) -> Result<(), RunError>;
}

/// Writes the plan as pretty JSON so it can be logged or replayed.
pub struct JsonPlanWriter<W: Write> {
  writer: W,
}

impl<W: Write> JsonPlanWriter<W> {
  pub fn new(writer: W) -> Self {
    Self { writer }
  }

  pub fn into_inner(self) -> W {
    self.writer
  }
}

impl<W: Write> MatrixRunner for JsonPlanWriter<W> {
  fn run(&mut self, plan: &MatrixPlan) -> Result<(), RunError> {
    serde_json::to_writer_pretty(&mut self.writer, plan)?;
    writeln!(self.writer)?;
    self.writer.flush()?;
    info!(jobs = plan.jobs.len(), "wrote build plan");
    Ok(())
  }
}

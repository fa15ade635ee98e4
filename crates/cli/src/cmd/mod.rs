mod info;
mod marchs;
mod plan;

pub use info::cmd_info;
pub use marchs::cmd_marchs;
pub use plan::{PlanArgs, cmd_plan};

pub mod scheduler;
pub mod trigger;

pub use scheduler::{run_scheduler, Scheduler};
pub use trigger::Trigger;

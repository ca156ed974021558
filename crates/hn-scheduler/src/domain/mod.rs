pub mod scheduler;

pub use scheduler::{Scheduler, DEFAULT_TICK_INTERVAL};

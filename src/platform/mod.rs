//! Platform layer
//!
//! Browser frame scheduling and key mapping. The simulation never sees any of
//! this; it only receives deltas and logical commands.

pub mod keys;
#[cfg(target_arch = "wasm32")]
pub mod scheduler;

pub use keys::{KeyCommand, key_command};
#[cfg(target_arch = "wasm32")]
pub use scheduler::Scheduler;

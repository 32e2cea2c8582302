//! State module for tracking run progress
//!
//! - `RunState`: where the driver loop is (next page to walk, or stopped)
//! - `StopReason`: why a run ended

mod run_state;

pub use run_state::{RunState, StopReason};

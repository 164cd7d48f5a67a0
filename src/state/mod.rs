//! State module for tracking run progress
//!
//! # Components
//!
//! - `RunPhase`: where the orchestrator is in its per-page state machine
//! - `RunStatus`: how a finished run is classified for the caller

mod run_phase;
mod run_status;

// Re-export main types
pub use run_phase::RunPhase;
pub use run_status::RunStatus;

//! The serving-task core: phase state machine, declarative choreography
//! and the orchestrator loop

pub mod orchestrator;
pub mod phase;
pub mod script;

pub use orchestrator::{CancelToken, TaskOrchestrator, wait_for_trigger};
pub use phase::{TaskPhase, WorldState};
pub use script::{GripperAction, PhaseScript, Step, build_phase, build_task, frames};

//! Error types for the task orchestrator

use std::time::Duration;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Task orchestration error types
///
/// The orchestrator performs no recovery: the first fault aborts the run
/// and is surfaced to the caller. There is no partial-phase rollback.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Symbolic frame name not present in the registry
    #[error("unknown frame: {0}")]
    PoseResolution(String),

    /// Motion executor could not realize a commanded segment
    #[error("motion fault: {0}")]
    MotionFault(String),

    /// Force sensor readback unavailable
    #[error("sensor fault: {0}")]
    SensorFault(String),

    /// Gripper output write rejected
    #[error("actuator fault: {0}")]
    ActuatorFault(String),

    /// Phase precondition not satisfied
    #[error("cannot enter phase {phase}: {reason}")]
    PhaseGuard {
        /// Phase whose guard rejected the transition
        phase: &'static str,
        /// Which precondition failed
        reason: String,
    },

    /// Force-trigger wait exceeded the configured timeout
    #[error("force trigger timed out after {waited:?}")]
    ForceTriggerTimeout {
        /// Total time spent polling before giving up
        waited: Duration,
    },

    /// Run aborted via the cancellation token
    #[error("task cancelled")]
    Cancelled,

    /// Motion queue worker is no longer running
    #[error("motion executor stopped")]
    ExecutorStopped,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration serialize error
    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

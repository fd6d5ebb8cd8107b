//! Motion command model and executor seam

pub mod command;
pub mod executor;

pub use command::{
    Blend, CartPlane, ControlMode, ImpedanceProfile, Interpolation, MotionCommand,
    OscillationAxis, SinePattern, Speed, SpiralPattern,
};
pub use executor::{MotionExecutor, QueuedExecutor, Segment, SegmentDriver, Submission};

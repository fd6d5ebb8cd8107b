//! Sutradhar - task orchestration for a 7-axis manipulator arm
//!
//! This library sequences a fixed drink-serving task through four phases:
//! Home, GlassTransfer, BottlePourServe and PresentAndRelease. The
//! choreography is declarative data (a per-phase list of steps) executed by
//! a generic orchestrator loop against a small set of collaborator traits:
//!
//! - [`motion::MotionExecutor`]: accepts motion segments, either blocking
//!   (suspends until physical completion) or queued (FIFO, overlapped
//!   transit for blended paths)
//! - [`gripper::GripperOutputs`]: the two mutually exclusive digital lines
//!   driving the binary gripper
//! - [`sensing::ForceSensor`]: instantaneous external force at the flange,
//!   polled by the force-triggered release loop
//! - [`registry::FrameRegistry`]: symbolic waypoint name to pose resolution
//!
//! Mock implementations of all collaborators live in [`devices::mock`] for
//! hardware-free runs and tests.

pub mod config;
pub mod devices;
pub mod error;
pub mod gripper;
pub mod motion;
pub mod registry;
pub mod sensing;
pub mod task;
pub mod types;

// Re-export commonly used types
pub use config::TaskConfig;
pub use error::{Error, Result};

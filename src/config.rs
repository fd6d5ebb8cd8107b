//! Configuration for the serving task
//!
//! All operator-tunable parameters live here: velocities and blend
//! tolerances per segment class, gripper settle time, pour and agitation
//! parameters, and the force-trigger settings. The struct is immutable for
//! the lifetime of an orchestrator; it is loaded once from a TOML file (or
//! taken from defaults) and passed in at construction.

use crate::error::Result;
use crate::types::Axis;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level task configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskConfig {
    pub motion: MotionTuning,
    pub gripper: GripperConfig,
    pub pour: PourConfig,
    pub agitation: AgitationConfig,
    pub force_trigger: ForceTriggerConfig,
}

/// Velocity and blend tuning per segment class
///
/// Joint velocities are fractions of maximum axis speed (0..1); Cartesian
/// velocities are mm/s; blend tolerances are mm of permitted corner
/// rounding. Grasp-adjacent segments never blend (the script enforces a
/// full stop before every grasp and release).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MotionTuning {
    /// Joint-relative velocity for free-space joint moves (0..1)
    pub joint_vel: f64,
    /// Cartesian velocity for general linear transits (mm/s)
    pub path_vel: f64,
    /// Cartesian velocity for free-space carry segments (mm/s)
    pub path_vel_fast: f64,
    /// Cartesian velocity for grasp-adjacent approaches (mm/s)
    pub approach_vel: f64,
    /// Cartesian velocity for the decapping strokes (mm/s)
    pub decap_vel: f64,
    /// Cartesian velocity for the agitation shuttle (mm/s)
    pub shuttle_vel: f64,
    /// Cartesian velocity leaving the agitation zone (mm/s)
    pub retreat_vel: f64,
    /// Blend tolerance for pick/place transits (mm)
    pub blend_transit: f64,
    /// Blend tolerance for carry and shuttle segments (mm)
    pub blend_shuttle: f64,
}

/// Gripper actuator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GripperConfig {
    /// Mechanical settle time after commanding a jaw transition (ms)
    pub settle_ms: u64,
}

/// Pour-contact stroke configuration
///
/// The pour approach runs under Cartesian impedance so contact forces at
/// the glass rim are absorbed rather than resisted.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PourConfig {
    /// Cartesian velocity of the compliant pour stroke (mm/s)
    pub contact_vel: f64,
    /// Translational stiffness per axis [x, y, z] (N/m)
    pub stiffness: [f64; 3],
    /// Damping ratio applied to all axes
    pub damping: f64,
    /// Dwell after reaching the pour pose, letting the pour settle (ms)
    pub dwell_ms: u64,
}

/// Agitation configuration: two compliant oscillation holds followed by a
/// back-and-forth Cartesian shuttle.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgitationConfig {
    /// Rotational sine pattern frequency (Hz)
    pub sine_frequency_hz: f64,
    /// Rotational sine pattern amplitude (Nm)
    pub sine_amplitude: f64,
    /// Rotational sine pattern stiffness (Nm/rad)
    pub sine_stiffness: f64,
    /// Damping ratio during the sine hold
    pub sine_damping: f64,
    /// Duration of the sine position-hold (ms)
    pub sine_duration_ms: u64,
    /// Planar spiral pattern frequency (Hz)
    pub spiral_frequency_hz: f64,
    /// Planar spiral pattern amplitude (N)
    pub spiral_amplitude: f64,
    /// Planar spiral pattern stiffness (N/m)
    pub spiral_stiffness: f64,
    /// Spiral envelope rise time (s)
    pub spiral_rise_s: f64,
    /// Spiral envelope hold time (s)
    pub spiral_hold_s: f64,
    /// Spiral envelope fall time (s)
    pub spiral_fall_s: f64,
    /// Duration of the spiral position-hold (ms)
    pub spiral_duration_ms: u64,
    /// Pause after the oscillation holds (ms)
    pub settle_ms: u64,
    /// Number of back-and-forth shuttle pairs
    pub shuttle_pairs: u32,
    /// Pause after the final shuttle stroke (ms)
    pub shuttle_dwell_ms: u64,
}

/// Force-triggered release configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForceTriggerConfig {
    /// Flange axis whose absolute force component is compared
    pub axis: Axis,
    /// Trigger threshold (N)
    pub threshold: f64,
    /// Settle delay between trigger and gripper open (ms)
    pub settle_ms: u64,
    /// Debounce window: force must stay above threshold this long before
    /// triggering. Zero preserves single-sample (transient spike) behavior.
    pub debounce_ms: u64,
    /// Delay between force samples (ms)
    pub poll_interval_ms: u64,
    /// Maximum time to wait for the trigger; absent = wait unbounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Pause after release before returning home (ms)
    pub post_release_dwell_ms: u64,
}

impl TaskConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: TaskConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Default tuning for an LBR iiwa 14 class arm
    ///
    /// Suitable for testing and development. Production cells should load
    /// operator-calibrated values from a TOML configuration file.
    pub fn lbr_defaults() -> Self {
        Self {
            motion: MotionTuning {
                joint_vel: 0.25,
                path_vel: 250.0,
                path_vel_fast: 750.0,
                approach_vel: 100.0,
                decap_vel: 2000.0,
                shuttle_vel: 2000.0,
                retreat_vel: 1000.0,
                blend_transit: 20.0,
                blend_shuttle: 50.0,
            },
            gripper: GripperConfig { settle_ms: 1000 },
            pour: PourConfig {
                contact_vel: 10.0,
                stiffness: [2500.0, 2500.0, 2500.0],
                damping: 1.0,
                dwell_ms: 3000,
            },
            agitation: AgitationConfig {
                sine_frequency_hz: 5.0,
                sine_amplitude: 5.0,
                sine_stiffness: 15.0,
                sine_damping: 0.7,
                sine_duration_ms: 3000,
                spiral_frequency_hz: 2.0,
                spiral_amplitude: 16.0,
                spiral_stiffness: 1000.0,
                spiral_rise_s: 0.2,
                spiral_hold_s: 60.0,
                spiral_fall_s: 0.5,
                spiral_duration_ms: 3000,
                settle_ms: 10,
                shuttle_pairs: 3,
                shuttle_dwell_ms: 1000,
            },
            force_trigger: ForceTriggerConfig {
                axis: Axis::Z,
                threshold: 20.0,
                settle_ms: 50,
                debounce_ms: 0,
                poll_interval_ms: 5,
                timeout_ms: None,
                post_release_dwell_ms: 5000,
            },
        }
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self::lbr_defaults()
    }
}

//! Motion command definitions
//!
//! A [`MotionCommand`] is an immutable value describing one path segment:
//! target frame, interpolation kind, velocity, blend tolerance and control
//! mode. Control modes other than stiff position control are scoped to the
//! segment carrying them; nothing is inherited by the next segment.

/// Path interpolation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Joint-interpolated point-to-point move
    Joint,
    /// Straight-line Cartesian move
    Linear,
}

/// Segment velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Speed {
    /// Fraction of maximum axis velocity (0..1), for joint moves
    JointRelative(f64),
    /// Cartesian tool velocity in mm/s, for linear moves
    Cartesian(f64),
}

/// Blend continuity between this segment and the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Blend {
    /// Full stop at the target
    None,
    /// Permitted corner-rounding deviation in mm
    Cartesian(f64),
}

impl Blend {
    /// True if the segment ends in a full stop
    pub fn is_none(&self) -> bool {
        matches!(self, Blend::None)
    }
}

/// Rotational axis for oscillation patterns (tool frame)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillationAxis {
    /// Rotation about tool X
    RotX,
    /// Rotation about tool Y
    RotY,
    /// Rotation about tool Z
    RotZ,
}

/// Cartesian plane selector for the spiral pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartPlane {
    XY,
    XZ,
    YZ,
}

/// Per-axis Cartesian impedance parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ImpedanceProfile {
    /// Translational stiffness [x, y, z] (N/m)
    pub stiffness: [f64; 3],
    /// Damping ratio applied to all degrees of freedom
    pub damping: f64,
}

/// Rotational sine oscillation overlaid on a position hold
#[derive(Debug, Clone, PartialEq)]
pub struct SinePattern {
    /// Oscillation axis
    pub axis: OscillationAxis,
    /// Oscillation frequency (Hz)
    pub frequency_hz: f64,
    /// Oscillation amplitude (Nm)
    pub amplitude: f64,
    /// Stiffness about the oscillation axis (Nm/rad)
    pub stiffness: f64,
    /// Damping ratio applied to all degrees of freedom
    pub damping: f64,
}

/// Planar spiral oscillation with a rise/hold/fall envelope
#[derive(Debug, Clone, PartialEq)]
pub struct SpiralPattern {
    /// Plane the spiral runs in
    pub plane: CartPlane,
    /// Spiral frequency (Hz)
    pub frequency_hz: f64,
    /// Spiral amplitude (N)
    pub amplitude: f64,
    /// Translational stiffness in the spiral plane (N/m)
    pub stiffness: f64,
    /// Envelope rise time (s)
    pub rise_s: f64,
    /// Envelope hold time (s)
    pub hold_s: f64,
    /// Envelope fall time (s)
    pub fall_s: f64,
}

/// Control mode for one segment
///
/// Defaults to stiff position control; compliant modes are entered only for
/// the pour-contact and agitation segments.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ControlMode {
    /// Stiff position control
    #[default]
    Position,
    /// Cartesian impedance: yields proportionally to external force
    Impedance(ImpedanceProfile),
    /// Rotational sine oscillation under impedance
    SineOscillation(SinePattern),
    /// Planar spiral oscillation under impedance
    SpiralOscillation(SpiralPattern),
}

impl ControlMode {
    /// True for any mode other than stiff position control
    pub fn is_compliant(&self) -> bool {
        !matches!(self, ControlMode::Position)
    }
}

/// One immutable motion segment description
#[derive(Debug, Clone, PartialEq)]
pub struct MotionCommand {
    /// Symbolic target frame name, resolved by the registry at submission
    pub target: String,
    pub interpolation: Interpolation,
    pub speed: Speed,
    pub blend: Blend,
    pub control: ControlMode,
}

impl MotionCommand {
    /// Joint-interpolated move at a relative velocity fraction
    pub fn joint(target: impl Into<String>, velocity_rel: f64) -> Self {
        Self {
            target: target.into(),
            interpolation: Interpolation::Joint,
            speed: Speed::JointRelative(velocity_rel),
            blend: Blend::None,
            control: ControlMode::Position,
        }
    }

    /// Linear Cartesian move at mm/s
    pub fn linear(target: impl Into<String>, velocity_mm_s: f64) -> Self {
        Self {
            target: target.into(),
            interpolation: Interpolation::Linear,
            speed: Speed::Cartesian(velocity_mm_s),
            blend: Blend::None,
            control: ControlMode::Position,
        }
    }

    /// Allow corner-rounding into the next segment
    pub fn with_blend(mut self, tolerance_mm: f64) -> Self {
        self.blend = Blend::Cartesian(tolerance_mm);
        self
    }

    /// Override the control mode for this segment only
    pub fn with_control(mut self, control: ControlMode) -> Self {
        self.control = control;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_default_to_stop_and_position() {
        let cmd = MotionCommand::linear("glass_pick", 250.0);
        assert_eq!(cmd.interpolation, Interpolation::Linear);
        assert!(cmd.blend.is_none());
        assert!(!cmd.control.is_compliant());

        let cmd = MotionCommand::joint("home", 0.25);
        assert_eq!(cmd.speed, Speed::JointRelative(0.25));
        assert!(cmd.blend.is_none());
    }

    #[test]
    fn test_with_blend_and_control() {
        let cmd = MotionCommand::linear("pour_contact", 10.0)
            .with_control(ControlMode::Impedance(ImpedanceProfile {
                stiffness: [2500.0, 2500.0, 2500.0],
                damping: 1.0,
            }))
            .with_blend(20.0);
        assert_eq!(cmd.blend, Blend::Cartesian(20.0));
        assert!(cmd.control.is_compliant());
    }
}

//! Spatial value types shared across the crate

use serde::{Deserialize, Serialize};

/// 6-DOF Cartesian target: position in millimeters, orientation as
/// intrinsic Z-Y-X rotations in radians.
///
/// Immutable once resolved from the frame registry for the duration of a
/// motion command.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// X position (mm)
    pub x: f64,
    /// Y position (mm)
    pub y: f64,
    /// Z position (mm)
    pub z: f64,
    /// Rotation about Z (rad)
    pub a: f64,
    /// Rotation about Y (rad)
    pub b: f64,
    /// Rotation about X (rad)
    pub c: f64,
}

impl Pose {
    /// Create a full 6-DOF pose
    pub fn new(x: f64, y: f64, z: f64, a: f64, b: f64, c: f64) -> Self {
        Self { x, y, z, a, b, c }
    }

    /// Position-only pose with zero orientation
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            ..Self::default()
        }
    }
}

/// Cartesian axis selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Instantaneous external force at the tool flange, in Newtons per axis.
///
/// Consumed once per polling iteration, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForceVector {
    /// Force along X (N)
    pub x: f64,
    /// Force along Y (N)
    pub y: f64,
    /// Force along Z (N)
    pub z: f64,
}

impl ForceVector {
    /// Create a force vector
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component along the given axis
    pub fn component(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_component_selection() {
        let f = ForceVector::new(1.0, -2.0, 3.5);
        assert_eq!(f.component(Axis::X), 1.0);
        assert_eq!(f.component(Axis::Y), -2.0);
        assert_eq!(f.component(Axis::Z), 3.5);
    }

    #[test]
    fn test_pose_at_zero_orientation() {
        let p = Pose::at(100.0, 0.0, 450.0);
        assert_eq!(p.a, 0.0);
        assert_eq!(p.b, 0.0);
        assert_eq!(p.c, 0.0);
        assert_eq!(p.x, 100.0);
    }
}

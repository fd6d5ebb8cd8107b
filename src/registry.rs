//! Frame registry: symbolic waypoint names to poses
//!
//! Waypoints are taught on the cell and stored outside this crate; the
//! orchestrator only ever sees the [`FrameRegistry`] trait.

use crate::error::{Error, Result};
use crate::types::Pose;
use std::collections::HashMap;

/// Resolves symbolic waypoint names to spatial poses
pub trait FrameRegistry: Send {
    /// Resolve a frame by name
    ///
    /// Fails with [`Error::PoseResolution`] if the name is unregistered.
    fn resolve(&self, name: &str) -> Result<Pose>;
}

/// Map-backed frame registry
#[derive(Debug, Clone, Default)]
pub struct StaticFrameRegistry {
    frames: HashMap<String, Pose>,
}

impl StaticFrameRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a frame
    pub fn insert(&mut self, name: impl Into<String>, pose: Pose) {
        self.frames.insert(name.into(), pose);
    }

    /// Build a registry from name/pose pairs
    pub fn from_frames<I, N>(frames: I) -> Self
    where
        I: IntoIterator<Item = (N, Pose)>,
        N: Into<String>,
    {
        let mut registry = Self::new();
        for (name, pose) in frames {
            registry.insert(name, pose);
        }
        registry
    }

    /// Number of registered frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if no frames are registered
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameRegistry for StaticFrameRegistry {
    fn resolve(&self, name: &str) -> Result<Pose> {
        self.frames
            .get(name)
            .copied()
            .ok_or_else(|| Error::PoseResolution(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_registered_frame() {
        let mut registry = StaticFrameRegistry::new();
        registry.insert("home", Pose::at(0.0, 0.0, 800.0));

        let pose = registry.resolve("home").unwrap();
        assert_eq!(pose.z, 800.0);
    }

    #[test]
    fn test_resolve_unknown_frame_fails() {
        let registry = StaticFrameRegistry::new();
        let err = registry.resolve("glass_pick").unwrap_err();
        assert!(matches!(err, Error::PoseResolution(name) if name == "glass_pick"));
    }

    #[test]
    fn test_from_frames() {
        let registry = StaticFrameRegistry::from_frames([
            ("a", Pose::at(1.0, 0.0, 0.0)),
            ("b", Pose::at(2.0, 0.0, 0.0)),
        ]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("b").unwrap().x, 2.0);
    }
}

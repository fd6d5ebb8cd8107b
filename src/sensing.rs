//! Force sensing at the tool flange

use crate::error::Result;
use crate::types::ForceVector;

/// Reports the instantaneous external force at the tool flange
///
/// The release loop polls this once per iteration; samples are consumed,
/// never persisted.
pub trait ForceSensor: Send {
    /// Read the current external force
    ///
    /// Fails with [`crate::Error::SensorFault`] if the sensor link is
    /// unavailable.
    fn read_force(&mut self) -> Result<ForceVector>;
}

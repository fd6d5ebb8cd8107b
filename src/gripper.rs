//! Binary gripper control through two mutually exclusive output lines
//!
//! The gripper is driven by an "open" and a "close" digital output which
//! must never both be asserted. Every transition deasserts the opposite
//! line before asserting the requested one, then waits a fixed mechanical
//! settle time. There is no jaw feedback: state is commanded, not
//! confirmed.

use crate::error::Result;
use std::thread;
use std::time::Duration;

/// Commanded jaw state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GripperState {
    Open,
    Closed,
}

/// The two gripper output lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GripperLine {
    Open,
    Close,
}

/// Digital output port driving the gripper
pub trait GripperOutputs: Send {
    /// Write one output line; fire-and-forget, the caller owns the settle
    /// delay
    ///
    /// Fails with [`crate::Error::ActuatorFault`] if the write is rejected.
    fn set_line(&mut self, line: GripperLine, asserted: bool) -> Result<()>;
}

/// Gripper controller enforcing line exclusivity and settle time
pub struct Gripper<O: GripperOutputs> {
    outputs: O,
    settle: Duration,
    state: Option<GripperState>,
}

impl<O: GripperOutputs> Gripper<O> {
    /// Create a controller; no line is touched until the first command
    pub fn new(outputs: O, settle: Duration) -> Self {
        Self {
            outputs,
            settle,
            state: None,
        }
    }

    /// Open the jaws: deassert "close", assert "open", wait for travel
    pub fn open(&mut self) -> Result<()> {
        self.outputs.set_line(GripperLine::Close, false)?;
        self.outputs.set_line(GripperLine::Open, true)?;
        thread::sleep(self.settle);
        self.state = Some(GripperState::Open);
        log::info!("Gripper: open commanded");
        Ok(())
    }

    /// Close the jaws: deassert "open", assert "close", wait for travel
    pub fn close(&mut self) -> Result<()> {
        self.outputs.set_line(GripperLine::Open, false)?;
        self.outputs.set_line(GripperLine::Close, true)?;
        thread::sleep(self.settle);
        self.state = Some(GripperState::Closed);
        log::info!("Gripper: close commanded");
        Ok(())
    }

    /// Last commanded state, if any command has been issued
    pub fn state(&self) -> Option<GripperState> {
        self.state
    }

    /// Access the underlying output port
    pub fn outputs(&self) -> &O {
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[derive(Default)]
    struct RecordingPort {
        writes: Vec<(GripperLine, bool)>,
        open_line: bool,
        close_line: bool,
        overlap: bool,
        reject: bool,
    }

    impl GripperOutputs for RecordingPort {
        fn set_line(&mut self, line: GripperLine, asserted: bool) -> Result<()> {
            if self.reject {
                return Err(Error::ActuatorFault("output write rejected".to_string()));
            }
            match line {
                GripperLine::Open => self.open_line = asserted,
                GripperLine::Close => self.close_line = asserted,
            }
            if self.open_line && self.close_line {
                self.overlap = true;
            }
            self.writes.push((line, asserted));
            Ok(())
        }
    }

    #[test]
    fn test_open_deasserts_close_first() {
        let mut gripper = Gripper::new(RecordingPort::default(), Duration::ZERO);
        gripper.open().unwrap();

        assert_eq!(
            gripper.outputs().writes,
            vec![(GripperLine::Close, false), (GripperLine::Open, true)]
        );
        assert_eq!(gripper.state(), Some(GripperState::Open));
    }

    #[test]
    fn test_lines_never_overlap_across_transitions() {
        let mut gripper = Gripper::new(RecordingPort::default(), Duration::ZERO);
        gripper.open().unwrap();
        gripper.close().unwrap();
        gripper.open().unwrap();
        gripper.close().unwrap();

        assert!(!gripper.outputs().overlap);
        assert_eq!(gripper.state(), Some(GripperState::Closed));
    }

    #[test]
    fn test_rejected_write_propagates() {
        let port = RecordingPort {
            reject: true,
            ..RecordingPort::default()
        };
        let mut gripper = Gripper::new(port, Duration::ZERO);
        assert!(matches!(
            gripper.close().unwrap_err(),
            Error::ActuatorFault(_)
        ));
        // State is only updated after a completed transition
        assert_eq!(gripper.state(), None);
    }
}

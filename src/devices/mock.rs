//! Mock devices for hardware-free task runs and tests
//!
//! All mocks record into a shared [`EventLog`] so tests can assert on the
//! interleaving of motion segments and gripper actions across a full run.
//! Segment events are pushed by whichever thread executes the segment, so
//! the log reflects actual execution order, not submission order.

use crate::error::{Error, Result};
use crate::gripper::{GripperLine, GripperOutputs};
use crate::motion::{MotionExecutor, Segment, SegmentDriver, Submission};
use crate::registry::StaticFrameRegistry;
use crate::sensing::ForceSensor;
use crate::task::script::{GripperAction, frames};
use crate::types::{ForceVector, Pose};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// One recorded device event
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A motion segment finished executing
    Segment(Segment),
    /// A gripper line was asserted (one per open/close operation)
    Gripper(GripperAction),
}

/// Shared event log across mock devices
pub type EventLog = Arc<Mutex<Vec<Event>>>;

/// Create an empty event log
pub fn new_event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Frame names of all motion segments in a log, in execution order
pub fn segment_frames(log: &EventLog) -> Vec<String> {
    log.lock()
        .iter()
        .filter_map(|event| match event {
            Event::Segment(segment) => Some(segment.frame().unwrap_or("<hold>").to_string()),
            Event::Gripper(_) => None,
        })
        .collect()
}

/// Simulated arm: a [`SegmentDriver`] with configurable per-segment
/// transit time (timing jitter for ordering tests)
pub struct MockArm {
    log: EventLog,
    segment_time: Duration,
}

impl MockArm {
    /// Arm completing every segment instantly
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            segment_time: Duration::ZERO,
        }
    }

    /// Simulate physical transit time per segment
    pub fn with_segment_time(mut self, segment_time: Duration) -> Self {
        self.segment_time = segment_time;
        self
    }
}

impl SegmentDriver for MockArm {
    fn execute(&mut self, segment: &Segment) -> Result<()> {
        if !self.segment_time.is_zero() {
            thread::sleep(self.segment_time);
        }
        self.log.lock().push(Event::Segment(segment.clone()));
        Ok(())
    }
}

/// Immediate-completion executor recording every submission
///
/// For pure sequence tests where the queue semantics are out of scope.
#[derive(Clone)]
pub struct RecordingExecutor {
    log: EventLog,
    submissions: Arc<Mutex<Vec<(Segment, Submission)>>>,
}

impl RecordingExecutor {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            submissions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every submission seen so far, with its submission kind
    pub fn submissions(&self) -> Vec<(Segment, Submission)> {
        self.submissions.lock().clone()
    }
}

impl MotionExecutor for RecordingExecutor {
    fn submit(&mut self, segment: Segment, submission: Submission) -> Result<()> {
        self.log.lock().push(Event::Segment(segment.clone()));
        self.submissions.lock().push((segment, submission));
        Ok(())
    }
}

struct MockGripperInner {
    open_line: bool,
    close_line: bool,
    ever_both_asserted: bool,
    writes: Vec<(GripperLine, bool)>,
}

/// Mock gripper output port tracking line exclusivity
///
/// Clones share state, so a test can keep one handle while the gripper
/// controller owns another.
#[derive(Clone)]
pub struct MockGripperPort {
    log: EventLog,
    inner: Arc<Mutex<MockGripperInner>>,
}

impl MockGripperPort {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            inner: Arc::new(Mutex::new(MockGripperInner {
                open_line: false,
                close_line: false,
                ever_both_asserted: false,
                writes: Vec::new(),
            })),
        }
    }

    /// True if at any captured instant both lines were asserted
    pub fn ever_both_asserted(&self) -> bool {
        self.inner.lock().ever_both_asserted
    }

    /// All line writes in order
    pub fn writes(&self) -> Vec<(GripperLine, bool)> {
        self.inner.lock().writes.clone()
    }
}

impl GripperOutputs for MockGripperPort {
    fn set_line(&mut self, line: GripperLine, asserted: bool) -> Result<()> {
        let mut inner = self.inner.lock();
        match line {
            GripperLine::Open => inner.open_line = asserted,
            GripperLine::Close => inner.close_line = asserted,
        }
        if inner.open_line && inner.close_line {
            inner.ever_both_asserted = true;
        }
        inner.writes.push((line, asserted));
        if asserted {
            let action = match line {
                GripperLine::Open => GripperAction::Open,
                GripperLine::Close => GripperAction::Close,
            };
            self.log.lock().push(Event::Gripper(action));
        }
        Ok(())
    }
}

/// Force sensor replaying a scripted sample stream
///
/// Exhausting the script is a [`Error::SensorFault`], which bounds tests
/// that expect the release loop never to trigger. With `repeating`, the
/// last sample repeats forever instead (for timeout and debounce tests).
pub struct ScriptedForceSensor {
    samples: VecDeque<ForceVector>,
    repeat_last: bool,
    last: Option<ForceVector>,
    reads: usize,
}

impl ScriptedForceSensor {
    /// Finite sample stream; exhaustion faults
    pub fn new(samples: Vec<ForceVector>) -> Self {
        Self {
            samples: samples.into(),
            repeat_last: false,
            last: None,
            reads: 0,
        }
    }

    /// Sample stream whose last sample repeats forever
    pub fn repeating(samples: Vec<ForceVector>) -> Self {
        Self {
            repeat_last: true,
            ..Self::new(samples)
        }
    }

    /// Finite stream of pure Z-axis forces
    pub fn from_z(z_values: &[f64]) -> Self {
        Self::new(
            z_values
                .iter()
                .map(|&z| ForceVector::new(0.0, 0.0, z))
                .collect(),
        )
    }

    /// Number of samples consumed
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl ForceSensor for ScriptedForceSensor {
    fn read_force(&mut self) -> Result<ForceVector> {
        let sample = match self.samples.pop_front() {
            Some(sample) => sample,
            None if self.repeat_last => self
                .last
                .ok_or_else(|| Error::SensorFault("no scripted force samples".to_string()))?,
            None => {
                return Err(Error::SensorFault(
                    "scripted force samples exhausted".to_string(),
                ));
            }
        };
        self.last = Some(sample);
        self.reads += 1;
        Ok(sample)
    }
}

/// Registry with placeholder poses for every choreography frame
///
/// Real cells teach these waypoints on the robot; the demo layout just
/// spreads them out so logs and tests have distinct coordinates.
pub fn demo_frames() -> StaticFrameRegistry {
    StaticFrameRegistry::from_frames(
        frames::all()
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name, Pose::at(100.0 * i as f64, 50.0, 400.0))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_frames_cover_choreography() {
        use crate::registry::FrameRegistry;
        let registry = demo_frames();
        for name in frames::all() {
            registry.resolve(name).unwrap();
        }
    }

    #[test]
    fn test_scripted_sensor_exhaustion_faults() {
        let mut sensor = ScriptedForceSensor::from_z(&[1.0]);
        sensor.read_force().unwrap();
        assert!(matches!(
            sensor.read_force().unwrap_err(),
            Error::SensorFault(_)
        ));
        assert_eq!(sensor.reads(), 1);
    }

    #[test]
    fn test_repeating_sensor_never_exhausts() {
        let mut sensor = ScriptedForceSensor::repeating(vec![ForceVector::new(0.0, 0.0, 7.0)]);
        for _ in 0..10 {
            assert_eq!(sensor.read_force().unwrap().z, 7.0);
        }
        assert_eq!(sensor.reads(), 10);
    }
}

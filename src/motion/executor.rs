//! Motion executor seam and the FIFO queue implementation
//!
//! The orchestrator submits [`Segment`]s either blocking (the call returns
//! once the arm has physically completed the segment, and transitively
//! everything queued ahead of it) or queued (the call returns immediately,
//! letting the next command be issued while the arm is in transit). Queued
//! submission is the sole source of concurrency in the system; it exists
//! purely to produce smooth blended multi-segment paths.
//!
//! [`QueuedExecutor`] realizes those semantics over a [`SegmentDriver`],
//! which drives exactly one segment to physical completion. Segments
//! execute in strict submission order; blending never reorders.

use crate::error::{Error, Result};
use crate::motion::command::{ControlMode, MotionCommand};
use crate::types::Pose;
use crossbeam_channel::{Sender, unbounded};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Blocking vs. queued submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Suspend the caller until physical completion
    Blocking,
    /// Enqueue and return immediately
    Queued,
}

/// Unit of work handed to the executor
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Move to a resolved pose
    Move {
        command: MotionCommand,
        pose: Pose,
    },
    /// Timed position-hold at the current pose, typically under an
    /// oscillation pattern for agitation
    Hold {
        control: ControlMode,
        duration: Duration,
    },
}

impl Segment {
    /// Control mode this segment runs under
    pub fn control(&self) -> &ControlMode {
        match self {
            Segment::Move { command, .. } => &command.control,
            Segment::Hold { control, .. } => control,
        }
    }

    /// Target frame name, if this is a move
    pub fn frame(&self) -> Option<&str> {
        match self {
            Segment::Move { command, .. } => Some(&command.target),
            Segment::Hold { .. } => None,
        }
    }
}

/// Accepts motion segments for execution against one arm/tool
pub trait MotionExecutor: Send {
    /// Submit a segment
    ///
    /// Fails with [`Error::MotionFault`] on unreachable target, limit
    /// violation or collision stop. For queued submissions the fault may
    /// surface on a later call (fail-fast, no recovery).
    fn submit(&mut self, segment: Segment, submission: Submission) -> Result<()>;
}

/// Drives a single segment to physical completion
pub trait SegmentDriver: Send + 'static {
    /// Execute one segment, returning when the arm is done with it
    fn execute(&mut self, segment: &Segment) -> Result<()>;
}

struct QueueItem {
    segment: Segment,
    /// Present for blocking submissions: signalled on completion
    done: Option<Sender<Result<()>>>,
}

/// FIFO motion queue with a dedicated execution thread
///
/// One instance owns one arm/tool for the task's duration. A fault raised
/// by a queued segment is latched and returned from the next submission;
/// segments behind a latched fault are refused.
pub struct QueuedExecutor {
    tx: Option<Sender<QueueItem>>,
    worker: Option<JoinHandle<()>>,
    fault: Arc<Mutex<Option<Error>>>,
}

impl QueuedExecutor {
    /// Spawn the execution thread around a segment driver
    pub fn new<D: SegmentDriver>(mut driver: D) -> Result<Self> {
        let (tx, rx) = unbounded::<QueueItem>();
        let fault = Arc::new(Mutex::new(None));
        let worker_fault = Arc::clone(&fault);

        let worker = thread::Builder::new()
            .name("motion-queue".to_string())
            .spawn(move || {
                for item in rx.iter() {
                    // Refuse everything behind a latched fault
                    if worker_fault.lock().is_some() {
                        if let Some(done) = item.done {
                            let _ = done.send(Err(Error::MotionFault(
                                "queue aborted by earlier fault".to_string(),
                            )));
                        }
                        continue;
                    }

                    let result = driver.execute(&item.segment);
                    match (result, item.done) {
                        (Ok(()), Some(done)) => {
                            let _ = done.send(Ok(()));
                        }
                        (Ok(()), None) => {}
                        (Err(e), Some(done)) => {
                            let _ = done.send(Err(e));
                        }
                        (Err(e), None) => {
                            log::error!("Motion queue: queued segment faulted: {}", e);
                            *worker_fault.lock() = Some(e);
                        }
                    }
                }
            })?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
            fault,
        })
    }
}

impl MotionExecutor for QueuedExecutor {
    fn submit(&mut self, segment: Segment, submission: Submission) -> Result<()> {
        // Surface a fault latched by an earlier queued segment
        if let Some(fault) = self.fault.lock().take() {
            return Err(fault);
        }

        let tx = self.tx.as_ref().ok_or(Error::ExecutorStopped)?;
        match submission {
            Submission::Queued => tx
                .send(QueueItem {
                    segment,
                    done: None,
                })
                .map_err(|_| Error::ExecutorStopped),
            Submission::Blocking => {
                let (done_tx, done_rx) = unbounded();
                tx.send(QueueItem {
                    segment,
                    done: Some(done_tx),
                })
                .map_err(|_| Error::ExecutorStopped)?;
                // FIFO worker: completion of this segment implies everything
                // queued ahead of it has physically completed
                done_rx.recv().map_err(|_| Error::ExecutorStopped)?
            }
        }
    }
}

impl Drop for QueuedExecutor {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop after the queue drains
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

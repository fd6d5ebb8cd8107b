//! The orchestrator loop and the force-triggered release wait
//!
//! A single thread of control walks the phase scripts, resolving frames
//! and submitting segments; the only concurrency is the motion queue
//! draining queued segments behind the scenes. Any fault aborts the run
//! unrecovered. The arm and gripper are independent actuators: the loop
//! never submits a motion that assumes a gripper state until the gripper
//! operation has returned.

use crate::config::{ForceTriggerConfig, TaskConfig};
use crate::error::{Error, Result};
use crate::gripper::{Gripper, GripperOutputs, GripperState};
use crate::motion::{MotionExecutor, Segment};
use crate::registry::FrameRegistry;
use crate::sensing::ForceSensor;
use crate::task::phase::{self, TaskPhase, WorldState};
use crate::task::script::{self, GripperAction, PhaseScript, Step};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Shared flag requesting task abort
///
/// Checked between steps and on every force poll; a cancelled run fails
/// with [`Error::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an un-cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Poll the force sensor until the trigger condition fires
///
/// Reads one sample per iteration, takes the absolute value of the
/// configured axis component and compares it to the threshold. With a zero
/// debounce window a single transient spike triggers; otherwise the force
/// must stay above threshold for the whole window. Returns
/// [`Error::ForceTriggerTimeout`] if a timeout is configured and elapses,
/// [`Error::Cancelled`] on token cancellation, and any sensor fault as-is.
pub fn wait_for_trigger<S: ForceSensor>(
    sensor: &mut S,
    config: &ForceTriggerConfig,
    cancel: &CancelToken,
) -> Result<()> {
    let started = Instant::now();
    let debounce = Duration::from_millis(config.debounce_ms);
    let poll = Duration::from_millis(config.poll_interval_ms);
    let timeout = config.timeout_ms.map(Duration::from_millis);
    let mut above_since: Option<Instant> = None;

    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if let Some(limit) = timeout
            && started.elapsed() >= limit
        {
            return Err(Error::ForceTriggerTimeout {
                waited: started.elapsed(),
            });
        }

        let sample = sensor.read_force()?;
        let magnitude = sample.component(config.axis).abs();
        if magnitude > config.threshold {
            let since = *above_since.get_or_insert_with(Instant::now);
            if debounce.is_zero() || since.elapsed() >= debounce {
                log::info!(
                    "Force trigger: |{:?}| = {:.1} N exceeded threshold {:.1} N",
                    config.axis,
                    magnitude,
                    config.threshold
                );
                return Ok(());
            }
        } else {
            above_since = None;
        }

        if !poll.is_zero() {
            thread::sleep(poll);
        }
    }
}

/// Drives the four-phase serving task against the collaborator seams
pub struct TaskOrchestrator<E, O, S, R>
where
    E: MotionExecutor,
    O: GripperOutputs,
    S: ForceSensor,
    R: FrameRegistry,
{
    executor: E,
    gripper: Gripper<O>,
    sensor: S,
    frames: R,
    config: TaskConfig,
    world: WorldState,
    cancel: CancelToken,
}

impl<E, O, S, R> TaskOrchestrator<E, O, S, R>
where
    E: MotionExecutor,
    O: GripperOutputs,
    S: ForceSensor,
    R: FrameRegistry,
{
    /// Create an orchestrator; the config is immutable from here on
    pub fn new(
        executor: E,
        gripper: Gripper<O>,
        sensor: S,
        frames: R,
        config: TaskConfig,
        cancel: CancelToken,
    ) -> Self {
        Self {
            executor,
            gripper,
            sensor,
            frames,
            config,
            world: WorldState::initial(),
            cancel,
        }
    }

    /// Run the full task: Home, GlassTransfer, BottlePourServe,
    /// PresentAndRelease
    pub fn run(&mut self) -> Result<()> {
        for phase_script in script::build_task(&self.config) {
            self.run_phase(phase_script)?;
        }
        log::info!("Task complete");
        Ok(())
    }

    /// Run one phase after checking its precondition guard
    pub fn run_phase(&mut self, phase_script: PhaseScript) -> Result<()> {
        let phase = phase_script.phase;
        phase::check_precondition(phase, &self.world)?;
        log::info!(
            "Phase {}: starting ({} steps)",
            phase.name(),
            phase_script.steps.len()
        );

        for step in phase_script.steps {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            self.run_step(phase, step)?;
        }

        phase::apply_postcondition(phase, &mut self.world);
        log::info!("Phase {}: complete", phase.name());
        Ok(())
    }

    fn run_step(&mut self, phase: TaskPhase, step: Step) -> Result<()> {
        match step {
            Step::Move {
                command,
                submission,
            } => {
                let pose = self.frames.resolve(&command.target)?;
                log::debug!(
                    "{}: {:?} move to '{}' ({:?})",
                    phase.name(),
                    command.interpolation,
                    command.target,
                    submission
                );
                self.executor.submit(Segment::Move { command, pose }, submission)
            }
            Step::Hold {
                control,
                duration,
                submission,
            } => {
                log::debug!("{}: position hold for {:?}", phase.name(), duration);
                self.executor
                    .submit(Segment::Hold { control, duration }, submission)
            }
            Step::Gripper(action) => {
                let state = match action {
                    GripperAction::Open => {
                        self.gripper.open()?;
                        GripperState::Open
                    }
                    GripperAction::Close => {
                        self.gripper.close()?;
                        GripperState::Closed
                    }
                };
                self.world.gripper = Some(state);
                Ok(())
            }
            Step::Dwell(duration) => {
                thread::sleep(duration);
                Ok(())
            }
            Step::AwaitRelease => {
                log::info!("{}: waiting for force trigger", phase.name());
                wait_for_trigger(&mut self.sensor, &self.config.force_trigger, &self.cancel)?;
                thread::sleep(Duration::from_millis(self.config.force_trigger.settle_ms));
                self.gripper.open()?;
                self.world.gripper = Some(GripperState::Open);
                Ok(())
            }
        }
    }

    /// Physical state as tracked so far (commanded, not sensed)
    pub fn world(&self) -> &WorldState {
        &self.world
    }
}

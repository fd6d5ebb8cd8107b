//! Full-task choreography properties
//!
//! Runs the complete four-phase serving task against mock devices and
//! checks the properties the cell relies on:
//! - device event order is deterministic regardless of transit-time jitter
//! - the two gripper output lines are never asserted together
//! - every grasp and release follows a blocking, non-blended arrival
//! - compliant control modes stay scoped to pour and agitation segments
//! - the run ends with a force-triggered release and a blocking joint
//!   move back home
//!
//! Run with: `cargo test --test choreography`

use std::time::Duration;
use sutradhar::config::TaskConfig;
use sutradhar::devices::mock::{
    Event, EventLog, MockArm, MockGripperPort, ScriptedForceSensor, demo_frames, new_event_log,
    segment_frames,
};
use sutradhar::error::Error;
use sutradhar::gripper::Gripper;
use sutradhar::motion::{Blend, Interpolation, QueuedExecutor, Segment};
use sutradhar::registry::StaticFrameRegistry;
use sutradhar::task::{CancelToken, GripperAction, TaskOrchestrator, frames};
use sutradhar::types::ForceVector;

// ============================================================================
// Test rig
// ============================================================================

/// Default tuning with every dwell and settle zeroed so runs are fast
fn fast_config() -> TaskConfig {
    let mut config = TaskConfig::lbr_defaults();
    config.gripper.settle_ms = 0;
    config.pour.dwell_ms = 0;
    config.agitation.settle_ms = 0;
    config.agitation.shuttle_dwell_ms = 0;
    config.force_trigger.settle_ms = 0;
    config.force_trigger.poll_interval_ms = 0;
    config.force_trigger.post_release_dwell_ms = 0;
    config
}

/// Force ramp whose last sample crosses the 20 N threshold
fn trigger_ramp() -> ScriptedForceSensor {
    ScriptedForceSensor::new(vec![
        ForceVector::new(0.0, 0.0, 2.0),
        ForceVector::new(0.0, 0.0, 5.0),
        ForceVector::new(0.0, 0.0, 18.0),
        ForceVector::new(0.0, 0.0, 24.0),
    ])
}

/// Run the full task on mocks with the given per-segment transit time;
/// returns the shared event log and a handle on the gripper port
fn run_full_task(segment_time: Duration) -> (EventLog, MockGripperPort) {
    let log = new_event_log();
    let arm = MockArm::new(log.clone()).with_segment_time(segment_time);
    let executor = QueuedExecutor::new(arm).unwrap();
    let port = MockGripperPort::new(log.clone());
    let gripper = Gripper::new(port.clone(), Duration::ZERO);

    let mut orchestrator = TaskOrchestrator::new(
        executor,
        gripper,
        trigger_ramp(),
        demo_frames(),
        fast_config(),
        CancelToken::new(),
    );
    orchestrator.run().unwrap();

    let world = orchestrator.world();
    assert!(world.at_home);
    assert!(world.glass_placed);
    assert!(world.drink_poured);

    (log, port)
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_event_order_deterministic_under_jitter() {
    let (instant, _) = run_full_task(Duration::ZERO);
    let (jittered, _) = run_full_task(Duration::from_millis(3));

    assert_eq!(*instant.lock(), *jittered.lock());
    // and both match the scripted frame order
    assert_eq!(segment_frames(&instant)[0], frames::HOME);
}

#[test]
fn test_gripper_lines_never_both_asserted() {
    let (_, port) = run_full_task(Duration::from_millis(1));
    assert!(!port.ever_both_asserted());
}

#[test]
fn test_grasp_and_release_follow_blocking_stop() {
    let (log, _) = run_full_task(Duration::ZERO);
    let events = log.lock().clone();

    let mut closes = 0;
    let mut opens = 0;
    for (i, event) in events.iter().enumerate() {
        let Event::Gripper(action) = event else {
            continue;
        };
        match action {
            GripperAction::Close => closes += 1,
            GripperAction::Open => opens += 1,
        }
        // Every gripper operation is issued only once the arm is at rest:
        // the preceding device event is a non-blended move arrival
        match &events[i - 1] {
            Event::Segment(Segment::Move { command, .. }) => {
                assert_eq!(
                    command.blend,
                    Blend::None,
                    "gripper {:?} after blended move to {}",
                    action,
                    command.target
                );
            }
            other => panic!("gripper {:?} not preceded by an arrival: {:?}", action, other),
        }
    }
    // three grasps (glass, bottle, presentation), four releases (initial,
    // glass place, bottle return, force-triggered)
    assert_eq!(closes, 3);
    assert_eq!(opens, 4);
}

#[test]
fn test_compliant_modes_scoped_to_pour_and_agitation() {
    let (log, _) = run_full_task(Duration::ZERO);
    let segments: Vec<Segment> = log
        .lock()
        .iter()
        .filter_map(|event| match event {
            Event::Segment(segment) => Some(segment.clone()),
            _ => None,
        })
        .collect();

    let compliant: Vec<usize> = segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| segment.control().is_compliant())
        .map(|(i, _)| i)
        .collect();

    // Exactly the pour-contact stroke and the two agitation holds
    assert_eq!(compliant.len(), 3);
    assert_eq!(segments[compliant[0]].frame(), Some(frames::POUR_CONTACT));
    assert!(segments[compliant[1]].frame().is_none());
    assert!(segments[compliant[2]].frame().is_none());
    // The holds run back to back
    assert_eq!(compliant[2], compliant[1] + 1);

    // The segment after each compliant block reverts to position control
    assert!(!segments[compliant[0] + 1].control().is_compliant());
    assert!(!segments[compliant[2] + 1].control().is_compliant());
}

#[test]
fn test_run_ends_with_force_release_then_home() {
    let (log, _) = run_full_task(Duration::ZERO);
    let events = log.lock().clone();

    // Final device event: blocking joint move back home
    match events.last().unwrap() {
        Event::Segment(Segment::Move { command, .. }) => {
            assert_eq!(command.target, frames::HOME);
            assert_eq!(command.interpolation, Interpolation::Joint);
        }
        other => panic!("unexpected final event: {:?}", other),
    }

    // Last gripper operation is the force-triggered open, after the
    // presentation hold and before the return home
    let last_gripper = events
        .iter()
        .rposition(|event| matches!(event, Event::Gripper(_)))
        .unwrap();
    assert_eq!(events[last_gripper], Event::Gripper(GripperAction::Open));
    let hold_index = events
        .iter()
        .position(|event| {
            matches!(event, Event::Segment(Segment::Move { command, .. })
                if command.target == frames::PRESENT_HOLD)
        })
        .unwrap();
    assert!(last_gripper > hold_index);
    assert_eq!(last_gripper, events.len() - 2);
}

#[test]
fn test_unregistered_frame_aborts_run() {
    let log = new_event_log();
    let executor = QueuedExecutor::new(MockArm::new(log.clone())).unwrap();
    let gripper = Gripper::new(MockGripperPort::new(log.clone()), Duration::ZERO);

    let mut orchestrator = TaskOrchestrator::new(
        executor,
        gripper,
        trigger_ramp(),
        StaticFrameRegistry::new(),
        fast_config(),
        CancelToken::new(),
    );

    let err = orchestrator.run().unwrap_err();
    assert!(matches!(err, Error::PoseResolution(name) if name == frames::HOME));
}

#[test]
fn test_cancellation_aborts_before_first_step() {
    let log = new_event_log();
    let executor = QueuedExecutor::new(MockArm::new(log.clone())).unwrap();
    let gripper = Gripper::new(MockGripperPort::new(log.clone()), Duration::ZERO);
    let cancel = CancelToken::new();
    cancel.cancel();

    let mut orchestrator = TaskOrchestrator::new(
        executor,
        gripper,
        trigger_ramp(),
        demo_frames(),
        fast_config(),
        cancel,
    );

    assert!(matches!(orchestrator.run().unwrap_err(), Error::Cancelled));
    assert!(log.lock().is_empty());
}

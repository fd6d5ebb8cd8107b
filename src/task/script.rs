//! Declarative choreography: the fixed step sequence per phase
//!
//! The task is authored as data - a list of [`Step`]s per phase built from
//! the operator tuning in [`TaskConfig`] - and consumed by the generic
//! orchestrator loop. Waypoint coordinates never appear here; steps refer
//! to frames by symbolic name and the registry supplies the poses.
//!
//! Segment policy:
//! - Queued submission with a blend tolerance for free-space transits,
//!   letting consecutive segments round corners without stopping.
//! - Blocking submission with a full stop (no blend) immediately before
//!   every grasp, release and the decapping strokes, where position
//!   accuracy matters more than speed.
//! - Compliant control modes appear only on the pour-contact stroke and
//!   the two agitation holds; every other segment runs stiff position
//!   control.

use crate::config::TaskConfig;
use crate::motion::{
    CartPlane, ControlMode, ImpedanceProfile, MotionCommand, OscillationAxis, SinePattern,
    SpiralPattern, Submission,
};
use crate::task::phase::TaskPhase;
use std::time::Duration;

/// Symbolic frame names used by the choreography
///
/// These are registry keys; the actual poses are taught on the cell.
pub mod frames {
    pub const HOME: &str = "home";

    pub const GLASS_APPROACH: &str = "glass_approach";
    pub const GLASS_PRE_PICK: &str = "glass_pre_pick";
    pub const GLASS_PICK: &str = "glass_pick";
    pub const GLASS_LIFT: &str = "glass_lift";
    pub const GLASS_TRANSIT: &str = "glass_transit";
    pub const GLASS_PLACE: &str = "glass_place";

    pub const BOTTLE_PRE_PICK: &str = "bottle_pre_pick";
    pub const BOTTLE_PICK: &str = "bottle_pick";
    pub const OPENER_APPROACH: &str = "opener_approach";
    pub const OPENER_ALIGN: &str = "opener_align";
    pub const OPENER_STAGE: &str = "opener_stage";
    pub const OPENER_ENGAGE: &str = "opener_engage";
    pub const DECAP_PULL: &str = "decap_pull";
    pub const DECAP_CLEAR: &str = "decap_clear";
    pub const POUR_TRANSIT: &str = "pour_transit";
    pub const POUR_APPROACH: &str = "pour_approach";
    pub const POUR_CONTACT: &str = "pour_contact";
    pub const POUR_EXIT: &str = "pour_exit";
    pub const SHAKE_TRANSIT: [&str; 5] = [
        "shake_transit_1",
        "shake_transit_2",
        "shake_transit_3",
        "shake_transit_4",
        "shake_transit_5",
    ];
    pub const SHAKE_ZONE: &str = "shake_zone";
    pub const SHAKE_EXIT: &str = "shake_exit";
    pub const SHUTTLE_A: &str = "shuttle_a";
    pub const SHUTTLE_B: &str = "shuttle_b";
    pub const SERVE_TRANSIT: &str = "serve_transit";
    pub const SERVE_APPROACH: &str = "serve_approach";
    pub const SERVE_PLACE: &str = "serve_place";

    pub const PRESENT_AIR: &str = "present_air";
    pub const PRESENT_PRE_GRASP: &str = "present_pre_grasp";
    pub const PRESENT_GRASP: &str = "present_grasp";
    pub const PRESENT_LIFT: &str = "present_lift";
    pub const PRESENT_HOLD: &str = "present_hold";

    /// Every frame the choreography references
    pub fn all() -> Vec<&'static str> {
        let mut names = vec![
            HOME,
            GLASS_APPROACH,
            GLASS_PRE_PICK,
            GLASS_PICK,
            GLASS_LIFT,
            GLASS_TRANSIT,
            GLASS_PLACE,
            BOTTLE_PRE_PICK,
            BOTTLE_PICK,
            OPENER_APPROACH,
            OPENER_ALIGN,
            OPENER_STAGE,
            OPENER_ENGAGE,
            DECAP_PULL,
            DECAP_CLEAR,
            POUR_TRANSIT,
            POUR_APPROACH,
            POUR_CONTACT,
            POUR_EXIT,
        ];
        names.extend(SHAKE_TRANSIT);
        names.extend([
            SHAKE_ZONE,
            SHAKE_EXIT,
            SHUTTLE_A,
            SHUTTLE_B,
            SERVE_TRANSIT,
            SERVE_APPROACH,
            SERVE_PLACE,
            PRESENT_AIR,
            PRESENT_PRE_GRASP,
            PRESENT_GRASP,
            PRESENT_LIFT,
            PRESENT_HOLD,
        ]);
        names
    }
}

/// Gripper operation within a script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GripperAction {
    Open,
    Close,
}

/// One step of the choreography
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Submit a motion segment
    Move {
        command: MotionCommand,
        submission: Submission,
    },
    /// Timed position-hold, used for the agitation oscillations
    Hold {
        control: ControlMode,
        duration: Duration,
        submission: Submission,
    },
    /// Actuate the gripper (the step returns after the settle delay)
    Gripper(GripperAction),
    /// Fixed pause
    Dwell(Duration),
    /// Poll the force sensor until the release trigger fires, then open
    /// the gripper
    AwaitRelease,
}

/// The fixed step sequence of one phase
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseScript {
    pub phase: TaskPhase,
    pub steps: Vec<Step>,
}

fn queued(command: MotionCommand) -> Step {
    Step::Move {
        command,
        submission: Submission::Queued,
    }
}

fn blocking(command: MotionCommand) -> Step {
    Step::Move {
        command,
        submission: Submission::Blocking,
    }
}

/// Home: a single blocking joint move establishing the known start state
fn home_steps(config: &TaskConfig) -> Vec<Step> {
    vec![blocking(MotionCommand::joint(
        frames::HOME,
        config.motion.joint_vel,
    ))]
}

/// GlassTransfer: pick the glass and place it at the serving position
fn glass_transfer_steps(config: &TaskConfig) -> Vec<Step> {
    let m = &config.motion;
    vec![
        Step::Gripper(GripperAction::Open),
        queued(MotionCommand::joint(frames::GLASS_APPROACH, m.joint_vel).with_blend(m.blend_transit)),
        queued(MotionCommand::linear(frames::GLASS_PRE_PICK, m.path_vel).with_blend(m.blend_transit)),
        // Full stop at the pick pose before grasping
        blocking(MotionCommand::linear(frames::GLASS_PICK, m.path_vel)),
        Step::Gripper(GripperAction::Close),
        queued(MotionCommand::linear(frames::GLASS_LIFT, m.path_vel).with_blend(m.blend_transit)),
        queued(MotionCommand::joint(frames::GLASS_TRANSIT, m.joint_vel).with_blend(m.blend_transit)),
        blocking(MotionCommand::linear(frames::GLASS_PLACE, m.path_vel)),
        Step::Gripper(GripperAction::Open),
        queued(MotionCommand::linear(frames::GLASS_TRANSIT, m.path_vel).with_blend(m.blend_transit)),
    ]
}

/// BottlePourServe: pick the bottle, decap it on the opener fixture, pour
/// under impedance, agitate and return it
fn bottle_pour_serve_steps(config: &TaskConfig) -> Vec<Step> {
    let m = &config.motion;
    let pour = &config.pour;
    let ag = &config.agitation;

    let pour_mode = ControlMode::Impedance(ImpedanceProfile {
        stiffness: pour.stiffness,
        damping: pour.damping,
    });
    let sine_mode = ControlMode::SineOscillation(SinePattern {
        axis: OscillationAxis::RotZ,
        frequency_hz: ag.sine_frequency_hz,
        amplitude: ag.sine_amplitude,
        stiffness: ag.sine_stiffness,
        damping: ag.sine_damping,
    });
    let spiral_mode = ControlMode::SpiralOscillation(SpiralPattern {
        plane: CartPlane::XY,
        frequency_hz: ag.spiral_frequency_hz,
        amplitude: ag.spiral_amplitude,
        stiffness: ag.spiral_stiffness,
        rise_s: ag.spiral_rise_s,
        hold_s: ag.spiral_hold_s,
        fall_s: ag.spiral_fall_s,
    });

    let mut steps = vec![
        // Bottle pick, same pattern as the glass
        queued(MotionCommand::joint(frames::BOTTLE_PRE_PICK, m.joint_vel).with_blend(m.blend_transit)),
        blocking(MotionCommand::linear(frames::BOTTLE_PICK, m.path_vel)),
        Step::Gripper(GripperAction::Close),
        queued(MotionCommand::linear(frames::BOTTLE_PRE_PICK, m.path_vel).with_blend(m.blend_transit)),
        // Align with the opener fixture
        queued(MotionCommand::joint(frames::OPENER_APPROACH, m.joint_vel).with_blend(m.blend_transit)),
        queued(MotionCommand::linear(frames::OPENER_ALIGN, m.path_vel).with_blend(m.blend_transit)),
        queued(MotionCommand::linear(frames::OPENER_STAGE, m.path_vel).with_blend(m.blend_transit)),
        // Decapping: accuracy over speed, every stroke ends at rest
        blocking(MotionCommand::linear(frames::OPENER_ENGAGE, m.path_vel)),
        blocking(MotionCommand::linear(frames::DECAP_PULL, m.decap_vel)),
        blocking(MotionCommand::linear(frames::DECAP_CLEAR, m.decap_vel)),
        // Pour approach under impedance so rim contact is absorbed
        queued(MotionCommand::joint(frames::POUR_TRANSIT, m.joint_vel).with_blend(m.blend_transit)),
        queued(MotionCommand::linear(frames::POUR_APPROACH, m.approach_vel).with_blend(m.blend_transit)),
        blocking(MotionCommand::linear(frames::POUR_CONTACT, pour.contact_vel).with_control(pour_mode)),
        Step::Dwell(Duration::from_millis(pour.dwell_ms)),
        blocking(MotionCommand::linear(frames::POUR_EXIT, m.path_vel_fast)),
    ];

    // Carry toward the agitation zone
    for frame in frames::SHAKE_TRANSIT {
        steps.push(queued(
            MotionCommand::linear(frame, m.path_vel_fast).with_blend(m.blend_shuttle),
        ));
    }
    steps.push(queued(
        MotionCommand::linear(frames::SHAKE_ZONE, m.path_vel).with_blend(m.blend_shuttle),
    ));

    // Oscillation holds: rotational sine, then planar spiral
    steps.push(Step::Hold {
        control: sine_mode,
        duration: Duration::from_millis(ag.sine_duration_ms),
        submission: Submission::Queued,
    });
    steps.push(Step::Hold {
        control: spiral_mode,
        duration: Duration::from_millis(ag.spiral_duration_ms),
        submission: Submission::Queued,
    });
    steps.push(Step::Dwell(Duration::from_millis(ag.settle_ms)));

    // Back-and-forth shuttle to agitate the contents
    steps.push(queued(
        MotionCommand::linear(frames::SHAKE_EXIT, m.retreat_vel).with_blend(m.blend_shuttle),
    ));
    steps.push(queued(
        MotionCommand::linear(frames::SHUTTLE_A, m.path_vel_fast).with_blend(m.blend_shuttle),
    ));
    for _ in 1..config.agitation.shuttle_pairs.max(1) {
        steps.push(queued(
            MotionCommand::linear(frames::SHUTTLE_B, m.shuttle_vel).with_blend(m.blend_shuttle),
        ));
        steps.push(queued(
            MotionCommand::linear(frames::SHUTTLE_A, m.shuttle_vel).with_blend(m.blend_shuttle),
        ));
    }
    steps.push(blocking(MotionCommand::linear(
        frames::SHUTTLE_B,
        m.shuttle_vel,
    )));
    steps.push(Step::Dwell(Duration::from_millis(ag.shuttle_dwell_ms)));

    // Return the bottle
    steps.extend([
        queued(MotionCommand::linear(frames::SHUTTLE_A, m.path_vel).with_blend(m.blend_shuttle)),
        queued(MotionCommand::joint(frames::SERVE_TRANSIT, m.joint_vel).with_blend(m.blend_shuttle)),
        queued(MotionCommand::linear(frames::SERVE_APPROACH, m.path_vel).with_blend(m.blend_shuttle)),
        blocking(MotionCommand::linear(frames::SERVE_PLACE, m.approach_vel)),
        Step::Gripper(GripperAction::Open),
        queued(MotionCommand::linear(frames::SERVE_APPROACH, m.path_vel).with_blend(m.blend_shuttle)),
    ]);

    steps
}

/// PresentAndRelease: grasp the glass for presentation, hold until the
/// force trigger fires, release and return home
fn present_and_release_steps(config: &TaskConfig) -> Vec<Step> {
    let m = &config.motion;
    vec![
        queued(MotionCommand::joint(frames::PRESENT_AIR, m.joint_vel).with_blend(m.blend_transit)),
        queued(MotionCommand::linear(frames::PRESENT_PRE_GRASP, m.path_vel).with_blend(m.blend_transit)),
        blocking(MotionCommand::linear(frames::PRESENT_GRASP, m.path_vel)),
        Step::Gripper(GripperAction::Close),
        blocking(MotionCommand::linear(frames::PRESENT_LIFT, m.path_vel)),
        blocking(MotionCommand::linear(frames::PRESENT_HOLD, m.path_vel)),
        Step::AwaitRelease,
        Step::Dwell(Duration::from_millis(
            config.force_trigger.post_release_dwell_ms,
        )),
        blocking(MotionCommand::joint(frames::HOME, m.joint_vel)),
    ]
}

/// Build the step sequence of one phase
pub fn build_phase(phase: TaskPhase, config: &TaskConfig) -> PhaseScript {
    let steps = match phase {
        TaskPhase::Home => home_steps(config),
        TaskPhase::GlassTransfer => glass_transfer_steps(config),
        TaskPhase::BottlePourServe => bottle_pour_serve_steps(config),
        TaskPhase::PresentAndRelease => present_and_release_steps(config),
    };
    PhaseScript { phase, steps }
}

/// Build the full four-phase task
pub fn build_task(config: &TaskConfig) -> Vec<PhaseScript> {
    TaskPhase::ALL
        .into_iter()
        .map(|phase| build_phase(phase, config))
        .collect()
}

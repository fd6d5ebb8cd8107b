//! Demo runner: executes the full serving task against mock devices
//!
//! Loads operator tuning from a TOML file (defaults if absent), wires a
//! Ctrl-C handler to the cancellation token and runs the four phases on
//! the simulated arm. The force trigger fires from a scripted sample ramp
//! so the run completes unattended.

use std::env;
use std::time::Duration;
use sutradhar::config::TaskConfig;
use sutradhar::devices::mock::{MockArm, MockGripperPort, ScriptedForceSensor, demo_frames, new_event_log};
use sutradhar::error::{Error, Result};
use sutradhar::gripper::Gripper;
use sutradhar::motion::QueuedExecutor;
use sutradhar::task::{CancelToken, TaskOrchestrator};
use sutradhar::types::ForceVector;

/// Parse config path from command line arguments.
///
/// Supports:
/// - `sutradhar <path>` (positional)
/// - `sutradhar --config <path>` (flag-based)
/// - `sutradhar -c <path>` (short flag)
///
/// Defaults to `sutradhar.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    "sutradhar.toml".to_string()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = parse_config_path();
    let config = match TaskConfig::from_file(&config_path) {
        Ok(config) => {
            log::info!("Using config: {}", config_path);
            config
        }
        Err(Error::Io(e)) => {
            log::warn!("Config {} not readable ({}), using defaults", config_path, e);
            TaskConfig::lbr_defaults()
        }
        Err(e) => return Err(e),
    };

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        handler_token.cancel();
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    // Simulated rig: queued executor over a mock arm, mock gripper port,
    // and a force ramp that crosses the threshold on its last sample
    let event_log = new_event_log();
    let arm = MockArm::new(event_log.clone()).with_segment_time(Duration::from_millis(20));
    let executor = QueuedExecutor::new(arm)?;
    let gripper = Gripper::new(
        MockGripperPort::new(event_log.clone()),
        Duration::from_millis(config.gripper.settle_ms),
    );
    let sensor = ScriptedForceSensor::repeating(vec![
        ForceVector::new(0.0, 0.0, 2.0),
        ForceVector::new(0.0, 0.0, 6.0),
        ForceVector::new(0.0, 0.0, 12.0),
        ForceVector::new(0.0, 0.0, 25.0),
    ]);

    let mut orchestrator = TaskOrchestrator::new(
        executor,
        gripper,
        sensor,
        demo_frames(),
        config,
        cancel,
    );

    log::info!("Starting serving task");
    match orchestrator.run() {
        Ok(()) => {
            let events = event_log.lock().len();
            log::info!("Serving task finished ({} device events)", events);
            Ok(())
        }
        Err(e) => {
            log::error!("Serving task aborted: {}", e);
            Err(e)
        }
    }
}

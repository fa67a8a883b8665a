//! Command implementations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::Term;
use dialoguer::Input;
use openhaptic_codec::VibrationOptions;
use openhaptic_driver::VibrationMotor;

use crate::output;

/// The interactive playback flow: banner, controllers, file prompt, play
/// until a key press, stop.
pub fn play(file: Option<PathBuf>, debug_log: bool) -> Result<()> {
    let motor = VibrationMotor::global();
    if let Err(error) = motor.set_init_state(true) {
        tracing::info!(%error, "driver initialization failed");
    }
    if debug_log {
        motor.set_debug_log(true);
    }

    print_banner(motor);
    let controllers = motor.list_game_controllers();
    output::print_controllers(&controllers);
    if controllers.is_empty() {
        return Ok(());
    }

    let Some(path) = resolve_file(file) else {
        return Ok(());
    };

    motor
        .play_file(&path, &VibrationOptions::default())
        .with_context(|| format!("could not play {}", path.display()))?;
    println!("Now playing. Press any key to stop.");
    let _ = Term::stdout().read_key();
    println!();
    motor.stop()?;
    println!("Stopped.");
    Ok(())
}

/// Print the driver version line.
pub fn version() -> Result<()> {
    let motor = VibrationMotor::global();
    // Best effort: an uninitialized driver still gets the bare banner.
    let _ = motor.set_init_state(true);
    print_banner(motor);
    Ok(())
}

/// Print the connected controllers.
pub fn controllers() -> Result<()> {
    let motor = VibrationMotor::global();
    let _ = motor.set_init_state(true);
    output::print_controllers(&motor.list_game_controllers());
    Ok(())
}

fn print_banner(motor: &VibrationMotor) {
    match motor.version() {
        Ok(version) if !version.trim().is_empty() => {
            println!("OpenHaptic Vibration {version}");
        }
        _ => println!("OpenHaptic Vibration"),
    }
}

/// Take the argument path or prompt for one, with up to two retries on
/// empty input. The final candidate must exist.
fn resolve_file(arg: Option<PathBuf>) -> Option<PathBuf> {
    let mut input = arg.filter(|p| !p.as_os_str().is_empty());
    for _ in 0..2 {
        if input.is_some() {
            break;
        }
        input = prompt_for_path();
    }
    let path = input?;
    if path.exists() {
        return Some(path);
    }
    output::print_error_line("The file does not exist.");
    None
}

fn prompt_for_path() -> Option<PathBuf> {
    let answer: String = Input::new()
        .with_prompt("File path")
        .allow_empty(true)
        .interact_text()
        .ok()?;
    let answer = answer.trim();
    if answer.is_empty() {
        return None;
    }
    Some(PathBuf::from(answer))
}

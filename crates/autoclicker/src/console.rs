//! Line-oriented console front end.
//!
//! Reads one command per line from stdin on a blocking task and forwards
//! parsed commands to the controller inbox. Output for the user goes to
//! stdout; diagnostics go through tracing.

use crate::{AppCommand, AppError, AppResult, app_command::SettingField};

use std::{
    io::{BufRead, Write},
    panic::Location,
};

use autoclicker_core::{ActionSequence, HotkeyBinding, RunSettings, RunState};
use error_location::ErrorLocation;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, error, info, warn};

const HELP: &str = "\
commands:
  add                      capture the next click or scroll
  cancel                   cancel a pending capture
  remove                   remove the last action
  clear                    remove every action
  list                     show recorded actions
  set wait <seconds>       delay after each action
  set reps <count>         number of passes
  set dpi <scale>          display scale used at playback
  set jitter <seconds>     maximum random delay offset
  set random on|off        enable delay jitter
  set scroll <amount>      amount stored with captured scrolls
  start | stop             control playback
  bind <start> <stop>      set playback hotkeys (e.g. bind f6 f7)
  save | reload            write or re-read the config file
  status                   show state and settings
  help                     show this list
  quit                     exit";

/// Parses one console line. Blank lines yield `Ok(None)`.
#[track_caller]
pub(crate) fn parse_command(line: &str) -> AppResult<Option<AppCommand>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (verb.to_lowercase().as_str(), args.as_slice()) {
        ("add", []) => AppCommand::BeginCapture,
        ("cancel", []) => AppCommand::CancelCapture,
        ("remove", []) => AppCommand::RemoveLast,
        ("clear", []) => AppCommand::Clear,
        ("list", []) => AppCommand::List,
        ("set", [name, value]) => parse_setting(name, value)?,
        ("start", []) => AppCommand::StartPlayback,
        ("stop", []) => AppCommand::StopPlayback,
        ("bind", [start_key, stop_key]) => AppCommand::Bind {
            start_key: (*start_key).to_string(),
            stop_key: (*stop_key).to_string(),
        },
        ("save", []) => AppCommand::Save,
        ("reload", []) => AppCommand::Reload,
        ("status", []) => AppCommand::Status,
        ("help" | "?", []) => AppCommand::Help,
        ("quit" | "exit", []) => AppCommand::Shutdown,
        (other, _) => {
            return Err(AppError::InvalidCommand {
                reason: format!("'{}' not understood, type 'help'", other),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    Ok(Some(command))
}

#[track_caller]
fn parse_setting(name: &str, value: &str) -> AppResult<AppCommand> {
    let field = match name.to_lowercase().as_str() {
        "wait" => SettingField::Wait,
        "reps" | "repetitions" => SettingField::Repetitions,
        "dpi" => SettingField::DpiScale,
        "jitter" => SettingField::Jitter,
        "scroll" => SettingField::ScrollAmount,
        "random" => {
            return match value.to_lowercase().as_str() {
                "on" | "true" | "yes" => Ok(AppCommand::SetRandomize(true)),
                "off" | "false" | "no" => Ok(AppCommand::SetRandomize(false)),
                _ => Err(AppError::InvalidCommand {
                    reason: format!("random expects on or off, got '{}'", value),
                    location: ErrorLocation::from(Location::caller()),
                }),
            };
        }
        other => {
            return Err(AppError::InvalidCommand {
                reason: format!("unknown setting '{}'", other),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    Ok(AppCommand::Set {
        field,
        value: value.to_string(),
    })
}

/// Spawns the stdin reader.
///
/// End of input is treated as a quit request. The task also ends once the
/// controller inbox is closed.
pub(crate) fn spawn_reader(command_tx: mpsc::Sender<AppCommand>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();

        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    error!(error = ?e, "Failed to read console input");
                    break;
                }
            };

            match parse_command(&line) {
                Ok(Some(command)) => {
                    debug!(command = ?command, "Console command");
                    if command_tx.blocking_send(command).is_err() {
                        return;
                    }
                }
                Ok(None) => prompt(),
                Err(AppError::InvalidCommand { reason, .. }) => {
                    say(&reason);
                    prompt();
                }
                Err(e) => warn!(error = %e, "Console parse error"),
            }
        }

        info!("Console input closed");
        let _ = command_tx.blocking_send(AppCommand::Shutdown);
    })
}

/// Prints a line for the user.
pub(crate) fn say(message: &str) {
    println!("{}", message);
}

/// Prints the input prompt.
pub(crate) fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

pub(crate) fn print_help() {
    say(HELP);
}

pub(crate) fn print_sequence(sequence: &ActionSequence) {
    if sequence.is_empty() {
        say("no actions recorded");
        return;
    }
    for (index, action) in sequence.iter().enumerate() {
        say(&format!("{:>3}. {}", index + 1, action));
    }
}

pub(crate) fn print_status(
    state: RunState,
    capturing: bool,
    actions: usize,
    display_scale: Option<f64>,
    settings: &RunSettings,
    binding: &HotkeyBinding,
) {
    say(&format!(
        "state: {:?}{}, {} action(s)",
        state,
        if capturing { " (capturing)" } else { "" },
        actions
    ));
    match display_scale {
        Some(factor) => say(&format!("display scale {}", factor)),
        None => say("display scale unknown"),
    }
    say(&format!(
        "wait {}s, reps {}, dpi {}, random {}, jitter {}s, scroll {}",
        settings.wait_seconds,
        settings.repetitions,
        settings.dpi_scale,
        if settings.randomize_delay { "on" } else { "off" },
        settings.jitter_range,
        settings.scroll_amount
    ));
    say(&format!(
        "hotkeys: start {}, stop {}",
        binding.start_key, binding.stop_key
    ));
}

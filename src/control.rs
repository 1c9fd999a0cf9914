//! Line-oriented command surface: one command per input line, one reply per
//! command on the output.

use crate::constants::{APP_NAME, APP_VERSION};
use crate::error::AppError;
use crate::models::StatusResponse;
use crate::mover::{StartOutcome, StopOutcome, Supervisor};
use log::{error, info};
use std::io::{BufRead, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Start,
    Stop,
    Status,
    Quit,
    About,
    Help,
}

impl FromStr for ControlCommand {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(ControlCommand::Start),
            "stop" => Ok(ControlCommand::Stop),
            "status" => Ok(ControlCommand::Status),
            "quit" | "exit" => Ok(ControlCommand::Quit),
            "about" => Ok(ControlCommand::About),
            "help" | "?" => Ok(ControlCommand::Help),
            other => Err(AppError::InvalidInput {
                field: "command",
                reason: format!("unknown command '{other}', try 'help'"),
            }),
        }
    }
}

/// Whether the control loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

const HELP: &str = "commands: start, stop, status, quit, about, help";

pub fn dispatch(
    supervisor: &Supervisor,
    command: ControlCommand,
    out: &mut impl Write,
) -> Result<Flow, AppError> {
    match command {
        ControlCommand::Start => {
            info!("Starting the app");
            match supervisor.start() {
                Ok(StartOutcome::Started) => writeln!(out, "started")?,
                Ok(StartOutcome::AlreadyRunning) => writeln!(out, "already running")?,
                Err(e) => {
                    error!("Failed to start: {e}");
                    writeln!(out, "error: {e}")?;
                }
            }
        }
        ControlCommand::Stop => {
            info!("Stopping the app");
            match supervisor.stop() {
                StopOutcome::Stopped => writeln!(out, "stopped")?,
                StopOutcome::NotRunning => writeln!(out, "not running")?,
            }
        }
        ControlCommand::Status => {
            let status = StatusResponse::from(&supervisor.snapshot());
            writeln!(out, "{}", serde_json::to_string(&status)?)?;
        }
        ControlCommand::Quit => {
            supervisor.quit();
            writeln!(out, "bye")?;
            return Ok(Flow::Exit);
        }
        ControlCommand::About => {
            writeln!(
                out,
                "{APP_NAME} v{APP_VERSION}: moves the pointer a pixel while you are idle"
            )?;
        }
        ControlCommand::Help => writeln!(out, "{HELP}")?,
    }
    Ok(Flow::Continue)
}

/// Read commands until `quit` or end of input. End of input also quits.
pub fn run(supervisor: &Supervisor, input: impl BufRead, mut out: impl Write) -> Result<(), AppError> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let flow = match line.parse::<ControlCommand>() {
            Ok(command) => dispatch(supervisor, command, &mut out)?,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                Flow::Continue
            }
        };
        out.flush()?;
        if flow == Flow::Exit {
            return Ok(());
        }
    }

    supervisor.quit();
    Ok(())
}

use std::io::{BufRead, Write};

use tracing::{debug, error};

use super::Dashboard;
use crate::system::{EndpointDirectory, EndpointSwitcher, FileSystemInterface};

const HELP: &str = "Commands:
  <n> | s <n>   switch to device <n> now
  t <n>         add/remove device <n> from the cycle
  w             save the cycle list
  r             refresh the device list
  h             show this help
  q             quit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Switch(usize),
    Toggle(usize),
    Save,
    Refresh,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?;
    let index = |arg: Option<&str>| arg?.parse::<usize>().ok();

    let command = match head {
        "s" | "switch" => Command::Switch(index(parts.next())?),
        "t" | "toggle" => Command::Toggle(index(parts.next())?),
        "w" | "save" => Command::Save,
        "r" | "refresh" => Command::Refresh,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => Command::Switch(other.parse().ok()?),
    };

    match parts.next() {
        Some(_) => None,
        None => Some(command),
    }
}

// Rows are numbered from 1 on screen
fn row_id<A, F>(dashboard: &Dashboard<'_, A, F>, n: usize) -> Option<String>
where
    A: EndpointDirectory + EndpointSwitcher,
    F: FileSystemInterface,
{
    n.checked_sub(1)
        .and_then(|i| dashboard.rows().get(i))
        .map(|row| row.device.id.clone())
}

fn render<A, F, W>(dashboard: &Dashboard<'_, A, F>, out: &mut W) -> std::io::Result<()>
where
    A: EndpointDirectory + EndpointSwitcher,
    F: FileSystemInterface,
    W: Write,
{
    writeln!(out, "--- Audio Devices ---")?;
    if dashboard.rows().is_empty() {
        writeln!(out, "  No active audio devices found")?;
    }
    for (i, row) in dashboard.rows().iter().enumerate() {
        writeln!(
            out,
            "{:>3}. [{}] {} {}",
            i + 1,
            if row.in_cycle { "x" } else { " " },
            if row.is_default { "*" } else { " " },
            row.device.name
        )?;
    }
    writeln!(out, "[x] = in cycle, * = current default. Type h for help.")
}

/// Line-oriented front end for [`Dashboard`].
///
/// Switch and save failures are shown as notices and the session goes on.
/// Only I/O errors on `input`/`output` end it early.
pub fn run_console<A, F, R, W>(
    dashboard: &mut Dashboard<'_, A, F>,
    mut input: R,
    mut output: W,
) -> std::io::Result<()>
where
    A: EndpointDirectory + EndpointSwitcher,
    F: FileSystemInterface,
    R: BufRead,
    W: Write,
{
    render(dashboard, &mut output)?;

    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some(command) = parse_command(trimmed) else {
            writeln!(output, "Unknown command '{}'. Type h for help.", trimmed)?;
            continue;
        };
        debug!("Dashboard command: {:?}", command);

        match command {
            Command::Quit => return Ok(()),
            Command::Help => writeln!(output, "{}", HELP)?,
            Command::Switch(n) => match row_id(dashboard, n) {
                Some(id) => match dashboard.switch_to(&id) {
                    Ok(()) => render(dashboard, &mut output)?,
                    Err(e) => {
                        error!("Switch failed: {}", e);
                        writeln!(output, "Failed to switch: {}", e)?;
                        render(dashboard, &mut output)?;
                    }
                },
                None => writeln!(output, "No device {}", n)?,
            },
            Command::Toggle(n) => match row_id(dashboard, n) {
                Some(id) => {
                    let in_cycle = dashboard
                        .rows()
                        .iter()
                        .any(|row| row.device.id == id && row.in_cycle);
                    dashboard.set_in_cycle(&id, !in_cycle);
                    render(dashboard, &mut output)?;
                }
                None => writeln!(output, "No device {}", n)?,
            },
            Command::Save => match dashboard.save_allow_list() {
                Ok(()) => writeln!(output, "Configuration saved successfully!")?,
                Err(e) => writeln!(output, "Failed to save config: {}", e)?,
            },
            Command::Refresh => match dashboard.reload() {
                Ok(()) => render(dashboard, &mut output)?,
                Err(e) => writeln!(output, "Failed to load audio devices: {}", e)?,
            },
        }
    }
}

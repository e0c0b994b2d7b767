//! Special commands parser for interactive chat mode
//!
//! This module parses special commands that can be entered during an
//! interactive chat with the captain. Special commands allow users to:
//! - List the ships generated so far
//! - Inspect or save a single ship
//! - View the session status
//! - Display help information
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive. Directory
//! arguments keep their original case.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands read the session state rather than being sent to the
/// captain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Show the gallery as a table, newest first
    Gallery,

    /// Show details for the ship at a 1-based gallery position
    View(usize),

    /// Write the ship image at a 1-based gallery position to disk
    ///
    /// Without a directory the configured gallery directory is used.
    Save { index: usize, dir: Option<PathBuf> },

    /// Display status, provider and counts
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the captain.
    None,
}

/// Parse a user input string into a special command
///
/// # Arguments
///
/// * `input` - The user input string to parse
///
/// # Returns
///
/// Returns Ok(SpecialCommand) for valid commands or SpecialCommand::None for non-commands.
///
/// # Errors
///
/// Returns CommandError::UnknownCommand if input starts with "/" but is not a valid command.
/// Returns CommandError::UnsupportedArgument if a command receives an invalid argument.
/// Returns CommandError::MissingArgument if a command requires an argument but none was provided.
///
/// # Examples
///
/// ```
/// use cruisesim::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/gallery").unwrap(), SpecialCommand::Gallery);
/// assert_eq!(parse_special_command("/VIEW 2").unwrap(), SpecialCommand::View(2));
/// assert_eq!(
///     parse_special_command("build a ship").unwrap(),
///     SpecialCommand::None
/// );
/// assert!(parse_special_command("/anchor").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or_default().to_lowercase();
    let args: Vec<&str> = parts.collect();

    match command.as_str() {
        "exit" | "quit" | "/exit" | "/quit" => no_args(&command, &args, SpecialCommand::Exit),
        "/help" | "/?" => no_args(&command, &args, SpecialCommand::Help),
        "/status" => no_args(&command, &args, SpecialCommand::ShowStatus),
        "/gallery" | "/ships" => no_args(&command, &args, SpecialCommand::Gallery),
        "/view" => match args.as_slice() {
            [] => Err(CommandError::MissingArgument {
                command: "/view".to_string(),
                usage: "/view <number>".to_string(),
            }),
            [index] => Ok(SpecialCommand::View(parse_index("/view", index)?)),
            _ => Err(CommandError::UnsupportedArgument {
                command: "/view".to_string(),
                arg: args[1..].join(" "),
            }),
        },
        "/save" => match args.as_slice() {
            [] => Err(CommandError::MissingArgument {
                command: "/save".to_string(),
                usage: "/save <number> [directory]".to_string(),
            }),
            [index] => Ok(SpecialCommand::Save {
                index: parse_index("/save", index)?,
                dir: None,
            }),
            [index, rest @ ..] => Ok(SpecialCommand::Save {
                index: parse_index("/save", index)?,
                dir: Some(PathBuf::from(rest.join(" "))),
            }),
        },
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

fn no_args(
    command: &str,
    args: &[&str],
    parsed: SpecialCommand,
) -> Result<SpecialCommand, CommandError> {
    if args.is_empty() {
        Ok(parsed)
    } else {
        Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: args.join(" "),
        })
    }
}

/// Gallery positions are 1-based
fn parse_index(command: &str, arg: &str) -> Result<usize, CommandError> {
    match arg.parse::<usize>() {
        Ok(index) if index > 0 => Ok(index),
        _ => Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        }),
    }
}

/// Display help information for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for the Captain's Bridge
=========================================

GALLERY:
  /gallery            - List generated ships, newest first
  /ships              - Same as /gallery
  /view <n>           - Show details for ship number n
  /save <n> [dir]     - Save ship number n as an image file

SESSION INFORMATION:
  /status             - Show generation status and session counts
  /help               - Show this help message
  /?                  - Same as /help

SESSION CONTROL:
  /exit or exit       - Leave the bridge
  /quit or quit       - Same as exit

NOTES:
  - Commands are case-insensitive
  - Regular text (not starting with /) is sent to the captain
  - Ask to "build", "create", "show" or "draw" a ship to get a render
  - Mention "real life" or "realistic" for photographic renders
"#
    );
}

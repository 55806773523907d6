//! REPL command parsing

use crate::error::{CliError, Result};
use std::path::PathBuf;

/// One line of input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Toggle,
    Next,
    Prev,
    Seek(f64),
    Volume(u8),
    Mute,
    Shuffle,
    Repeat,
    Rate(f64),
    Add(Vec<PathBuf>),
    Select(usize),
    Tick(f64),
    Status,
    List,
    Save,
    Help,
    Quit,
}

impl Command {
    /// Parse a line; blank lines and `#` comments yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let words = split_words(line)?;
        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "play" => Self::Play,
            "pause" => Self::Pause,
            "toggle" => Self::Toggle,
            "next" | "n" => Self::Next,
            "prev" | "previous" | "p" => Self::Prev,
            "seek" => Self::Seek(number("seek", &args)?),
            "volume" | "vol" => {
                let level: u8 = number("volume", &args)?;
                if level > 100 {
                    return Err(CliError::invalid("volume", "expected 0-100"));
                }
                Self::Volume(level)
            }
            "mute" => Self::Mute,
            "shuffle" => Self::Shuffle,
            "repeat" => Self::Repeat,
            "rate" => Self::Rate(number("rate", &args)?),
            "add" => {
                if args.is_empty() {
                    return Err(CliError::invalid("add", "expected at least one file"));
                }
                Self::Add(args.iter().map(PathBuf::from).collect())
            }
            "select" => Self::Select(number("select", &args)?),
            "tick" => {
                let seconds: f64 = number("tick", &args)?;
                if !seconds.is_finite() || seconds < 0.0 {
                    return Err(CliError::invalid("tick", "expected a non-negative duration"));
                }
                Self::Tick(seconds)
            }
            "status" | "s" => Self::Status,
            "list" | "ls" => Self::List,
            "save" => Self::Save,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(CliError::UnknownCommand(name.clone())),
        };

        Ok(Some(command))
    }
}

/// Usage text for `help`
pub const HELP: &str = "\
commands:
  play | pause | toggle      start, stop or flip playback
  next | prev                skip forward or back
  seek <seconds>             jump within the current track
  volume <0-100> | mute      set level or toggle mute
  shuffle | repeat           toggle shuffle, cycle repeat mode
  rate <0.5-2>               playback speed
  add <file>...              append audio files
  select <index>             load a track without playing it
  tick <seconds>             advance the clock
  status | list | save       show state, show playlist, save playlist
  quit                       persist and exit";

/// Split on whitespace; double quotes group words (`add "My Song.mp3"`)
fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err(CliError::invalid("input", "unterminated quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn number<T: std::str::FromStr>(command: &str, args: &[&str]) -> Result<T> {
    match args {
        [value] => value
            .parse()
            .map_err(|_| CliError::invalid(command, format!("not a number: {value}"))),
        [] => Err(CliError::invalid(command, "missing argument")),
        _ => Err(CliError::invalid(command, "expected one argument")),
    }
}

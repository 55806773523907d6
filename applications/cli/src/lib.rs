//! Aria headless player
//!
//! Runs a player session from a terminal: commands come in on stdin, the
//! clock is advanced with `tick`, and state persists to a data directory
//! between runs.

pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod records;
pub mod renderer;

pub use app::{run, App, Flow};
pub use command::Command;
pub use config::CliConfig;
pub use error::{CliError, Result};
pub use renderer::TerminalRenderer;

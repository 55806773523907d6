/// Aria - headless player
use aria_cli::{records, run, App, CliConfig, TerminalRenderer};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "aria")]
#[command(about = "Aria headless audio player", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./aria.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for persisted state
    #[arg(long, env = "ARIA_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read player commands from stdin (default)
    Run,
    /// Print the stored playlist and playback state
    Show,
    /// Delete the stored playlist and playback state
    Clear,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout carries the player output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aria_cli=info,aria_session=info,aria_storage=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    config.validate()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let app = App::open(&config, Box::new(TerminalRenderer::new(io::stdout())))?;
            tracing::info!(outcome = ?app.restore_outcome(), "session restored");
            run(app, io::stdin().lock(), &mut io::stdout())?;
        }
        Commands::Show => records::show(&config, &mut io::stdout())?,
        Commands::Clear => records::clear(&config)?,
    }

    Ok(())
}

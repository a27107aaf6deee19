use std::path::{Path, PathBuf};

mod export;
mod extract;
mod input;
mod summary;
mod terminal;

use backlog::Config;
use clap::ArgAction;
use export::Export;
use extract::Extract;
use summary::Summary;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file
    ///
    /// A missing file is not an error; the built-in aliases and keywords are
    /// used instead.
    #[arg(short, long, default_value = "backlog.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = load_config(&self.config);
        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout carries the extracted tables
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn load_config(path: &Path) -> Config {
    if path.exists() {
        tracing::info!("Using configuration from {}", path.display());
    }
    Config::load_or_default(path)
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Print the stories or acceptance criteria found in the documents
    Extract(Extract),

    /// Show headline counts for the documents
    Summary(Summary),

    /// Write the stories and acceptance criteria tables to files
    ///
    /// Two files are written to the output directory: `stories` and
    /// `acceptance_criteria`, with the extension of the chosen format.
    Export(Export),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Extract(command) => command.run(config)?,
            Self::Summary(command) => command.run(config)?,
            Self::Export(command) => command.run(config)?,
        }
        Ok(())
    }
}

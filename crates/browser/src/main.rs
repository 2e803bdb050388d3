//! Creag - a minimal tabbed browser shell.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use browser::{AppConfig, Command, Flow, Shell};

/// Creag - a minimal tabbed browser shell
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address or search text to open after start-up
    url: Option<String>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// History file
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Home page
    #[arg(long)]
    home: Option<String>,

    /// Directory holding `public/` and `prismjs/`
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Configuration file contents with command-line overrides applied.
    fn config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => AppConfig::default(),
        };

        if let Some(home) = &self.home {
            config = config.with_home_url(home);
        }
        if let Some(path) = &self.history_file {
            config = config.with_history_file(path);
        }
        if let Some(path) = &self.assets {
            config = config.with_asset_root(path);
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Creag v{}", browser::VERSION);

    let context = args.config()?.into_context()?;
    let (mut shell, mut events) = Shell::new(context);
    let mut out = std::io::stdout();

    if let Some(url) = args.url {
        shell.execute(Command::Go(url), &mut out)?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            biased;

            Some(message) = events.recv() => shell.handle_engine_message(message),
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if shell.run_line(&line, &mut out)? == Flow::Quit {
                    break;
                }
            }
        }
    }

    info!("Browser shutdown complete");

    Ok(())
}

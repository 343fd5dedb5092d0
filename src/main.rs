//! EyesOff - rest your eyes with the 20-20-20 rule
//!
//! Every 20 minutes, look at something 20 feet away for 20 seconds.
//! EyesOff sits in the macOS menu bar and reminds you when it is time.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use eyesoff::app;
use eyesoff::cli::{Cli, Commands, Display};
use eyesoff::launchagent;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Run(args)) => app::run(args).await?,
        None => app::run(Default::default()).await?,
        Some(Commands::Sounds) => app::list_sounds()?,
        Some(Commands::Install) => {
            launchagent::install(&[]).context("failed to install login item")?;
            Display::show_install_success();
        }
        Some(Commands::Uninstall) => {
            launchagent::uninstall().context("failed to remove login item")?;
            Display::show_uninstall_success();
        }
        Some(Commands::About) => Display::show_about(),
        Some(Commands::Completions { shell }) => generate_completions(shell),
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

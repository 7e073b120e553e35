mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fwgate_core::Syncer;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;
use crate::output::Progress;

// Every step waits on the previous one; a single thread is all it needs.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes. The report goes
    // to stdout so it is the last thing printed after the progress lines.
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        println!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { global, command } = cli;

    match command.unwrap_or(Command::Apply) {
        // Config commands don't need a token
        Command::Config(args) => commands::config_cmd::handle(&args, &global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "fwgate", &mut std::io::stdout());
            Ok(())
        }

        Command::Apply => {
            let syncer = build_syncer(&global)?;
            let progress = Progress::new(global.quiet, output::should_color(&global.color));
            commands::apply::handle(&syncer, progress).await
        }

        Command::Plan => {
            let syncer = build_syncer(&global)?;
            let color = output::should_color(&global.color);
            commands::plan::handle(&syncer, &global, color).await
        }
    }
}

/// Load config, apply flag overrides, resolve the token, build the client.
fn build_syncer(global: &GlobalOpts) -> Result<Syncer, CliError> {
    let cfg = config::load(global)?;
    let sync_config = config::build_sync_config(&cfg, global)?;
    tracing::debug!(
        firewall = %sync_config.firewall_label,
        api_url = %sync_config.api_url,
        "starting sync"
    );
    Ok(Syncer::new(sync_config)?)
}

//! Stencil CLI entry point.

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stencil_cli::commands::{run_check, run_list, run_render};
use stencil_cli::{Cli, Commands, ConfigOverrides, StencilConfig};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("stencil=debug,stencil_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = result_to_exit(dispatch_command(cli));
    std::process::exit(exit_code);
}

/// Load configuration and run the requested command.
fn dispatch_command(cli: Cli) -> anyhow::Result<()> {
    let overrides = ConfigOverrides {
        root: cli.command.root().cloned(),
        layout: cli.command.layout().cloned(),
    };
    let config = StencilConfig::load(cli.config.as_deref(), &overrides)?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Check { .. } => run_check(&config, &mut stdout),
        Commands::List {
            fragments, json, ..
        } => run_list(&config, fragments, json, &mut stdout),
        Commands::Render { data, output, .. } => {
            run_render(&config, data.as_deref(), output.as_deref(), &mut stdout)
        }
    }
}

/// Convert a result to an exit code, printing any error.
fn result_to_exit(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

//! CLI definition for the stencil command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Stencil - layered liquid layouts
///
/// Builds every layout under `<root>/layouts` and renders them by name.
#[derive(Parser, Debug)]
#[command(name = "stencil")]
#[command(version)]
#[command(about = "Check, list and render layered liquid layouts")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file (TOML, YAML or JSON); defaults to ./stencil.toml
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build every layout and report problems
    Check {
        /// Template tree root containing `layouts/`
        #[arg(short, long, value_name = "DIR")]
        root: Option<PathBuf>,
    },
    /// List layout names
    List {
        /// Template tree root containing `layouts/`
        #[arg(short, long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Also list each layout's fragments
        #[arg(short, long)]
        fragments: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a layout
    Render {
        /// Template tree root containing `layouts/`
        #[arg(short, long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Layout to render; the defaults layout when omitted
        #[arg(short, long, value_name = "NAME")]
        layout: Option<String>,
        /// Render data (JSON or YAML, by extension)
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,
        /// Write output here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

impl Commands {
    /// The `--root` flag of whichever command was given.
    pub fn root(&self) -> Option<&PathBuf> {
        match self {
            Commands::Check { root }
            | Commands::List { root, .. }
            | Commands::Render { root, .. } => root.as_ref(),
        }
    }

    /// The `--layout` flag, for commands that take one.
    pub fn layout(&self) -> Option<&String> {
        match self {
            Commands::Render { layout, .. } => layout.as_ref(),
            _ => None,
        }
    }
}

//! Stencil command-line interface.
//!
//! Commands:
//! - `stencil check`: build every layout and report problems
//! - `stencil list [--fragments] [--json]`: list layouts
//! - `stencil render [--layout NAME] [--data FILE] [--output FILE]`: render a layout
//!
//! Every command takes `--root DIR`; configuration comes from `stencil.toml`
//! (or `--config FILE`) and `STENCIL_` environment variables.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Commands};
pub use config::{ConfigError, ConfigOverrides, StencilConfig};

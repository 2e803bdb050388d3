//! Creag - a minimal tabbed browser shell.
//!
//! This crate wires the UI shell to a command loop:
//! - JSON configuration
//! - Line commands read from standard input
//! - A shell that routes commands and engine events to one window

pub mod commands;
pub mod config;
pub mod shell;

pub use commands::Command;
pub use config::AppConfig;
pub use shell::{Flow, Shell};

/// Browser version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

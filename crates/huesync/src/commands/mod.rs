//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod list;
pub mod path;
pub mod sync;

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Dispatch the parsed command to its handler.
pub async fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Sync => sync::handle(&cli.global).await,
        Command::List => list::handle(&cli.global),
        Command::Path => path::handle(&cli.global),
    }
}

/// Resolve the registry file: `--registry` / `HUESYNC_REGISTRY` when
/// given, otherwise the platform config directory.
pub fn registry_path(global: &crate::cli::GlobalOpts) -> PathBuf {
    if let Some(path) = &global.registry {
        return path.clone();
    }
    ProjectDirs::from("com", "huesync", "huesync").map_or_else(
        || {
            let mut p =
                PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("huesync");
            p.push("bridges.json");
            p
        },
        |dirs| dirs.config_dir().join("bridges.json"),
    )
}

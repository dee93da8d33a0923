//! `path` -- print the registry file location.

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    println!("{}", super::registry_path(global).display());
    Ok(())
}

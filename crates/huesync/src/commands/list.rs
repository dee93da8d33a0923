//! `list` -- show the persisted registry without touching the network.

use huesync_core::{DeviceType, Registry};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let path = super::registry_path(global);
    let registry = Registry::load(&path)?;

    let device_type = match &global.device_name {
        Some(device) => DeviceType::new(&global.app_name, device),
        None => DeviceType::from_host(&global.app_name),
    };

    let rows = output::registry_rows(&registry, &device_type);
    output::print_output(&output::render(&global.output, &rows), global.quiet);
    Ok(())
}

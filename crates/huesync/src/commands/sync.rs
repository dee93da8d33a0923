//! `sync` -- reconcile the registry with bridges on the network.

use std::time::Duration;

use tracing::debug;

use huesync_api::{NupnpDiscovery, RestBridge, TransportConfig, TypedBridge};
use huesync_core::{DeviceType, Reconciler, RegistryStore, ResolvedSet};

use crate::cli::{GlobalOpts, Transport};
use crate::error::CliError;
use crate::output;
use crate::prompt::ConsolePrompter;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let path = super::registry_path(global);
    let store = RegistryStore::new(&path);

    let device_type = match &global.device_name {
        Some(device) => DeviceType::new(&global.app_name, device),
        None => DeviceType::from_host(&global.app_name),
    };
    debug!(
        registry = %path.display(),
        device_type = device_type.as_str(),
        "starting reconciliation"
    );

    let transport = TransportConfig::new(Duration::from_secs(global.timeout));
    let discovery = NupnpDiscovery::new(&transport).map_err(CliError::from_api)?;

    // The bridge realization is a type parameter of the engine, so each
    // choice gets its own monomorphized run.
    let resolved = match global.transport {
        Transport::Rest => {
            let bridge = RestBridge::new(&transport).map_err(CliError::from_api)?;
            Reconciler::new(store, device_type, discovery, bridge, ConsolePrompter)
                .reconcile()
                .await?
        }
        Transport::Typed => {
            let bridge = TypedBridge::new(&transport).map_err(CliError::from_api)?;
            Reconciler::new(store, device_type, discovery, bridge, ConsolePrompter)
                .reconcile()
                .await?
        }
    };

    render(&resolved, global);
    Ok(())
}

fn render(resolved: &ResolvedSet, global: &GlobalOpts) {
    let rows = output::resolved_rows(resolved);
    output::print_output(&output::render(&global.output, &rows), global.quiet);
    output::print_summary(resolved, global.quiet);
}

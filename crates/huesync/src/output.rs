//! Output formatting: table, JSON, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! JSON uses serde, plain emits one serial per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use huesync_core::{DeviceType, Registry, ResolvedSet};

use crate::cli::OutputFormat;

/// One row per bridge, shared by `sync` and `list` views.
#[derive(Debug, Serialize, Tabled)]
pub struct BridgeRow {
    #[tabled(rename = "SERIAL")]
    pub serial: String,
    #[tabled(rename = "ADDRESS")]
    pub address: String,
    #[tabled(rename = "USERNAME")]
    pub username: String,
    #[tabled(rename = "STATUS")]
    pub status: String,
}

/// Rows for a reconciliation result, sorted by serial.
pub fn resolved_rows(resolved: &ResolvedSet) -> Vec<BridgeRow> {
    let mut serials: Vec<&String> = resolved.keys().collect();
    serials.sort();
    serials
        .into_iter()
        .map(|serial| {
            let addr = &resolved[serial];
            BridgeRow {
                serial: serial.clone(),
                address: or_dash(addr.base()),
                username: or_dash(addr.username().unwrap_or_default()),
                status: if addr.is_reachable() {
                    "authorized".into()
                } else {
                    "unreachable".into()
                },
            }
        })
        .collect()
}

/// Rows for the persisted registry, no network activity involved.
pub fn registry_rows(registry: &Registry, device_type: &DeviceType) -> Vec<BridgeRow> {
    registry
        .entries
        .iter()
        .map(|(serial, entry)| {
            let username = entry
                .whitelist
                .iter()
                .find(|(_, w)| w.name == device_type.as_str())
                .map(|(u, _)| u.clone());
            BridgeRow {
                serial: serial.clone(),
                address: or_dash(entry.ipaddress.as_deref().unwrap_or_default()),
                username: or_dash(username.as_deref().unwrap_or_default()),
                status: if username.is_some() {
                    "paired".into()
                } else {
                    "unpaired".into()
                },
            }
        })
        .collect()
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".into()
    } else {
        value.to_owned()
    }
}

/// Render rows in the chosen format.
pub fn render(format: &OutputFormat, rows: &[BridgeRow]) -> String {
    match format {
        OutputFormat::Table => Table::new(rows).with(Style::rounded()).to_string(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".into())
        }
        OutputFormat::Plain => rows
            .iter()
            .map(|r| r.serial.clone())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// One-line run summary on stderr, colored when interactive.
pub fn print_summary(resolved: &ResolvedSet, quiet: bool) {
    if quiet {
        return;
    }
    let authorized = resolved.values().filter(|a| a.is_reachable()).count();
    let unreachable = resolved.len() - authorized;
    if io::stderr().is_terminal() {
        eprintln!(
            "{} bridge(s) authorized, {} unreachable",
            authorized.green(),
            unreachable.red()
        );
    } else {
        eprintln!("{authorized} bridge(s) authorized, {unreachable} unreachable");
    }
}

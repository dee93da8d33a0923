// Device-type identifier
//
// The string a client registers under when pairing, and later uses to
// recognize its own credential among a bridge's whitelist. Wire format is
// `{app}#{device}` with protocol-mandated length limits: app component at
// most 20 characters, device component at most 19.

use std::fmt;

const APP_MAX_CHARS: usize = 20;
const DEVICE_MAX_CHARS: usize = 19;

/// The identifier this client registers under on a bridge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceType(String);

impl DeviceType {
    /// Build from an application name and a device name, truncating each
    /// component to its protocol limit.
    pub fn new(app_name: &str, device_name: &str) -> Self {
        let app: String = app_name.chars().take(APP_MAX_CHARS).collect();
        let device: String = device_name.chars().take(DEVICE_MAX_CHARS).collect();
        Self(format!("{app}#{device}"))
    }

    /// Build from an application name, defaulting the device component to
    /// the machine's hostname.
    pub fn from_host(app_name: &str) -> Self {
        let host = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "localhost".to_owned());
        Self::new(app_name, &host)
    }

    /// Wire form, e.g. `huesync#workstation`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

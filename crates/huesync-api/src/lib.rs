// huesync-api: async Rust client for the Hue bridge pairing and config API

pub mod address;
pub mod bridge;
pub mod discovery;
pub mod error;
pub mod prompt;
pub mod transport;
pub mod wire;

pub use address::BridgeAddress;
pub use bridge::{BridgeProtocol, RestBridge, TypedBridge, Validation};
pub use discovery::{Discovery, NupnpDiscovery};
pub use error::Error;
pub use prompt::Prompter;
pub use transport::TransportConfig;

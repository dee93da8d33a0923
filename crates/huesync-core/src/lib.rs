//! Registry reconciliation for Hue bridges.
//!
//! This crate owns the business logic of huesync:
//!
//! - **[`RegistryStore`]** — scoped acquisition over the persisted
//!   serial-number registry: [`RegistryStore::open`] loads and projects it
//!   into a per-device-type [`ResolvedSet`]; the returned
//!   [`RegistrySession`] merges and persists exactly once on release.
//!
//! - **[`Reconciler`]** — the engine that merges the persisted registry,
//!   live discovery, and the credential protocol into one consistent
//!   resolved set, driving the interactive pairing flow where a
//!   credential is missing or rejected.
//!
//! - **[`DeviceType`]** — the identifier this client registers under and
//!   later recognizes its own credential by.
//!
//! Protocol collaborators (discovery, bridge client, prompter) are
//! injected through the `huesync-api` traits.

pub mod device_type;
pub mod engine;
pub mod error;
pub mod registry;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use device_type::DeviceType;
pub use engine::Reconciler;
pub use error::CoreError;
pub use registry::{Registry, RegistryEntry, WhitelistEntry};
pub use store::{RegistrySession, RegistryStore, ResolvedSet};

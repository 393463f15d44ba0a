//! Vendor-neutral network configuration core.
//!
//! This crate owns the canonical object model and the orchestration
//! logic that sits between a caller and a device driver:
//!
//! - **Domain model** ([`model`]) — Canonical types (`Vlan`,
//!   `Interface`, `Lag`, `Vrf`, `Vxlan`) built from request payloads
//!   through fallible factories. Every non-identity field is optional
//!   so partial updates know exactly what was set.
//!
//! - **[`DeviceDriver`]** — The trait a platform driver implements,
//!   with an explicit [`Capabilities`] table consulted before
//!   dispatch. Drivers are constructed per device through a
//!   [`DriverRegistry`].
//!
//! - **[`DeviceService`]** — One CRUD policy applied uniformly to all
//!   resource families: capability gating, identity precedence,
//!   required-field checks, orchestration-layer defaults, existence
//!   pre-checks, and response shape enforcement.
//!
//! - **Validation helpers** ([`validate`], [`evpn`]) — Routing
//!   identifier checks (route targets, route distinguishers) and the
//!   RFC 7432 Ethernet segment identifier codec.
//!
//! - **[`Envelope`]** — The uniform response shape: request id, data,
//!   errors, and status.

pub mod device;
pub mod driver;
pub mod error;
pub mod evpn;
pub mod model;
pub mod payload;
pub mod response;
pub mod service;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use device::{resolve_device, Device, DeviceBackend, DeviceCredentials};
pub use driver::{
    Action, Capabilities, DeviceDriver, DriverError, DriverRegistry, DriverResponse,
    ResourceKind,
};
pub use error::Error;
pub use payload::Payload;
pub use response::Envelope;
pub use service::{DeviceService, Resource};

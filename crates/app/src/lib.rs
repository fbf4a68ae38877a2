//! # hausbridge-app
//!
//! Application layer — the device read loop, the entity bridge and the
//! **port definitions** (traits) they run against.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `DeviceChannel` — a device's outbound message queue and inbound command queue
//!   - `DeviceRegistry` — resolve a device identifier to its channel pair
//!   - `HostNotifier` — tell the host an entity changed
//! - Run one **read loop** per attached entity, translating device messages
//!   into entity state and surviving malformed input
//! - Provide the **entity bridge** (attach, detach, commands, properties) and
//!   the **entity platform** building bridges from configuration
//! - Provide **in-process infrastructure** that doesn't need IO: channel
//!   pairs, a registry, the host-ready signal and a state bus
//!
//! ## Dependency rule
//! Depends on `hausbridge-domain` only (plus `tokio` for tasks and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod bridge;
pub mod ports;
pub mod queue;
pub mod read_loop;
pub mod ready;
pub mod registry;
pub mod services;
pub mod state_bus;

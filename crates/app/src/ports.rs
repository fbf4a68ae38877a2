//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the bridge core and the outside world:
//! the device runtime behind each channel pair, the registry resolving
//! device identifiers, and the host rendering entities.

pub mod channel;
pub mod host;
pub mod registry;

pub use channel::DeviceChannel;
pub use host::HostNotifier;
pub use registry::DeviceRegistry;

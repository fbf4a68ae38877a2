//! # hausbridge-domain
//!
//! Pure domain model for bridging device channels to host entities.
//!
//! ## Responsibilities
//! - Foundational types: the fully-qualified device identifier, error conventions
//! - Define the **wire shapes** exchanged with devices (messages and commands)
//! - Define **entity state** as shown to the host (switches, sensors)
//! - Define the **translators** turning device messages into entity state
//! - Define the per-entity **platform configuration**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! Queues, registries and the host are expressed as traits in the `app`
//! crate (ports).

pub mod entity;
pub mod error;
pub mod id;
pub mod message;
pub mod platform;
pub mod translator;

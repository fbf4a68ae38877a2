//! # hausbridged — hausbridge daemon
//!
//! Composition root that starts the device runtime and bridges its devices
//! to entities.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise logging
//! - Start the device runtime and register its channel pairs
//! - Build one entity bridge per configured entity, injecting the registry
//! - Attach the bridges and signal that the host is ready
//! - Report every entity state change
//! - Handle graceful shutdown (SIGINT): detach bridges, stop devices
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use hausbridge_adapter_virtual::VirtualIntegration;
use hausbridge_app::ready::HostReady;
use hausbridge_app::registry::InMemoryRegistry;
use hausbridge_app::services::EntityPlatform;
use hausbridge_app::state_bus::StateBus;
use hausbridge_domain::entity::EntitySnapshot;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Devices
    let mut registry = InMemoryRegistry::new();
    let mut devices = config
        .virtual_devices
        .enabled
        .then(|| VirtualIntegration::new(config.sensor_interval(), config.channels.capacity))
        .transpose()?;
    if let Some(devices) = devices.as_mut() {
        devices.setup(&mut registry);
    }

    let entities = if config.entities.is_empty() {
        devices
            .as_ref()
            .map(VirtualIntegration::entity_configs)
            .unwrap_or_default()
    } else {
        config.entities
    };

    // Entities
    let bus = StateBus::new(config.channels.bus_capacity);
    let ready = HostReady::new();
    let reporter = tokio::spawn(report_changes(bus.subscribe()));

    let mut platform = EntityPlatform::new(registry, bus, ready.clone());
    let mut bridges = platform.setup_all(&entities);
    for bridge in &mut bridges {
        bridge.attach();
    }

    ready.fire();
    tracing::info!(entities = bridges.len(), "hausbridged running");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");

    for bridge in bridges {
        platform.remove(bridge).await;
    }
    if let Some(devices) = devices.as_mut() {
        devices.teardown().await;
    }
    reporter.abort();

    Ok(())
}

/// Log every entity state change as it reaches the host.
async fn report_changes(mut changes: broadcast::Receiver<EntitySnapshot>) {
    loop {
        match changes.recv().await {
            Ok(snapshot) => match serde_json::to_string(&snapshot) {
                Ok(json) => tracing::info!(
                    entity = %snapshot.display_name(),
                    state = %snapshot.state,
                    available = snapshot.available,
                    %json,
                    "entity updated"
                ),
                Err(err) => tracing::warn!(%err, "failed to serialize entity snapshot"),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "state reporter lagged behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

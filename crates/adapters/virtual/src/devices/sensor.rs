//! Virtual temperature sensor — publishes a drifting reading on an interval.

use std::time::Duration;

use hausbridge_app::queue::DeviceEndpoint;
use hausbridge_domain::id::DeviceFqid;
use hausbridge_domain::message::Message;
use hausbridge_domain::platform::{PlatformConfig, ValueType};

/// Number of ticks in one drift cycle.
const CYCLE: u32 = 20;

/// A simulated sensor oscillating around a base reading.
///
/// Sensors do not act on commands; any command received is logged and
/// dropped.
#[derive(Debug, Clone)]
pub struct VirtualSensor {
    fqid: DeviceFqid,
    name: String,
    unit: String,
    base: f64,
    interval: Duration,
}

impl VirtualSensor {
    #[must_use]
    pub fn new(
        fqid: DeviceFqid,
        name: impl Into<String>,
        unit: impl Into<String>,
        base: f64,
        interval: Duration,
    ) -> Self {
        Self {
            fqid,
            name: name.into(),
            unit: unit.into(),
            base,
            interval,
        }
    }

    #[must_use]
    pub fn fqid(&self) -> &DeviceFqid {
        &self.fqid
    }

    /// Entity configuration mirroring this sensor.
    #[must_use]
    pub fn entity_config(&self) -> PlatformConfig {
        PlatformConfig::sensor(self.fqid.clone(), Some(self.unit.clone()))
            .with_name(self.name.clone())
            .with_value_type(ValueType::Float)
    }

    /// Reading at `tick`: a triangle wave of ±1.0 around the base value,
    /// rounded to one decimal.
    #[must_use]
    pub fn reading(&self, tick: u32) -> f64 {
        let phase = tick % CYCLE;
        let half = CYCLE / 2;
        let step = if phase <= half { phase } else { CYCLE - phase };
        let offset = f64::from(step) / f64::from(half) * 2.0 - 1.0;
        ((self.base + offset) * 10.0).round() / 10.0
    }

    /// Publish a reading every interval until the bridge goes away.
    pub async fn run(self, mut endpoint: DeviceEndpoint) {
        let mut ticker = tokio::time::interval(self.interval.max(Duration::from_millis(1)));
        let mut tick: u32 = 0;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                command = endpoint.next_command() => {
                    let Some(command) = command else { break };
                    tracing::debug!(
                        device = %self.fqid,
                        state = %command.state,
                        "sensor ignores commands"
                    );
                    continue;
                }
            }

            let reading = self.reading(tick);
            tick = tick.wrapping_add(1);
            tracing::trace!(device = %self.fqid, reading, "virtual sensor reading");
            if endpoint.publish(Message::with_state(reading)).await.is_err() {
                break;
            }
        }

        tracing::debug!(device = %self.fqid, "virtual sensor stopped, bridge is gone");
    }
}

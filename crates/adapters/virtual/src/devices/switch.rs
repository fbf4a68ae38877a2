//! Virtual switch — echoes every `ON`/`OFF` command back as its new state.

use hausbridge_app::queue::DeviceEndpoint;
use hausbridge_domain::id::DeviceFqid;
use hausbridge_domain::message::{Message, OnOffState};
use hausbridge_domain::platform::PlatformConfig;

/// A simulated relay that confirms each command it receives.
#[derive(Debug, Clone)]
pub struct VirtualSwitch {
    fqid: DeviceFqid,
    name: String,
    initial: OnOffState,
}

impl VirtualSwitch {
    #[must_use]
    pub fn new(fqid: DeviceFqid, name: impl Into<String>) -> Self {
        Self {
            fqid,
            name: name.into(),
            initial: OnOffState::Off,
        }
    }

    #[must_use]
    pub fn fqid(&self) -> &DeviceFqid {
        &self.fqid
    }

    /// Entity configuration mirroring this switch.
    #[must_use]
    pub fn entity_config(&self) -> PlatformConfig {
        PlatformConfig::switch(self.fqid.clone()).with_name(self.name.clone())
    }

    /// Report the initial state, then confirm commands until the bridge
    /// goes away.
    pub async fn run(self, mut endpoint: DeviceEndpoint) {
        let mut state = self.initial;
        if endpoint.publish(Message::with_state(state.as_str())).await.is_err() {
            return;
        }

        while let Some(command) = endpoint.next_command().await {
            let Some(requested) = OnOffState::from_value(&command.state) else {
                tracing::warn!(
                    device = %self.fqid,
                    state = %command.state,
                    "ignoring unknown switch command"
                );
                continue;
            };
            if requested != state {
                tracing::debug!(
                    device = %self.fqid,
                    from = %state,
                    to = %requested,
                    "virtual switch flipped"
                );
            }
            state = requested;
            if endpoint.publish(Message::with_state(state.as_str())).await.is_err() {
                break;
            }
        }

        tracing::debug!(device = %self.fqid, "virtual switch stopped, bridge is gone");
    }
}

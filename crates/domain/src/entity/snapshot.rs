//! Point-in-time view of an entity, as handed to the host.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityKind, EntityState};
use crate::id::DeviceFqid;

/// UTC timestamp used for `last_updated`.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Everything the host needs to render one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Device this entity mirrors; doubles as the entity's unique id.
    pub fqid: DeviceFqid,
    /// Optional display name from configuration.
    pub name: Option<String>,
    pub state: EntityState,
    /// `false` once the device side of the channel has gone away.
    pub available: bool,
    /// When `state` was last replaced; `None` until the first message.
    pub last_updated: Option<Timestamp>,
}

impl EntitySnapshot {
    /// Snapshot of an entity that has not heard from its device yet.
    #[must_use]
    pub fn initial(fqid: DeviceFqid, name: Option<String>, state: EntityState) -> Self {
        Self {
            fqid,
            name,
            state,
            available: true,
            last_updated: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.state.kind()
    }

    /// Display name, falling back to the device identifier.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.fqid.as_str())
    }

    /// Replace the state after a successful translation.
    pub fn apply(&mut self, state: EntityState, at: Timestamp) {
        self.state = state;
        self.available = true;
        self.last_updated = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn switch_snapshot(name: Option<&str>) -> EntitySnapshot {
        EntitySnapshot::initial(
            DeviceFqid::new("node1.switch").unwrap(),
            name.map(str::to_string),
            EntityState::Switch { is_on: false },
        )
    }

    #[test]
    fn should_start_available_and_never_updated() {
        let snapshot = switch_snapshot(None);
        assert!(snapshot.available);
        assert!(snapshot.last_updated.is_none());
        assert_eq!(snapshot.kind(), EntityKind::Switch);
    }

    #[test]
    fn should_fall_back_to_fqid_for_display_name() {
        assert_eq!(switch_snapshot(None).display_name(), "node1.switch");
        assert_eq!(switch_snapshot(Some("Porch")).display_name(), "Porch");
    }

    #[test]
    fn should_restore_availability_when_applying_state() {
        let mut snapshot = switch_snapshot(None);
        snapshot.available = false;
        let at = now();
        snapshot.apply(EntityState::Switch { is_on: true }, at);
        assert!(snapshot.available);
        assert!(snapshot.state.is_on());
        assert_eq!(snapshot.last_updated, Some(at));
    }
}

use serde::{Deserialize, Serialize};

use crate::value_objects::{ParticipantName, Timestamp};

/// A named, currently-present chat user tracked by a liveness timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: ParticipantName,
    pub last_seen: Timestamp,
}

impl Participant {
    pub fn join(name: ParticipantName, at: Timestamp) -> Self {
        Self {
            name,
            last_seen: at,
        }
    }

    /// Refresh the liveness timestamp. Idempotent.
    pub fn touch(&mut self, at: Timestamp) {
        self.last_seen = at;
    }

    /// How long this participant has been silent as of `now`.
    pub fn idle_for(&self, now: Timestamp) -> chrono::Duration {
        now.signed_duration_since(self.last_seen)
    }
}

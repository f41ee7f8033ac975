//! Periodic eviction of silent participants.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use domain::{Message, MessageId, MessageText, Participant, ParticipantName};

use crate::{
    clock::Clock,
    error::ApplicationError,
    repository::{MessageRepository, ParticipantRepository},
};

pub struct PresenceSweeper {
    participants: Arc<dyn ParticipantRepository>,
    messages: Arc<dyn MessageRepository>,
    clock: Arc<dyn Clock>,
    stale_after: chrono::Duration,
}

impl PresenceSweeper {
    pub fn new(
        participants: Arc<dyn ParticipantRepository>,
        messages: Arc<dyn MessageRepository>,
        clock: Arc<dyn Clock>,
        stale_after: Duration,
    ) -> Self {
        Self {
            participants,
            messages,
            clock,
            stale_after: chrono::Duration::milliseconds(stale_after.as_millis() as i64),
        }
    }

    /// One staleness pass over a snapshot of the live participants.
    ///
    /// The staleness decision uses the timestamp read at snapshot time; a
    /// heartbeat landing between snapshot and eviction may still lose the
    /// race. Each eviction is an isolated unit of work: a failure is logged
    /// and the pass continues with the remaining participants.
    ///
    /// Returns the names that were evicted.
    pub async fn sweep(&self) -> Result<Vec<ParticipantName>, ApplicationError> {
        let snapshot = self.participants.list().await?;
        let now = self.clock.now();

        let mut evicted = Vec::new();
        for participant in snapshot {
            if participant.idle_for(now) <= self.stale_after {
                continue;
            }
            let name = participant.name.clone();
            match self.evict(participant).await {
                Ok(()) => {
                    tracing::info!(name = %name, "evicted stale participant");
                    evicted.push(name);
                }
                Err(err) => {
                    tracing::warn!(name = %name, error = %err, "eviction failed, continuing sweep");
                }
            }
        }
        Ok(evicted)
    }

    /// Remove one participant and announce the departure. The two writes
    /// are not atomic; a failed announcement leaves the participant gone
    /// with no leave message.
    async fn evict(&self, participant: Participant) -> Result<(), ApplicationError> {
        self.participants.delete(&participant.name).await?;

        let announcement = Message::status(
            MessageId::from(Uuid::new_v4()),
            participant.name,
            MessageText::new("left")?,
            crate::services::format_time(self.clock.now()),
        );
        self.messages.append(announcement).await?;
        Ok(())
    }

    /// Run the sweep on a fixed period until the task is aborted or the
    /// runtime shuts down.
    pub fn spawn(self: Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // first tick fires immediately; skip straight to the cadence
            interval.tick().await;
            loop {
                interval.tick().await;
                match self.sweep().await {
                    Ok(evicted) if !evicted.is_empty() => {
                        tracing::info!(count = evicted.len(), "sweep evicted participants");
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::error!(error = %err, "presence sweep failed");
                    }
                }
            }
        })
    }
}

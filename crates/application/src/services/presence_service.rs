use std::sync::Arc;

use uuid::Uuid;

use domain::{
    DomainError, Message, MessageId, MessageText, Participant, ParticipantName,
};

use crate::{
    clock::Clock,
    error::ApplicationError,
    repository::{MessageRepository, ParticipantRepository},
};

/// Display stamp placed on messages at creation. Not used for ordering.
pub(crate) fn format_time(at: domain::Timestamp) -> String {
    at.format("%H:%M:%S").to_string()
}

pub struct PresenceServiceDependencies {
    pub participants: Arc<dyn ParticipantRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub clock: Arc<dyn Clock>,
}

/// Owns participant identity and liveness: registration with unique names,
/// heartbeat renewal, and the join announcement.
pub struct PresenceService {
    deps: PresenceServiceDependencies,
}

impl PresenceService {
    pub fn new(deps: PresenceServiceDependencies) -> Self {
        Self { deps }
    }

    /// Register a participant. The participant insert and the join
    /// announcement are two separate writes; when the announcement fails
    /// the participant stays registered (no rollback).
    pub async fn register(&self, name: String) -> Result<(), ApplicationError> {
        let name = ParticipantName::parse(name)?;

        if self
            .deps
            .participants
            .find_by_name(name.as_str())
            .await?
            .is_some()
        {
            return Err(ApplicationError::Domain(DomainError::NameTaken));
        }

        let now = self.deps.clock.now();
        self.deps
            .participants
            .insert(Participant::join(name.clone(), now))
            .await
            .map_err(|err| match err {
                domain::RepositoryError::Conflict => {
                    ApplicationError::Domain(DomainError::NameTaken)
                }
                other => ApplicationError::Repository(other),
            })?;

        tracing::info!(name = %name, "participant registered");

        let announcement = Message::status(
            MessageId::from(Uuid::new_v4()),
            name.clone(),
            MessageText::new("joined")?,
            format_time(now),
        );
        if let Err(err) = self.deps.messages.append(announcement).await {
            tracing::warn!(name = %name, error = %err, "join announcement not stored");
        }

        Ok(())
    }

    /// All live participants, store-native order.
    pub async fn list(&self) -> Result<Vec<Participant>, ApplicationError> {
        Ok(self.deps.participants.list().await?)
    }

    /// Renew a participant's liveness timestamp.
    pub async fn heartbeat(&self, name: &str) -> Result<(), ApplicationError> {
        let now = self.deps.clock.now();
        let refreshed = self.deps.participants.touch(name, now).await?;
        if !refreshed {
            return Err(ApplicationError::Domain(DomainError::ParticipantNotFound));
        }
        Ok(())
    }
}

use async_trait::async_trait;
use domain::{Message, MessageId, Participant, ParticipantName, RepositoryError, Timestamp};

/// Store collaborator for the `participants` collection.
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Insert a new participant. `Conflict` when the name is already live.
    async fn insert(&self, participant: Participant) -> Result<(), RepositoryError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Participant>, RepositoryError>;
    /// Current snapshot, store-native order.
    async fn list(&self) -> Result<Vec<Participant>, RepositoryError>;
    /// Refresh `last_seen`; returns false when no such participant exists.
    async fn touch(&self, name: &str, at: Timestamp) -> Result<bool, RepositoryError>;
    /// Remove a participant. `NotFound` when already gone.
    async fn delete(&self, name: &ParticipantName) -> Result<(), RepositoryError>;
}

/// Store collaborator for the `messages` collection.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn append(&self, message: Message) -> Result<(), RepositoryError>;
    /// All messages in insertion order.
    async fn list(&self) -> Result<Vec<Message>, RepositoryError>;
    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, RepositoryError>;
    async fn delete(&self, id: MessageId) -> Result<(), RepositoryError>;
}

/// In-memory repositories (used by tests and as a storage-free fallback).
pub mod memory {
    use tokio::sync::RwLock;

    use super::*;

    #[derive(Default)]
    pub struct MemoryParticipantRepository {
        participants: RwLock<Vec<Participant>>,
    }

    impl MemoryParticipantRepository {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl ParticipantRepository for MemoryParticipantRepository {
        async fn insert(&self, participant: Participant) -> Result<(), RepositoryError> {
            let mut participants = self.participants.write().await;
            if participants.iter().any(|p| p.name == participant.name) {
                return Err(RepositoryError::Conflict);
            }
            participants.push(participant);
            Ok(())
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<Participant>, RepositoryError> {
            let participants = self.participants.read().await;
            Ok(participants.iter().find(|p| p.name == *name).cloned())
        }

        async fn list(&self) -> Result<Vec<Participant>, RepositoryError> {
            Ok(self.participants.read().await.clone())
        }

        async fn touch(&self, name: &str, at: Timestamp) -> Result<bool, RepositoryError> {
            let mut participants = self.participants.write().await;
            match participants.iter_mut().find(|p| p.name == *name) {
                Some(participant) => {
                    participant.touch(at);
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, name: &ParticipantName) -> Result<(), RepositoryError> {
            let mut participants = self.participants.write().await;
            let before = participants.len();
            participants.retain(|p| p.name != *name);
            if participants.len() == before {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct MemoryMessageRepository {
        messages: RwLock<Vec<Message>>,
    }

    impl MemoryMessageRepository {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl MessageRepository for MemoryMessageRepository {
        async fn append(&self, message: Message) -> Result<(), RepositoryError> {
            self.messages.write().await.push(message);
            Ok(())
        }

        async fn list(&self) -> Result<Vec<Message>, RepositoryError> {
            Ok(self.messages.read().await.clone())
        }

        async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, RepositoryError> {
            let messages = self.messages.read().await;
            Ok(messages.iter().find(|m| m.id == id).cloned())
        }

        async fn delete(&self, id: MessageId) -> Result<(), RepositoryError> {
            let mut messages = self.messages.write().await;
            let before = messages.len();
            messages.retain(|m| m.id != id);
            if messages.len() == before {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        }
    }
}

use std::sync::Arc;

use uuid::Uuid;

use domain::{
    visibility, DomainError, Message, MessageId, MessageKind, MessageText, Recipient,
};

use crate::{
    clock::Clock,
    error::ApplicationError,
    repository::{MessageRepository, ParticipantRepository},
    services::presence_service::format_time,
};

#[derive(Debug, Clone)]
pub struct PostMessageRequest {
    pub from: String,
    pub to: String,
    pub text: String,
    pub kind: String,
}

pub struct MessageServiceDependencies {
    pub participants: Arc<dyn ParticipantRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub clock: Arc<dyn Clock>,
}

/// Posting, per-viewer reads and author-restricted deletion of messages.
pub struct MessageService {
    deps: MessageServiceDependencies,
}

impl MessageService {
    pub fn new(deps: MessageServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn post(&self, request: PostMessageRequest) -> Result<(), ApplicationError> {
        let kind = MessageKind::parse_outgoing(&request.kind)?;
        let to = Recipient::parse(request.to)?;
        let text = MessageText::new(request.text)?;

        let from = self
            .deps
            .participants
            .find_by_name(&request.from)
            .await?
            .ok_or(DomainError::UnknownSender)?
            .name;

        let message = Message::new(
            MessageId::from(Uuid::new_v4()),
            from,
            to,
            text,
            kind,
            format_time(self.deps.clock.now()),
        );
        self.deps.messages.append(message).await?;
        Ok(())
    }

    /// Messages `viewer` may see, insertion order, optionally truncated to
    /// the first `limit` entries of the filtered sequence.
    pub async fn visible_to(
        &self,
        viewer: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, ApplicationError> {
        let all = self.deps.messages.list().await?;
        Ok(visibility::visible_messages(viewer, all, limit))
    }

    pub async fn delete(&self, id: Uuid, requester: &str) -> Result<(), ApplicationError> {
        let id = MessageId::from(id);
        let message = self
            .deps
            .messages
            .find_by_id(id)
            .await?
            .ok_or(DomainError::MessageNotFound)?;

        if message.from.as_str() != requester {
            return Err(ApplicationError::Domain(DomainError::NotMessageAuthor));
        }

        self.deps.messages.delete(id).await?;
        tracing::debug!(id = %id, requester, "message deleted");
        Ok(())
    }
}

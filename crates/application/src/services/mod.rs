mod message_service;
mod presence_service;

pub use message_service::{MessageService, MessageServiceDependencies, PostMessageRequest};
pub use presence_service::{PresenceService, PresenceServiceDependencies};

pub(crate) use presence_service::format_time;

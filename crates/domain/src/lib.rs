//! Core domain model for the room chat backend.
//!
//! Participants, messages and the per-viewer visibility rules, free of any
//! transport or persistence concern.

pub mod errors;
pub mod message;
pub mod participant;
pub mod value_objects;
pub mod visibility;

pub use errors::{DomainError, RepositoryError};
pub use message::{Message, MessageKind, Recipient};
pub use participant::Participant;
pub use value_objects::{MessageId, MessageText, ParticipantName, Timestamp};
pub use visibility::{is_visible_to, visible_messages};

//! Application layer.
//!
//! Use-case services around the domain model: presence registration and
//! liveness, message posting and per-viewer reads, and the periodic sweep
//! that evicts silent participants. Storage is reached only through the
//! repository traits defined here.

pub mod clock;
pub mod dto;
pub mod error;
pub mod repository;
pub mod services;
pub mod sweeper;


pub use clock::{Clock, SystemClock};
pub use dto::{MessageDto, ParticipantDto};
pub use error::ApplicationError;
pub use repository::{MessageRepository, ParticipantRepository};
pub use services::{
    MessageService, MessageServiceDependencies, PostMessageRequest, PresenceService,
    PresenceServiceDependencies,
};
pub use sweeper::PresenceSweeper;

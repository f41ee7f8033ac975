use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::DomainError;
use crate::value_objects::{MessageId, MessageText, ParticipantName};

/// Wire sentinel for messages addressed to the whole room.
pub const BROADCAST_SENTINEL: &str = "Todos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Message,
    PrivateMessage,
    Status,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Message => "message",
            MessageKind::PrivateMessage => "private_message",
            MessageKind::Status => "status",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "message" => Ok(MessageKind::Message),
            "private_message" => Ok(MessageKind::PrivateMessage),
            "status" => Ok(MessageKind::Status),
            other => Err(DomainError::validation(
                "type",
                format!("unknown message type: {other}"),
            )),
        }
    }

    /// Kinds a client may submit. `status` is reserved for the system.
    pub fn parse_outgoing(value: &str) -> Result<Self, DomainError> {
        match Self::parse(value)? {
            MessageKind::Status => Err(DomainError::validation(
                "type",
                "must be message or private_message",
            )),
            kind => Ok(kind),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MessageKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MessageKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        MessageKind::parse(&value).map_err(D::Error::custom)
    }
}

/// Destination of a message: the whole room or a single participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Everyone,
    Participant(ParticipantName),
}

impl Recipient {
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value == BROADCAST_SENTINEL {
            return Ok(Recipient::Everyone);
        }
        Ok(Recipient::Participant(ParticipantName::parse(value)?))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Recipient::Everyone => BROADCAST_SENTINEL,
            Recipient::Participant(name) => name.as_str(),
        }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Recipient {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Recipient {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Recipient::parse(value).map_err(D::Error::custom)
    }
}

/// A chat message. Immutable after creation; `time` is a display-only
/// `HH:MM:SS` stamp, insertion order is the authoritative ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub from: ParticipantName,
    pub to: Recipient,
    pub text: MessageText,
    pub kind: MessageKind,
    pub time: String,
}

impl Message {
    pub fn new(
        id: MessageId,
        from: ParticipantName,
        to: Recipient,
        text: MessageText,
        kind: MessageKind,
        time: String,
    ) -> Self {
        Self {
            id,
            from,
            to,
            text,
            kind,
            time,
        }
    }

    /// System-generated join/leave announcement, always broadcast.
    pub fn status(id: MessageId, from: ParticipantName, text: MessageText, time: String) -> Self {
        Self::new(
            id,
            from,
            Recipient::Everyone,
            text,
            MessageKind::Status,
            time,
        )
    }
}

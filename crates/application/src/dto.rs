use serde::Serialize;
use uuid::Uuid;

use domain::{Message, Participant};

/// Wire form of a participant: `lastStatus` carries epoch milliseconds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub name: String,
    pub last_status: i64,
}

impl From<&Participant> for ParticipantDto {
    fn from(participant: &Participant) -> Self {
        Self {
            name: participant.name.as_str().to_string(),
            last_status: participant.last_seen.timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageDto {
    pub id: Uuid,
    pub from: String,
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub time: String,
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.into(),
            from: message.from.as_str().to_string(),
            to: message.to.as_str().to_string(),
            text: message.text.as_str().to_string(),
            kind: message.kind.as_str().to_string(),
            time: message.time.clone(),
        }
    }
}

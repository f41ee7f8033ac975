use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

use application::repository::{MessageRepository, ParticipantRepository};
use domain::{
    Message, MessageId, MessageKind, MessageText, Participant, ParticipantName, Recipient,
    RepositoryError, Timestamp,
};

fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Conflict,
        _ => RepositoryError::storage(err.to_string()),
    }
}

fn invalid_data(message: impl Into<String>) -> RepositoryError {
    RepositoryError::storage(message)
}

#[derive(Debug, FromRow)]
struct ParticipantRecord {
    name: String,
    last_seen: DateTime<Utc>,
}

impl TryFrom<ParticipantRecord> for Participant {
    type Error = RepositoryError;

    fn try_from(value: ParticipantRecord) -> Result<Self, Self::Error> {
        let name =
            ParticipantName::parse(value.name).map_err(|err| invalid_data(err.to_string()))?;
        Ok(Participant {
            name,
            last_seen: value.last_seen,
        })
    }
}

#[derive(Debug, FromRow)]
struct MessageRecord {
    id: Uuid,
    sender: String,
    recipient: String,
    text: String,
    kind: String,
    time: String,
}

impl TryFrom<MessageRecord> for Message {
    type Error = RepositoryError;

    fn try_from(value: MessageRecord) -> Result<Self, Self::Error> {
        let from =
            ParticipantName::parse(value.sender).map_err(|err| invalid_data(err.to_string()))?;
        let to =
            Recipient::parse(value.recipient).map_err(|err| invalid_data(err.to_string()))?;
        let text = MessageText::new(value.text).map_err(|err| invalid_data(err.to_string()))?;
        let kind = MessageKind::parse(&value.kind).map_err(|err| invalid_data(err.to_string()))?;

        Ok(Message::new(
            MessageId::from(value.id),
            from,
            to,
            text,
            kind,
            value.time,
        ))
    }
}

#[derive(Clone)]
pub struct PgParticipantRepository {
    pool: PgPool,
}

impl PgParticipantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for PgParticipantRepository {
    async fn insert(&self, participant: Participant) -> Result<(), RepositoryError> {
        sqlx::query(r#"INSERT INTO participants (name, last_seen) VALUES ($1, $2)"#)
            .bind(participant.name.as_str())
            .bind(participant.last_seen)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Participant>, RepositoryError> {
        let record = sqlx::query_as::<_, ParticipantRecord>(
            r#"SELECT name, last_seen FROM participants WHERE name = $1"#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(Participant::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Participant>, RepositoryError> {
        let records = sqlx::query_as::<_, ParticipantRecord>(
            r#"SELECT name, last_seen FROM participants"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        records.into_iter().map(Participant::try_from).collect()
    }

    async fn touch(&self, name: &str, at: Timestamp) -> Result<bool, RepositoryError> {
        let result = sqlx::query(r#"UPDATE participants SET last_seen = $2 WHERE name = $1"#)
            .bind(name)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, name: &ParticipantName) -> Result<(), RepositoryError> {
        let result = sqlx::query(r#"DELETE FROM participants WHERE name = $1"#)
            .bind(name.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn append(&self, message: Message) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, sender, recipient, text, kind, time)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::from(message.id))
        .bind(message.from.as_str())
        .bind(message.to.as_str())
        .bind(message.text.as_str())
        .bind(message.kind.as_str())
        .bind(&message.time)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Message>, RepositoryError> {
        let records = sqlx::query_as::<_, MessageRecord>(
            r#"SELECT id, sender, recipient, text, kind, time FROM messages ORDER BY seq"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        records.into_iter().map(Message::try_from).collect()
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, RepositoryError> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r#"SELECT id, sender, recipient, text, kind, time FROM messages WHERE id = $1"#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(Message::try_from).transpose()
    }

    async fn delete(&self, id: MessageId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r#"DELETE FROM messages WHERE id = $1"#)
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

pub async fn create_pg_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_record_converts_back_to_the_domain_model() {
        let id = Uuid::new_v4();
        let record = MessageRecord {
            id,
            sender: "Ana".to_string(),
            recipient: "Todos".to_string(),
            text: "hi".to_string(),
            kind: "message".to_string(),
            time: "10:00:00".to_string(),
        };

        let message = Message::try_from(record).unwrap();
        assert_eq!(message.id, MessageId::from(id));
        assert_eq!(message.to, Recipient::Everyone);
        assert_eq!(message.kind, MessageKind::Message);
    }

    #[test]
    fn corrupt_records_surface_as_storage_errors() {
        let record = MessageRecord {
            id: Uuid::new_v4(),
            sender: "".to_string(),
            recipient: "Todos".to_string(),
            text: "hi".to_string(),
            kind: "message".to_string(),
            time: "10:00:00".to_string(),
        };
        assert!(matches!(
            Message::try_from(record),
            Err(RepositoryError::Storage { .. })
        ));

        let record = MessageRecord {
            id: Uuid::new_v4(),
            sender: "Ana".to_string(),
            recipient: "Todos".to_string(),
            text: "hi".to_string(),
            kind: "telegram".to_string(),
            time: "10:00:00".to_string(),
        };
        assert!(matches!(
            Message::try_from(record),
            Err(RepositoryError::Storage { .. })
        ));
    }
}

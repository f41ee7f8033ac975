use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;
use validator::Validate;

use application::{MessageDto, ParticipantDto, PostMessageRequest};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize, Validate)]
struct JoinPayload {
    #[validate(length(min = 1))]
    name: String,
}

#[derive(Debug, Deserialize, Validate)]
struct MessagePayload {
    #[validate(length(min = 1))]
    to: String,
    #[validate(length(min = 1))]
    text: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct MessagesQuery {
    limit: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/participants", post(register_participant).get(list_participants))
        .route("/messages", post(post_message).get(list_messages))
        .route("/messages/{id}", delete(delete_message))
        .route("/status", post(heartbeat))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The sender/viewer identity rides in a plain `user` header.
fn user_header(headers: &HeaderMap) -> &str {
    headers
        .get("user")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

async fn register_participant(
    State(state): State<AppState>,
    Json(payload): Json<JoinPayload>,
) -> Result<StatusCode, ApiError> {
    payload
        .validate()
        .map_err(|err| ApiError::unprocessable(err.to_string()))?;

    state.presence_service.register(payload.name).await?;
    Ok(StatusCode::CREATED)
}

async fn list_participants(
    State(state): State<AppState>,
) -> Result<Json<Vec<ParticipantDto>>, ApiError> {
    let participants = state.presence_service.list().await?;
    Ok(Json(participants.iter().map(ParticipantDto::from).collect()))
}

async fn post_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<MessagePayload>,
) -> Result<StatusCode, ApiError> {
    payload
        .validate()
        .map_err(|err| ApiError::unprocessable(err.to_string()))?;

    let from = user_header(&headers);
    if from.is_empty() {
        return Err(ApiError::unprocessable("user header required"));
    }

    state
        .message_service
        .post(PostMessageRequest {
            from: from.to_string(),
            to: payload.to,
            text: payload.text,
            kind: payload.kind,
        })
        .await?;
    Ok(StatusCode::CREATED)
}

async fn list_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let viewer = user_header(&headers);
    // absent or unparseable limit means no truncation
    let limit = query
        .limit
        .as_deref()
        .and_then(|raw| raw.parse::<usize>().ok())
        .filter(|n| *n > 0);

    let messages = state.message_service.visible_to(viewer, limit).await?;
    Ok(Json(messages.iter().map(MessageDto::from).collect()))
}

async fn heartbeat(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state
        .presence_service
        .heartbeat(user_header(&headers))
        .await?;
    Ok(StatusCode::OK)
}

async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state
        .message_service
        .delete(id, user_header(&headers))
        .await?;
    Ok(StatusCode::OK)
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::api::{error::ApiError, state::AppState};
use crate::application::{SessionState, TracingSink};
use crate::domain::{ConversationTurn, DomainError};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub collection: String,
    pub messages: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub session_id: Uuid,
    pub messages: Vec<ConversationTurn>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub session_id: Uuid,
    pub answer: String,
    pub is_error: bool,
    pub messages: Vec<ConversationTurn>,
}

async fn find_session(state: &AppState, id: &Uuid) -> Result<Arc<Mutex<SessionState>>, ApiError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| DomainError::not_found(format!("session {id}")).into())
}

pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let mut session = SessionState::new(state.config.prompts.qa.greeting.as_str());
    let collection = session
        .ensure_vector_store(state.bootstrap.as_ref())
        .await?
        .retriever()
        .collection()
        .to_string();

    let response = SessionResponse {
        session_id: session.id(),
        created_at: session.created_at(),
        collection,
        messages: session.transcript().turns().to_vec(),
    };
    state.sessions.insert(session).await;

    info!(session_id = %response.session_id, "session started");
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let session = find_session(&state, &id).await?;
    let session = session.lock().await;

    Ok(Json(MessagesResponse {
        session_id: id,
        messages: session.transcript().turns().to_vec(),
    }))
}

/// Retrieval and generation failures still answer 200: the error is part of
/// the conversation and the session remains usable.
pub async fn ask(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let session = find_session(&state, &id).await?;
    let mut session = session.lock().await;
    let sink = TracingSink::new(id);

    let (answer, is_error) = match session.ask(&state.qa, &request.question, &sink).await {
        Ok(answer) => (answer, false),
        Err(e) if e.is_query_failure() => (e.to_string(), true),
        Err(e) => return Err(e.into()),
    };

    Ok(Json(AskResponse {
        session_id: id,
        answer,
        is_error,
        messages: session.transcript().turns().to_vec(),
    }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&id).await {
        info!(session_id = %id, "session ended");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(DomainError::not_found(format!("session {id}")).into())
    }
}

//! HTTP route handlers for the Oriento API.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::advisor::core::errors::AdvisorError;
use crate::advisor::core::ids::ConversationId;

use super::auth::AuthenticatedUser;
use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/oriento/ask", post(ask_oriento))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "oriento-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Advisor question request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    /// The user's question.
    pub prompt: String,
    /// Conversation to continue; omit or leave blank to start a new one.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Advisor question response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    /// Conversation id to send with follow-up questions.
    pub conversation_id: String,
    /// The assistant's response.
    pub response: String,
}

/// Handle advisor questions.
async fn ask_oriento(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    if request.prompt.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "prompt must not be empty".into()));
    }

    let conversation_id = parse_conversation_id(request.conversation_id.as_deref())?;

    let reply = state
        .binder
        .ask(&request.prompt, conversation_id, caller)
        .await
        .map_err(error_response)?;

    Ok(Json(AskResponse {
        conversation_id: reply.conversation_id.to_string(),
        response: reply.text,
    }))
}

/// Interpret the externally supplied conversation id.
///
/// Blank values mean "start a new conversation". A value that is not a UUID
/// can never name a stored conversation, so it is reported as not found
/// rather than as a syntax error.
fn parse_conversation_id(
    raw: Option<&str>,
) -> Result<Option<ConversationId>, (StatusCode, String)> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    raw.parse::<ConversationId>().map(Some).map_err(|_| {
        error_response(AdvisorError::ConversationNotFound(raw.to_string()))
    })
}

/// Map advisor errors onto HTTP status codes.
fn error_response(err: AdvisorError) -> (StatusCode, String) {
    let status = match &err {
        AdvisorError::ConversationNotFound(_) => StatusCode::NOT_FOUND,
        AdvisorError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        AdvisorError::Upstream(_) | AdvisorError::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_conversation_ids_start_a_new_conversation() {
        assert_eq!(parse_conversation_id(None).unwrap(), None);
        assert_eq!(parse_conversation_id(Some("")).unwrap(), None);
        assert_eq!(parse_conversation_id(Some("   ")).unwrap(), None);
    }

    #[test]
    fn valid_uuid_parses_to_a_typed_id() {
        let id = ConversationId::new();
        let parsed = parse_conversation_id(Some(&id.to_string())).unwrap();
        assert_eq!(parsed, Some(id));
    }

    #[test]
    fn non_uuid_conversation_id_is_not_found() {
        let (status, _) = parse_conversation_id(Some("garbage")).unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_statuses_follow_the_taxonomy() {
        let cases = [
            (
                error_response(AdvisorError::ConversationNotFound("c".into())).0,
                StatusCode::NOT_FOUND,
            ),
            (
                error_response(AdvisorError::PermissionDenied("c".into())).0,
                StatusCode::FORBIDDEN,
            ),
            (
                error_response(AdvisorError::Upstream("quota".into())).0,
                StatusCode::BAD_GATEWAY,
            ),
            (
                error_response(AdvisorError::InvalidConfig("m".into())).0,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (actual, expected) in cases {
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn ask_request_accepts_camel_case() {
        let request: AskRequest = serde_json::from_str(
            r#"{"prompt": "What is cash flow?", "conversationId": "abc"}"#,
        )
        .unwrap();
        assert_eq!(request.conversation_id.as_deref(), Some("abc"));
    }

    #[test]
    fn ask_response_serializes_camel_case() {
        let response = AskResponse {
            conversation_id: "c-1".into(),
            response: "text".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("conversationId").is_some());
        assert!(json.get("response").is_some());
    }
}

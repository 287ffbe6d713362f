use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use log::error;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::chat::ChatService;
use crate::models::chat::{Message, Sender};
use crate::server::page;

#[derive(Clone)]
struct AppState {
    service: ChatService,
}

pub fn router(service: ChatService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(chat_page_handler))
        .route("/api/conversation", get(conversation_handler))
        .route("/api/chat", post(action_handler))
        .layer(cors)
        .with_state(AppState { service })
}

/// Form payload for the action surface. Every field arrives as a string; the
/// handler validates presence and shape and answers 400 with a diagnostic on
/// any violation.
#[derive(Debug, Default, Deserialize)]
pub struct ActionForm {
    #[serde(rename = "actionType")]
    action_type: Option<String>,
    message: Option<String>,
    #[serde(rename = "messageId")]
    message_id: Option<String>,
    #[serde(rename = "messageTimestamp")]
    message_timestamp: Option<String>,
    #[serde(rename = "responseId")]
    response_id: Option<String>,
}

async fn chat_page_handler(State(state): State<AppState>) -> Html<String> {
    let conversation = state.service.conversation().await;
    Html(page::render(&conversation))
}

async fn conversation_handler(State(state): State<AppState>) -> Response {
    Json(state.service.conversation().await).into_response()
}

async fn action_handler(State(state): State<AppState>, Form(form): Form<ActionForm>) -> Response {
    handle_action(&state.service, form).await
}

fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, message.into()).into_response()
}

async fn handle_action(service: &ChatService, form: ActionForm) -> Response {
    let Some(action_type) = form.action_type else {
        return bad_request("actionType must be a string");
    };

    match action_type.as_str() {
        "send-message" => {
            let Some(message) = form.message else {
                return bad_request("message must be a string");
            };
            if message.trim().is_empty() {
                // The original treats an empty submit as a successful no-op.
                return Redirect::to("/").into_response();
            }

            let Some(message_id) = form.message_id else {
                return bad_request("messageId must be a string");
            };
            let Ok(message_id) = message_id.parse::<Uuid>() else {
                return bad_request("messageId must be a UUID");
            };

            let Some(message_timestamp) = form.message_timestamp else {
                return bad_request("messageTimestamp must be a string");
            };
            let Ok(message_timestamp) = DateTime::parse_from_rfc3339(&message_timestamp) else {
                return bad_request("messageTimestamp must be an ISO-8601 datetime");
            };

            let Some(response_id) = form.response_id else {
                return bad_request("responseId must be a string");
            };
            let Ok(response_id) = response_id.parse::<Uuid>() else {
                return bad_request("responseId must be a UUID");
            };

            let user_message = Message::with_identity(
                message,
                Sender::User,
                message_id,
                message_timestamp.with_timezone(&Utc),
            );

            match service.send_message(user_message, response_id).await {
                Ok(()) => Redirect::to("/").into_response(),
                Err(e) => {
                    error!("send-message failed: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
                }
            }
        }
        "reset-chat" => match service.reset().await {
            Ok(()) => Redirect::to("/").into_response(),
            Err(e) => {
                error!("reset-chat failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        },
        other => bad_request(format!("Invalid action type \"{}\"", other)),
    }
}

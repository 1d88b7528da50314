//! Message routes
//!
//! Sending persists first and then hands the record to the real-time
//! dispatcher; the response only reflects persistence.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use parley_shared::{Message, NewMessage, User, UserId};

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
    websocket::DeliveryOutcome,
};

#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    pub text: Option<String>,
    /// Base64 data URI, uploaded to the image host before persisting
    pub image: Option<String>,
}

/// Users for the sidebar: everyone except the caller
pub async fn users_for_sidebar(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Json<Vec<User>> {
    Json(state.users.list_except(auth_user.user_id).await)
}

/// Conversation between the caller and another user
pub async fn get_messages(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(other_id): Path<UserId>,
) -> ApiResult<Json<Vec<Message>>> {
    if !state.users.exists(other_id).await {
        return Err(ApiError::NotFound);
    }

    Ok(Json(
        state.messages.conversation(auth_user.user_id, other_id).await,
    ))
}

/// Send a message to another user
pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(receiver_id): Path<UserId>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let text = req.text.filter(|t| !t.trim().is_empty());
    let image = req.image.filter(|i| !i.trim().is_empty());

    if text.is_none() && image.is_none() {
        return Err(ApiError::Validation(
            "Message must contain text or an image".to_string(),
        ));
    }

    if !state.users.exists(receiver_id).await {
        return Err(ApiError::NotFound);
    }

    let image_url = match image {
        Some(data) => Some(state.images.upload(&data).await?),
        None => None,
    };

    let message = state
        .messages
        .insert(NewMessage {
            sender_id: auth_user.user_id,
            receiver_id,
            text,
            image_url,
        })
        .await;

    // Best effort; the outcome never changes the response
    let outcome = state.dispatcher.dispatch(&message).await;
    tracing::info!(
        message_id = %message.id,
        sender_id = %message.sender_id,
        receiver_id = %message.receiver_id,
        delivered = matches!(outcome, DeliveryOutcome::Delivered(_)),
        "Message sent"
    );

    Ok((StatusCode::CREATED, Json(message)))
}

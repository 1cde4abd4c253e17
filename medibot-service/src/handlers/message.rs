use crate::models::{ClassifiedReply, IncomingRequest};
use crate::services::providers::ProviderError;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Timeout(timeout) => AppError::UpstreamTimeout(timeout.as_millis() as u64),
            other => AppError::UpstreamError(anyhow::Error::new(other)),
        }
    }
}

/// `POST /api/message`: classify a chat message through the completion provider.
///
/// Upstream failures and timeouts become a generic 500; a reply the model did not
/// format as requested is still a 200.
pub async fn post_message(
    State(state): State<AppState>,
    payload: Result<Json<IncomingRequest>, JsonRejection>,
) -> Result<Json<ClassifiedReply>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Rejected message body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest(anyhow::anyhow!(rejection.body_text()))
        }
    })?;

    tracing::info!(message_len = request.message.len(), "Received message from frontend");
    tracing::debug!(message = %request.message, "Message content");

    let reply = state.relay.relay(&request.message).await?;

    tracing::info!(
        condition_level = %reply.condition_level,
        reply_len = reply.reply.len(),
        "Sent processed response to frontend"
    );

    Ok(Json(reply))
}

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use rp_common::error::AppResult;

use crate::services::checkout::NotifyResponse;
use crate::state::SharedState;

pub async fn on_notify(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<NotifyResponse> {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    state.checkout.on_notify(content_type, &body).await
}

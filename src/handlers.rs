use crate::app::AppState;
use crate::chat::ChatRequest;
use crate::error::{AppError, AppResult};
use crate::{relay, upstream};
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.render()
}

/// Decode, swap the model, forward, relay. Any failure ends the request with
/// a JSON error; nothing is forwarded after a decode error.
pub async fn chat_completions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Response> {
    let body = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejecting unreadable chat completion body");
        metrics::counter!("model_forward_request_errors_total", "kind" => "request_body").increment(1);
        AppError::from(rejection)
    })?;
    let request = ChatRequest::decode(&body).map_err(|err| {
        tracing::debug!(error = %err, "rejecting malformed chat completion request");
        metrics::counter!("model_forward_request_errors_total", "kind" => "decode").increment(1);
        AppError::from(err)
    })?;

    let rewritten = state.model_table.rewrite(request);
    let response = upstream::dispatch(
        &state.http,
        &state.runtime.api_base,
        &rewritten.request,
        &headers,
        state.runtime.upstream_timeout(),
    )
    .await
    .map_err(|err| {
        tracing::warn!(
            error = %err,
            model = %rewritten.request.model,
            "upstream dispatch failed"
        );
        metrics::counter!("model_forward_request_errors_total", "kind" => err.kind()).increment(1);
        AppError::from(err)
    })?;

    Ok(relay::relay(response))
}

pub async fn not_found() -> AppError {
    AppError::not_found()
}

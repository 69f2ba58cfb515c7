//! The dispatcher: every path that is not an operational endpoint lands here.

use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use futures_util::StreamExt;

use crate::error::AppError;
use crate::protocol::{Operation, Route};
use crate::session::{CloseGuard, JoinOutcome};
use crate::state::AppState;
use crate::stream::{event_stream_response, PushStream};

pub async fn dispatch(
    State(state): State<AppState>,
    uri: Uri,
    body: Body,
) -> Result<Response, AppError> {
    let route = Route::parse(uri.path()).inspect_err(|e| {
        tracing::debug!("rejected {}: {e:?}", uri.path());
    })?;

    match route.operation {
        Operation::Relay => relay(&state, route, body).await,
        Operation::Join => Ok(join(&state, route)),
        Operation::Decline => Ok(decline(&state, route)),
    }
}

async fn relay(state: &AppState, route: Route, body: Body) -> Result<Response, AppError> {
    let peer_id = route.peer_id.as_deref().unwrap_or_default();
    if !state.registry.has_live_peer(&route.session_id, peer_id) {
        return Err(AppError::BadRequest("peer is not connected".to_string()));
    }

    let payload = read_body(body, state.max_relay_body_bytes).await?;

    if !state
        .registry
        .relay(&route.session_id, &route.user_id, peer_id, &payload)
    {
        return Err(AppError::BadRequest(
            "peer disconnected before delivery".to_string(),
        ));
    }
    Ok(StatusCode::OK.into_response())
}

/// Buffer the whole request body, chunk by chunk.
async fn read_body(body: Body, limit: usize) -> Result<Vec<u8>, AppError> {
    let mut chunks = body.into_data_stream();
    let mut payload = Vec::new();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(format!("failed to read body: {e}")))?;
        if payload.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge(format!(
                "relay body exceeds {limit} bytes"
            )));
        }
        payload.extend_from_slice(&chunk);
    }
    Ok(payload)
}

fn join(state: &AppState, route: Route) -> Response {
    let (mut stream, rx) = PushStream::open();
    stream.start_heartbeat(state.registry.heartbeat_interval());

    match state
        .registry
        .join(&route.session_id, &route.user_id, stream)
    {
        JoinOutcome::Busy => event_stream_response(rx, ()),
        JoinOutcome::Admitted { stream_id, .. } => {
            let guard = CloseGuard::new(
                state.registry.clone(),
                route.session_id,
                route.user_id,
                stream_id,
            );
            event_stream_response(rx, guard)
        }
    }
}

fn decline(state: &AppState, route: Route) -> Response {
    // Opened for symmetry with join; nothing is ever written to it.
    let (stream, rx) = PushStream::open();
    if state
        .registry
        .decline(&route.session_id, &route.user_id)
        .is_none()
    {
        tracing::debug!("@{} - decline for unknown session", route.session_id);
    }
    stream.end();
    event_stream_response(rx, ())
}

//! Route handlers for `/api/simulations` and the not-found fallback.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use duel_core::{
    content_hash, js_json, validate_submission, SimulationSubmission, ValidationError,
};
use duel_storage::{NewSimulation, SimulationRecord, StorageError};
use serde_json::Value;

use super::error::DispatchError;
use super::json_message;
use super::state::AppState;

/// Fallback handler for unmatched paths.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// `/api/simulations`, any method.
///
/// The method is matched here rather than in the router so every method
/// other than GET and POST (HEAD and OPTIONS included) gets the same
/// plain-text 405. A body that could not be read (over the size limit, or
/// a broken stream) only fails a POST.
pub(crate) async fn route_simulation(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, DispatchError> {
    match method {
        Method::POST => {
            let parsed: Value = serde_json::from_slice(&body?)?;
            Ok(handle_simulation_post(&state, parsed).await)
        }
        Method::GET => Ok(handle_simulation_get(&state, &uri).await),
        _ => Ok((StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()),
    }
}

/// Why a well-formed POST body was not stored.
#[derive(Debug, thiserror::Error)]
enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// POST /api/simulations
async fn handle_simulation_post(state: &AppState, body: Value) -> Response {
    match insert_simulation(state, &body).await {
        Ok((id, data_hash)) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "message": "Simulation inserted successfully",
                "id": id,
                "data_hash": data_hash,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "error inserting simulation");
            json_message(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

async fn insert_simulation(
    state: &AppState,
    body: &Value,
) -> Result<(String, String), SubmitError> {
    let submission = validate_submission(body)?;
    let data_hash = content_hash(&submission.data);
    let id = submission.id.clone();

    state
        .store
        .insert_simulation(new_simulation(submission, data_hash.clone()))
        .await?;

    tracing::info!(%id, %data_hash, "simulation stored");
    Ok((id, data_hash))
}

/// `summary` is only checked for presence; non-string values are stored as
/// their JSON text.
fn new_simulation(submission: SimulationSubmission, data_hash: String) -> NewSimulation {
    let summary = match submission.summary {
        Value::String(s) => s,
        other => other.to_string(),
    };
    NewSimulation {
        id: submission.id,
        user_id: submission.user_id,
        env_id: submission.env_id,
        data_hash,
        data: submission.data,
        result: submission.result,
        summary,
    }
}

/// First `id` query parameter, if any. `?id=` yields an empty id.
fn query_id(uri: &Uri) -> Option<String> {
    let params: Vec<(String, String)> = Query::try_from_uri(uri)
        .map(|Query(params)| params)
        .unwrap_or_default();
    params
        .into_iter()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value)
}

/// GET /api/simulations?id=<id>
async fn handle_simulation_get(state: &AppState, uri: &Uri) -> Response {
    let Some(id) = query_id(uri) else {
        return json_message(StatusCode::NOT_FOUND, "Query not valid");
    };

    match state.store.get_simulation(&id).await {
        Ok(Some(record)) => record_response(&record),
        Ok(None) => json_message(StatusCode::NOT_FOUND, "Simulation not found"),
        Err(e) => {
            tracing::error!(%id, error = %e, "error retrieving simulation");
            json_message(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error retrieving simulation",
            )
        }
    }
}

/// 200 with the record as JSON, numbers rendered as `JSON.stringify` would
/// (`"result":7`, not `7.0`).
fn record_response(record: &SimulationRecord) -> Response {
    match js_json::to_vec(record) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(id = %record.id, error = %e, "error serializing simulation");
            json_message(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error retrieving simulation",
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_id_takes_first_value() {
        let uri: Uri = "/api/simulations?id=a&id=b".parse().unwrap();
        assert_eq!(query_id(&uri).as_deref(), Some("a"));
    }

    #[test]
    fn query_id_decodes_percent_escapes() {
        let uri: Uri = "/api/simulations?x=1&id=run%201%2Fb".parse().unwrap();
        assert_eq!(query_id(&uri).as_deref(), Some("run 1/b"));
    }

    #[test]
    fn query_id_empty_and_absent() {
        let empty: Uri = "/api/simulations?id=".parse().unwrap();
        assert_eq!(query_id(&empty).as_deref(), Some(""));
        let none: Uri = "/api/simulations?ids=1".parse().unwrap();
        assert_eq!(query_id(&none), None);
        let bare: Uri = "/api/simulations".parse().unwrap();
        assert_eq!(query_id(&bare), None);
    }

    #[test]
    fn non_string_summary_is_stored_as_json_text() {
        let sub = SimulationSubmission {
            id: "s1".to_string(),
            user_id: "u1".to_string(),
            env_id: "e1".to_string(),
            data: Value::Null,
            result: 1.0,
            summary: serde_json::json!({"k": [1, 2]}),
        };
        assert_eq!(new_simulation(sub, String::new()).summary, r#"{"k":[1,2]}"#);
    }
}

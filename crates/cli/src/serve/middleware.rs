//! HTTP middleware: CORS decoration and panic recovery.

use std::any::Any;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use super::json_message;
use super::state::AppState;

/// CORS middleware. Runs after routing so it decorates every response,
/// including 404/405 and error responses.
///
/// `Access-Control-Allow-Origin` echoes the request `Origin` only on an exact
/// allow-list match; other origins are served normally without it.
pub(crate) async fn cors_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let origin = request.headers().get(ORIGIN).cloned();
    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut(), origin.as_ref(), &state);
    response
}

fn apply_cors_headers(headers: &mut HeaderMap, origin: Option<&HeaderValue>, state: &AppState) {
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );

    if let Some(origin) = origin {
        let allowed = origin
            .to_str()
            .map(|o| state.is_allowed_origin(o))
            .unwrap_or(false);
        if allowed {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        }
    }
}

/// Panic handler for `CatchPanicLayer`: a panicking handler still yields a
/// JSON 500, which then passes back out through the CORS middleware.
pub(crate) fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "handler panicked");
    json_message(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_storage::SqliteSimulationStore;

    async fn state() -> AppState {
        let store = SqliteSimulationStore::in_memory().await.unwrap();
        AppState::new(Arc::new(store), vec!["https://duel.tools".to_string()])
    }

    #[tokio::test]
    async fn fixed_headers_always_set() {
        let state = state().await;
        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers, None, &state);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
        assert!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn origin_match_is_exact() {
        let state = state().await;
        for probe in [
            "https://duel.tools/",
            "https://DUEL.tools",
            "http://duel.tools",
            "https://duel.tools.evil.example",
        ] {
            let mut headers = HeaderMap::new();
            apply_cors_headers(&mut headers, Some(&HeaderValue::from_static(probe)), &state);
            assert!(
                headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none(),
                "{probe} should not be allowed"
            );
        }

        let mut headers = HeaderMap::new();
        let origin = HeaderValue::from_static("https://duel.tools");
        apply_cors_headers(&mut headers, Some(&origin), &state);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "https://duel.tools");
    }
}

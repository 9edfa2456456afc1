//! HTTP surface: `GET /api/search` and `GET /health`.
//!
//! Every response uses the same envelope:
//!
//! ```text
//! 200 { "success": true,  "data": { "results", "stats", "query", "degraded"? } }
//! 400 { "success": false, "error": "INVALID_QUERY",  "message": "..." }
//! 500 { "success": false, "error": "INTERNAL_ERROR", "message": "..." }
//! ```

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use corpsite_search::{RawQuery, SearchError, SearchOutcome, SiteSearch};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::audit::REQUEST_ID;

/// Message returned for unexpected failures. Details stay in the log.
const INTERNAL_ERROR_MESSAGE: &str = "an unexpected error occurred while searching";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<SiteSearch>,
    shutdown: CancellationToken,
}

impl AppState {
    /// Serve searches from `engine`; in-flight searches stop when
    /// `shutdown` is cancelled.
    pub fn new(engine: Arc<SiteSearch>, shutdown: CancellationToken) -> Self {
        Self { engine, shutdown }
    }
}

/// Query parameters of `GET /api/search`.
///
/// Everything arrives as text so that a malformed `limit` or `fuzzy` falls
/// back to its default instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Search term.
    pub q: Option<String>,
    /// Domain filter: `all`, a source or a domain name.
    #[serde(rename = "type")]
    pub filter: Option<String>,
    /// Maximum number of results.
    pub limit: Option<String>,
    /// `true` or `1` enables fuzzy matching.
    pub fuzzy: Option<String>,
}

impl SearchParams {
    /// Convert into the engine's request type.
    pub fn into_raw(self) -> RawQuery {
        RawQuery {
            term: self.q.unwrap_or_default(),
            filter: self.filter.filter(|f| !f.trim().is_empty()),
            limit: self.limit.and_then(|l| l.trim().parse().ok()),
            fuzzy: self.fuzzy.map(|f| {
                let f = f.trim();
                f.eq_ignore_ascii_case("true") || f == "1"
            }),
        }
    }
}

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Machine-readable error code on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable error message on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    /// Failed response.
    pub fn failure(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: Some(message.into()),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", get(search_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Serve `state` on `listener` until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let shutdown = state.shutdown.clone();
    let local_addr = listener.local_addr()?;
    let app = router(state);

    tracing::info!("search service listening on http://{local_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    tracing::info!("search service stopped");
    Ok(())
}

/// `GET /health`
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

/// `GET /api/search`
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("search_request", %request_id);
    let raw = params.into_raw();

    let engine = Arc::clone(&state.engine);
    let shutdown = state.shutdown.clone();
    let task = REQUEST_ID.scope(request_id, async move {
        engine.search_with_cancel(raw, &shutdown).await
    });

    // Run on its own task so a panic inside the engine becomes a 500
    // instead of a dropped connection. Dropping the handler aborts it.
    let outcome = match AbortOnDropHandle::new(tokio::spawn(task.instrument(span.clone()))).await
    {
        Ok(outcome) => outcome,
        Err(join_err) => {
            span.in_scope(|| tracing::error!(error = %join_err, "search task failed"));
            Err(SearchError::Internal(join_err.to_string()))
        }
    };

    span.in_scope(|| match outcome {
        Ok(outcome) => success_response(outcome),
        Err(err) => error_response(&err),
    })
}

fn success_response(outcome: SearchOutcome) -> Response {
    tracing::debug!(
        results = outcome.results.len(),
        degraded = outcome.degraded.len(),
        "search succeeded"
    );
    (StatusCode::OK, Json(ApiResponse::ok(outcome))).into_response()
}

fn error_response(err: &SearchError) -> Response {
    if err.is_invalid_query() {
        tracing::debug!(error = %err, "invalid search request");
        let message = match err {
            SearchError::InvalidQuery(reason) => reason.clone(),
            other => other.to_string(),
        };
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::failure(err.error_code(), message)),
        )
            .into_response();
    }

    tracing::error!(error = %err, "search failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::failure(
            err.error_code(),
            INTERNAL_ERROR_MESSAGE,
        )),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpsite_search::{Domain, MemoryRepository};
    use serde_json::{Value, json};

    fn state() -> AppState {
        let repository = MemoryRepository::new().with(
            Domain::Page,
            vec![json!({
                "id": "p1",
                "title": "Nuestros Servicios",
                "slug": "servicios",
                "description": "servicios de construcción"
            })],
        );
        let engine = SiteSearch::builder()
            .repository_for_all(Arc::new(repository))
            .build()
            .expect("build");
        AppState::new(Arc::new(engine), CancellationToken::new())
    }

    fn params(q: &str) -> SearchParams {
        SearchParams {
            q: Some(q.to_owned()),
            ..Default::default()
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn params_parse_leniently() {
        let raw = SearchParams {
            q: Some("lima".into()),
            filter: Some("careers".into()),
            limit: Some("abc".into()),
            fuzzy: Some("TRUE".into()),
        }
        .into_raw();
        assert_eq!(raw.term, "lima");
        assert_eq!(raw.filter.as_deref(), Some("careers"));
        assert_eq!(raw.limit, None);
        assert_eq!(raw.fuzzy, Some(true));

        let raw = SearchParams {
            limit: Some(" 5 ".into()),
            fuzzy: Some("no".into()),
            filter: Some("".into()),
            ..Default::default()
        }
        .into_raw();
        assert_eq!(raw.term, "");
        assert_eq!(raw.limit, Some(5));
        assert_eq!(raw.fuzzy, Some(false));
        assert_eq!(raw.filter, None);
    }

    #[tokio::test]
    async fn search_success_envelope() {
        let response = search_handler(State(state()), Query(params("construcción"))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert!(body.get("error").is_none());
        let data = &body["data"];
        assert_eq!(data["results"][0]["id"], "p1");
        assert_eq!(data["results"][0]["domain"], "page");
        assert_eq!(data["results"][0]["url"], "/servicios");
        assert_eq!(data["results"][0]["highlightedFields"][0], "description");
        assert_eq!(data["stats"]["totalResults"], 1);
        assert_eq!(data["stats"]["byDomain"]["page"], 1);
        assert_eq!(data["query"]["term"], "construcción");
        assert_eq!(data["query"]["type"], "all");
        assert_eq!(data["query"]["limit"], 50);
        assert_eq!(data["query"]["fuzzy"], false);
        assert!(data.get("degraded").is_none());
    }

    #[tokio::test]
    async fn short_term_is_bad_request() {
        let response = search_handler(State(state()), Query(params("a"))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "INVALID_QUERY");
        assert!(body["message"].as_str().is_some_and(|m| m.contains("at least 2")));
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn missing_term_is_bad_request() {
        let response = search_handler(State(state()), Query(SearchParams::default())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cancelled_search_is_internal_error() {
        let state = state();
        state.shutdown.cancel();
        let response = search_handler(State(state), Query(params("servicios"))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "INTERNAL_ERROR");
        assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = health_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "ok"}));
    }
}

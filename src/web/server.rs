use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::catalog::corpus::Corpus;
use crate::catalog::source::CorpusError;
use crate::catalog::store::BookRoute;
use crate::cli::ServeArgs;
use crate::core::path::{PassagePath, PathError};
use crate::core::types::{CanonicalKey, DatasetId};
use crate::interlinear::{ComposeError, Composer, ComposerConfig, PathRoute};
use crate::matching::engine::{MatcherConfig, ReferenceMatcher};
use crate::utils::validation::{validate_link_text, ValidationError, MAX_LINK_TEXT_SIZE};

/// Request body limit; link text plus JSON overhead
pub const MAX_BODY_SIZE: usize = MAX_LINK_TEXT_SIZE + 64 * 1024;

/// Shared application state
pub struct AppState {
    pub corpus: Corpus,
}

/// Enhanced error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

#[derive(Deserialize)]
pub struct LinkRequest {
    pub dataset: DatasetId,
    pub text: String,
}

#[derive(Serialize)]
struct ResolveResponse {
    dataset: DatasetId,
    segment: String,
    route: BookRoute,
    #[serde(skip_serializing_if = "Option::is_none")]
    canonical_key: Option<CanonicalKey>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    // Log detailed error server-side for debugging (not exposed to client)
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None, // Never expose internal details to prevent information disclosure
    }
}

fn error_response(
    status: StatusCode,
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> Response {
    (
        status,
        Json(create_safe_error_response(error_type, user_message, internal_error)),
    )
        .into_response()
}

fn path_error_response(e: &PathError) -> Response {
    match e {
        PathError::Reference(inner) if inner.is_invalid_range() => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_range",
            &inner.to_string(),
            None,
        ),
        PathError::UnknownDataset(_) => {
            error_response(StatusCode::NOT_FOUND, "not_found", &e.to_string(), None)
        }
        _ => error_response(StatusCode::BAD_REQUEST, "invalid_path", &e.to_string(), None),
    }
}

fn compose_error_response(e: &ComposeError) -> Response {
    match e {
        ComposeError::NotFound(_) => {
            error_response(StatusCode::NOT_FOUND, "not_found", "Passage not found", None)
        }
        ComposeError::InvalidRange(inner) => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_range",
            &inner.to_string(),
            None,
        ),
        ComposeError::InvalidDatasets(message) => {
            error_response(StatusCode::BAD_REQUEST, "invalid_datasets", message, None)
        }
        ComposeError::Corpus(inner) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "corpus_error",
            "The corpus could not be read",
            Some(&inner.to_string()),
        ),
    }
}

fn corpus_error_response(e: &CorpusError) -> Response {
    match e {
        CorpusError::DatasetUnavailable(dataset) => error_response(
            StatusCode::NOT_FOUND,
            "dataset_unavailable",
            &format!("Dataset '{dataset}' is not available"),
            None,
        ),
        CorpusError::Validation(inner) => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            &inner.to_string(),
            None,
        ),
        _ => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "corpus_error",
            "The corpus could not be read",
            Some(&e.to_string()),
        ),
    }
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created or the server fails to start.
pub fn run(args: ServeArgs, corpus: Corpus) -> anyhow::Result<()> {
    // Build tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args, corpus).await })
}

/// Create the API router with security headers, timeouts and size limits.
///
/// Rate limiting is added by [`create_app`], since it keys on the peer address.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/datasets", get(datasets_handler))
        .route("/api/passage/{*path}", get(passage_handler))
        .route("/api/link", post(link_handler))
        .route("/api/resolve/{dataset}/{book}", get(resolve_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                // Request timeout to prevent slow client attacks
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                // Limit concurrent requests to prevent DOS
                .layer(ConcurrencyLimitLayer::new(100))
                .layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
}

/// Create the full application: the API router behind IP-based rate limiting.
///
/// # Errors
///
/// Returns an error if the rate limiter configuration is rejected.
pub fn create_app(state: Arc<AppState>) -> anyhow::Result<Router> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50) // Allow bursts of 50 requests
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit configuration"))?;

    Ok(create_router(state).layer(GovernorLayer {
        config: Arc::new(governor_conf),
    }))
}

async fn run_server(args: ServeArgs, corpus: Corpus) -> anyhow::Result<()> {
    let available = corpus.available_datasets();
    if available.is_empty() {
        tracing::warn!("No dataset could be loaded from the corpus");
    }
    for dataset in &available {
        tracing::info!("Serving {} with {} books", dataset.id, dataset.len());
    }

    let app = create_app(Arc::new(AppState { corpus }))?;

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting interlinear web server at http://{addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}/api/datasets"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Datasets with their books in canonical order
async fn datasets_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let datasets: Vec<serde_json::Value> = state
        .corpus
        .available_datasets()
        .into_iter()
        .map(|ds| {
            let books: Vec<serde_json::Value> = ds
                .books()
                .iter()
                .map(|b| {
                    serde_json::json!({
                        "order": b.order,
                        "slug": b.slug(),
                        "short_name": b.short_name,
                        "display_name": b.label(),
                    })
                })
                .collect();
            serde_json::json!({
                "id": ds.id,
                "locale": ds.locale(),
                "display_name": ds.id.info().display_name,
                "books": books,
            })
        })
        .collect();

    Json(serde_json::json!({ "datasets": datasets }))
}

/// Compose a passage; non-canonical book segments redirect to the canonical path
async fn passage_handler(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Response {
    let passage = match PassagePath::parse(&path) {
        Ok(passage) => passage,
        Err(e) => return path_error_response(&e),
    };

    let composer = Composer::new(&state.corpus, ComposerConfig::default());
    let request = match composer.route(&passage) {
        Ok(PathRoute::Compose(request)) => request,
        Ok(PathRoute::Redirect(canonical)) => {
            return Redirect::permanent(&format!("/api/passage{canonical}")).into_response();
        }
        Err(e) => return compose_error_response(&e),
    };

    match composer.compose(&request) {
        Ok(composite) => Json(composite).into_response(),
        Err(e) => compose_error_response(&e),
    }
}

/// Link citations in submitted text
async fn link_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LinkRequest>,
) -> Response {
    if let Err(e @ ValidationError::TextTooLarge) = validate_link_text(&request.text) {
        return error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "text_too_large",
            &e.to_string(),
            None,
        );
    }

    let matcher = ReferenceMatcher::new(&state.corpus, MatcherConfig::default());
    match matcher.link_references(&request.text, request.dataset) {
        Ok(linked) => Json(linked).into_response(),
        Err(e) => corpus_error_response(&e),
    }
}

/// Canonicalize a book segment for a dataset
async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Path((dataset, book)): Path<(String, String)>,
) -> Response {
    let dataset: DatasetId = match dataset.parse() {
        Ok(dataset) => dataset,
        Err(e) => {
            return error_response(StatusCode::NOT_FOUND, "not_found", &e.to_string(), None)
        }
    };

    let route = match state.corpus.route_book(dataset, &book) {
        Ok(route) => route,
        Err(e) => return corpus_error_response(&e),
    };

    let canonical_key = match &route {
        BookRoute::Canonical(slug) | BookRoute::Redirect(slug) => {
            Some(state.corpus.canonical_key_for(dataset, slug))
        }
        BookRoute::NotFound => None,
    };
    let status = if matches!(route, BookRoute::NotFound) {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    (
        status,
        Json(ResolveResponse {
            dataset,
            segment: book,
            route,
            canonical_key,
        }),
    )
        .into_response()
}

use anyhow::Result;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use movie_core::{CoreError, IndexCache, Recommender, DEFAULT_TOP_N};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::any::Any as PanicPayload;
use std::path::Path;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const MAX_TOP_N: usize = 100;

#[derive(Deserialize)]
pub struct RecommendParams {
    pub movie: Option<String>,
    pub top_n: Option<usize>,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub query: String,
    pub recommendations: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Please provide ?movie=Movie+Name")]
    MissingMovie,

    #[error("invalid query string: {0}")]
    BadQuery(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::MissingMovie | ApiError::BadQuery(_) => (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() })),
            ApiError::Core(CoreError::MovieNotFound(_)) => (StatusCode::NOT_FOUND, json!({ "error": self.to_string() })),
            ApiError::Core(CoreError::InvalidArgument(_)) => (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() })),
            ApiError::Core(e) => {
                tracing::error!(error = %e, "recommendation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "internal server error", "details": e.to_string() }))
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Load or build the index, then wire the router. Fails before serving if the index cannot be built.
pub fn build_app<P: AsRef<Path>, D: AsRef<Path>>(cache_dir: P, dataset: D) -> Result<Router> {
    let recommender = IndexCache::new(cache_dir, dataset).open_or_build()?;
    Ok(router(Arc::new(recommender)))
}

pub fn router(recommender: Arc<Recommender>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/", get(home))
        .route("/health", get(|| async { "ok" }))
        .route("/recommend", get(recommend_handler))
        .with_state(AppState { recommender })
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// JSON 500 for a handler that panicked.
pub fn panic_response(err: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let msg = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = msg, "handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "internal server error" }))).into_response()
}

async fn home() -> Html<&'static str> {
    Html("<h3>Movie Recommender API</h3><p>Use /recommend?movie=Movie+Name</p>")
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    params: Result<Query<RecommendParams>, QueryRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadQuery(e.body_text()))?;
    let movie = params.movie.filter(|m| !m.trim().is_empty()).ok_or(ApiError::MissingMovie)?;
    let top_n = params.top_n.unwrap_or(DEFAULT_TOP_N).min(MAX_TOP_N);
    let recommendations = state.recommender.recommend(&movie, top_n)?;
    tracing::debug!(query = %movie, hits = recommendations.len(), "recommendations served");
    Ok(Json(RecommendResponse { query: movie, recommendations }))
}

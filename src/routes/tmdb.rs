use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::EnrichedMovie,
    routes::AppState,
    services::enrichment,
};

#[derive(Debug, Deserialize)]
pub struct TmdbQuery {
    #[serde(default)]
    imdb_id: String,
}

/// Handler for the external enrichment endpoint
pub async fn tmdb_data(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<TmdbQuery>,
) -> AppResult<Json<EnrichedMovie>> {
    let provider = state.metadata.as_deref().ok_or_else(|| {
        AppError::Unavailable("TMDB API key is not configured".to_string())
    })?;

    tracing::info!(
        request_id = %request_id,
        imdb_id = %params.imdb_id,
        "Processing enrichment request"
    );

    let movie = enrichment::enrich_movie(provider, &state.provider_limits, &params.imdb_id)
        .await
        .map_err(|e| {
            tracing::warn!(request_id = %request_id, error = %e, "Enrichment failed");
            e
        })?;

    Ok(Json(movie))
}

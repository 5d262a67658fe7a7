use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{MovieSummary, PopularTitlesResponse, SearchResponse},
    routes::{AppState, TitleQuery},
    services::title_search,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    query: String,
}

/// Handler for catalog lookup by exact title
pub async fn movie_data(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<TitleQuery>,
) -> AppResult<Json<MovieSummary>> {
    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        "Processing movie data request"
    );

    let context = &state.context;
    let movie = context
        .catalog()
        .movie_by_title(&params.title, &context.settings().poster_base_url)?;
    Ok(Json(movie))
}

/// Handler for fuzzy title search
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let context = &state.context;
    let matches = title_search::search_titles(
        context.catalog(),
        context.scorer(),
        &params.query,
        context.settings().search_limit,
    );

    tracing::info!(
        request_id = %request_id,
        query = %params.query,
        results = matches.len(),
        "Title search returned"
    );

    Json(SearchResponse { matches })
}

/// Handler for the random popular-titles carousel
pub async fn popular(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<PopularTitlesResponse>> {
    let context = &state.context;
    let popular = context.popularity().sample(context.catalog()).map_err(|e| {
        tracing::error!(
            request_id = %request_id,
            requested = context.popularity().count(),
            error = %e,
            "Popular title sampling failed"
        );
        e
    })?;

    Ok(Json(PopularTitlesResponse { popular }))
}

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::RecommendationResponse,
    routes::{AppState, TitleQuery},
    services::recommendations,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<TitleQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        "Processing recommendation request"
    );

    let recommended = recommendations::get_recommendations(&state.context, &params.title)?;

    tracing::info!(
        request_id = %request_id,
        results = recommended.len(),
        "Recommendations returned"
    );

    Ok(Json(RecommendationResponse { recommended }))
}

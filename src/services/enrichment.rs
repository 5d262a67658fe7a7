use crate::{
    error::{AppError, AppResult},
    models::EnrichedMovie,
    services::{
        metadata::{self, ProviderLimits},
        providers::MetadataProvider,
    },
};

const PROVIDER_REGION: &str = "US";

/// IMDB title ids are `tt` followed by digits
fn is_imdb_title_id(id: &str) -> bool {
    id.strip_prefix("tt")
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Fetches and normalizes third-party metadata for a catalog movie
///
/// The three lookups depend on each other (the TMDB id from the first keys
/// the other two) and run in sequence. Any failure aborts the whole request;
/// there are no partial results and no retries.
pub async fn enrich_movie(
    provider: &dyn MetadataProvider,
    limits: &ProviderLimits,
    imdb_id: &str,
) -> AppResult<EnrichedMovie> {
    let imdb_id = imdb_id.trim();
    if imdb_id.is_empty() {
        return Err(AppError::InvalidInput(
            "imdb_id must be a non-empty string".to_string(),
        ));
    }
    if !is_imdb_title_id(imdb_id) {
        return Err(AppError::InvalidInput(format!(
            "imdb_id must look like tt0000000, got {:?}",
            imdb_id
        )));
    }

    let raw_movie = provider.find_by_imdb_id(imdb_id).await?.ok_or_else(|| {
        AppError::NotFound(format!("No {} movie found for IMDB id {}", provider.name(), imdb_id))
    })?;
    let tmdb_id = raw_movie.id;
    let movie = metadata::normalize_movie(&raw_movie)?;

    let raw_providers = provider
        .fetch_watch_providers(tmdb_id, PROVIDER_REGION)
        .await?;
    let providers = metadata::normalize_providers(&raw_providers, limits);

    let release_dates = provider.fetch_release_dates(tmdb_id).await?;
    let rating = metadata::extract_us_certification(&release_dates);

    tracing::info!(
        imdb_id = %imdb_id,
        tmdb_id = tmdb_id,
        genres = movie.genres.len(),
        rating = %rating,
        provider = provider.name(),
        "Movie metadata enriched"
    );

    Ok(EnrichedMovie::new(movie, providers, rating))
}

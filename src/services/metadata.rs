//! Reshapes raw TMDB payloads into the bounded structures returned to clients.

use crate::{
    error::{AppError, AppResult},
    models::{
        NormalizedMovie, ProviderBucket, TmdbCountryProviders, TmdbMovie, TmdbReleaseDateResult,
        WatchProvider,
    },
};

/// Maximum number of subscription providers returned
pub const STREAM_PROVIDER_LIMIT: usize = 5;

/// Default cap for rent and buy providers, overridden by
/// `PROVIDER_RENT_LIMIT` and `PROVIDER_BUY_LIMIT`
pub const DEFAULT_PURCHASE_PROVIDER_LIMIT: usize = 2;

/// Returned when TMDB lists no US certification
pub const NO_RATING: &str = "No rating found";

const US_REGION: &str = "US";

/// TMDB movie genre ids
pub const GENRES: [(i64, &str); 19] = [
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// Per-category provider caps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderLimits {
    pub stream: usize,
    pub rent: usize,
    pub buy: usize,
}

impl Default for ProviderLimits {
    fn default() -> Self {
        Self {
            stream: STREAM_PROVIDER_LIMIT,
            rent: DEFAULT_PURCHASE_PROVIDER_LIMIT,
            buy: DEFAULT_PURCHASE_PROVIDER_LIMIT,
        }
    }
}

pub fn genre_name(id: i64) -> Option<&'static str> {
    GENRES
        .iter()
        .find(|(genre_id, _)| *genre_id == id)
        .map(|(_, name)| *name)
}

/// Maps genre ids to names, failing on the first id outside the table
pub fn parse_genres(ids: &[i64]) -> AppResult<Vec<String>> {
    ids.iter()
        .map(|&id| {
            genre_name(id)
                .map(str::to_string)
                .ok_or(AppError::UnknownGenre(id))
        })
        .collect()
}

pub fn normalize_movie(movie: &TmdbMovie) -> AppResult<NormalizedMovie> {
    Ok(NormalizedMovie {
        id: movie.id,
        overview: movie.overview.clone(),
        release_date: movie.release_date.clone(),
        genres: parse_genres(&movie.genre_ids)?,
    })
}

fn top(providers: &Option<Vec<WatchProvider>>, limit: usize) -> Option<Vec<WatchProvider>> {
    providers
        .as_ref()
        .map(|list| list.iter().take(limit).cloned().collect())
}

/// Keeps the first few providers of each category in TMDB's order
pub fn normalize_providers(
    providers: &TmdbCountryProviders,
    limits: &ProviderLimits,
) -> ProviderBucket {
    ProviderBucket {
        stream: top(&providers.flatrate, limits.stream),
        rent: top(&providers.rent, limits.rent),
        buy: top(&providers.buy, limits.buy),
        link: providers.link.clone(),
    }
}

/// Certification of the first US release, or [`NO_RATING`]
pub fn extract_us_certification(results: &[TmdbReleaseDateResult]) -> String {
    results
        .iter()
        .find(|result| result.iso_3166_1.as_deref() == Some(US_REGION))
        .and_then(|result| result.release_dates.first())
        .map(|release| release.certification.clone())
        .unwrap_or_else(|| NO_RATING.to_string())
}

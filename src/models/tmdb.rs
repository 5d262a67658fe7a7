use serde::Deserialize;
use std::collections::HashMap;

use super::WatchProvider;

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from GET /find/{external_id}
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbFindResponse {
    #[serde(default)]
    pub movie_results: Vec<TmdbMovie>,
}

/// Movie record as embedded in find results
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbMovie {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

/// Response from GET /movie/{id}/watch/providers, keyed by region code
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbWatchProvidersResponse {
    #[serde(default)]
    pub results: HashMap<String, TmdbCountryProviders>,
}

/// Provider lists for a single region
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TmdbCountryProviders {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub flatrate: Option<Vec<WatchProvider>>,
    #[serde(default)]
    pub rent: Option<Vec<WatchProvider>>,
    #[serde(default)]
    pub buy: Option<Vec<WatchProvider>>,
}

/// Response from GET /movie/{id}/release_dates
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbReleaseDatesResponse {
    #[serde(default)]
    pub results: Vec<TmdbReleaseDateResult>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbReleaseDateResult {
    #[serde(default)]
    pub iso_3166_1: Option<String>,
    #[serde(default)]
    pub release_dates: Vec<TmdbReleaseDate>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbReleaseDate {
    #[serde(default)]
    pub certification: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(rename = "type", default)]
    pub release_type: Option<i64>,
}

use serde::{Deserialize, Serialize};

pub mod tmdb;

pub use tmdb::{
    TmdbCountryProviders, TmdbFindResponse, TmdbMovie, TmdbReleaseDate, TmdbReleaseDateResult,
    TmdbReleaseDatesResponse, TmdbWatchProvidersResponse,
};

/// One row of the movie catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub imdb_id: String,
    #[serde(default)]
    pub vote_average: f64,
}

/// Catalog data returned by the movie-data route
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieSummary {
    pub title: String,
    pub poster: String,
    pub imdb_id: String,
    pub rating: f64,
}

/// A single streaming, rental or purchase offer as reported by TMDB
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchProvider {
    pub provider_id: i64,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub display_priority: i64,
}

/// Top watch providers per category. Categories TMDB does not report are omitted.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ProviderBucket {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<Vec<WatchProvider>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent: Option<Vec<WatchProvider>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy: Option<Vec<WatchProvider>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// The subset of a TMDB movie record the client uses
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NormalizedMovie {
    pub id: i64,
    pub overview: String,
    pub release_date: String,
    pub genres: Vec<String>,
}

/// Response body of the tmdb-data route
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnrichedMovie {
    pub id: i64,
    pub overview: String,
    pub release_date: String,
    pub genres: Vec<String>,
    pub providers: ProviderBucket,
    pub rating: String,
}

impl EnrichedMovie {
    pub fn new(movie: NormalizedMovie, providers: ProviderBucket, rating: String) -> Self {
        Self {
            id: movie.id,
            overview: movie.overview,
            release_date: movie.release_date,
            genres: movie.genres,
            providers,
            rating,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommended: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PopularTitlesResponse {
    pub popular: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub matches: Vec<String>,
}

//! Movie metadata provider abstraction
//!
//! The enrichment path talks to the third-party movie database through this
//! trait so handlers and services can be exercised without network access.

use crate::{
    error::AppResult,
    models::{TmdbCountryProviders, TmdbMovie, TmdbReleaseDateResult},
};

pub mod tmdb;

pub use tmdb::TmdbClient;

/// Trait for movie metadata providers
///
/// The three lookups are independent endpoints but are called in sequence:
/// the movie id returned by `find_by_imdb_id` keys the other two.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Finds the provider's movie record for an IMDB id
    ///
    /// Returns `Ok(None)` when the provider knows no movie with that id.
    async fn find_by_imdb_id(&self, imdb_id: &str) -> AppResult<Option<TmdbMovie>>;

    /// Watch providers for the given region
    async fn fetch_watch_providers(
        &self,
        movie_id: i64,
        region: &str,
    ) -> AppResult<TmdbCountryProviders>;

    /// Release dates and certifications for every region
    async fn fetch_release_dates(&self, movie_id: i64) -> AppResult<Vec<TmdbReleaseDateResult>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

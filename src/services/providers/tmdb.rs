//! TMDB API provider
//!
//! API Flow:
//! 1. Find: /find/{imdb_id}?external_source=imdb_id → TMDB movie id + basic record
//! 2. Providers: /movie/{id}/watch/providers → offers keyed by region
//! 3. Release dates: /movie/{id}/release_dates → certifications keyed by region

use reqwest::{Client as HttpClient, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    models::{
        TmdbCountryProviders, TmdbFindResponse, TmdbMovie, TmdbReleaseDateResult,
        TmdbReleaseDatesResponse, TmdbWatchProvidersResponse,
    },
    services::providers::MetadataProvider,
};

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbClient {
    /// Creates a client with a per-request timeout
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Appends `segments` to the API base, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| AppError::Internal(format!("Invalid TMDB API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("TMDB API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issues a GET against the endpoint at `segments` and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        extra_params: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();

        let response = self
            .http_client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(extra_params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(path = %path, status = %status, "TMDB request failed");
            return Err(AppError::UpstreamFailure(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(path = %path, response = %response_text, "Raw TMDB API response");

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize TMDB response"
            );
            AppError::UpstreamFailure(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbClient {
    async fn find_by_imdb_id(&self, imdb_id: &str) -> AppResult<Option<TmdbMovie>> {
        let response: TmdbFindResponse = self
            .get_json(&["find", imdb_id], &[("external_source", "imdb_id")])
            .await?;

        Ok(response.movie_results.into_iter().next())
    }

    async fn fetch_watch_providers(
        &self,
        movie_id: i64,
        region: &str,
    ) -> AppResult<TmdbCountryProviders> {
        let movie_id_segment = movie_id.to_string();
        let mut response: TmdbWatchProvidersResponse = self
            .get_json(&["movie", &movie_id_segment, "watch", "providers"], &[])
            .await?;

        response.results.remove(region).ok_or_else(|| {
            AppError::UpstreamFailure(format!(
                "TMDB lists no {} watch providers for movie {}",
                region, movie_id
            ))
        })
    }

    async fn fetch_release_dates(&self, movie_id: i64) -> AppResult<Vec<TmdbReleaseDateResult>> {
        let movie_id_segment = movie_id.to_string();
        let response: TmdbReleaseDatesResponse = self
            .get_json(&["movie", &movie_id_segment, "release_dates"], &[])
            .await?;
        Ok(response.results)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> TmdbClient {
        TmdbClient::new(
            "test_key".to_string(),
            format!("{}/", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_find_by_imdb_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/find/tt1375666"))
            .and(query_param("api_key", "test_key"))
            .and(query_param("external_source", "imdb_id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "movie_results": [{
                    "id": 27205,
                    "title": "Inception",
                    "overview": "Cobb, a skilled thief...",
                    "release_date": "2010-07-15",
                    "genre_ids": [28, 878]
                }],
                "tv_results": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let movie = client(&server)
            .find_by_imdb_id("tt1375666")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(movie.id, 27205);
        assert_eq!(movie.genre_ids, vec![28, 878]);
    }

    #[tokio::test]
    async fn test_find_by_imdb_id_no_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/find/tt0000000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "movie_results": []
            })))
            .mount(&server)
            .await;

        let movie = client(&server).find_by_imdb_id("tt0000000").await.unwrap();
        assert!(movie.is_none());
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/find/tt1375666"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let result = client(&server).find_by_imdb_id("tt1375666").await;
        match result {
            Err(AppError::UpstreamFailure(msg)) => assert!(msg.contains("401")),
            other => panic!("expected upstream failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/27205/release_dates"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = client(&server).fetch_release_dates(27205).await;
        assert!(matches!(result, Err(AppError::UpstreamFailure(_))));
    }

    #[tokio::test]
    async fn test_fetch_watch_providers_for_region() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/27205/watch/providers"))
            .and(query_param("api_key", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 27205,
                "results": {
                    "US": {
                        "link": "https://www.themoviedb.org/movie/27205/watch?locale=US",
                        "flatrate": [
                            {"logo_path": "/n.jpg", "provider_id": 8, "provider_name": "Netflix", "display_priority": 0}
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;

        let providers = client(&server)
            .fetch_watch_providers(27205, "US")
            .await
            .unwrap();
        assert_eq!(providers.flatrate.unwrap()[0].provider_id, 8);
        assert!(providers.link.is_some());
    }

    #[tokio::test]
    async fn test_fetch_watch_providers_missing_region() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/27205/watch/providers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 27205,
                "results": { "GB": {} }
            })))
            .mount(&server)
            .await;

        let result = client(&server).fetch_watch_providers(27205, "US").await;
        assert!(matches!(result, Err(AppError::UpstreamFailure(_))));
    }

    #[tokio::test]
    async fn test_fetch_release_dates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/27205/release_dates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 27205,
                "results": [
                    {"iso_3166_1": "US", "release_dates": [{"certification": "PG-13", "type": 3}]}
                ]
            })))
            .mount(&server)
            .await;

        let results = client(&server).fetch_release_dates(27205).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].release_dates[0].certification, "PG-13");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = TmdbClient::new(
            "key".to_string(),
            "https://api.themoviedb.org/3/".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();

        let url = client.endpoint(&["movie", "27205", "release_dates"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/movie/27205/release_dates"
        );
    }

    #[tokio::test]
    async fn test_imdb_id_cannot_escape_find_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/550"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 550 })))
            .expect(0)
            .mount(&server)
            .await;

        let result = client(&server).find_by_imdb_id("../movie/550").await;
        assert!(result.is_err());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.path().starts_with("/find/"));
    }

    #[tokio::test]
    async fn test_timeout_aborts_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/find/tt1375666"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "movie_results": [] }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client =
            TmdbClient::new("test_key".to_string(), server.uri(), Duration::from_secs(1)).unwrap();

        match client.find_by_imdb_id("tt1375666").await {
            Err(AppError::HttpClient(e)) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_provider_name() {
        let client = TmdbClient::new(
            "key".to_string(),
            "http://test.local".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.name(), "tmdb");
    }
}

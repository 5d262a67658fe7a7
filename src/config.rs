use serde::Deserialize;

use crate::services::metadata::{ProviderLimits, DEFAULT_PURCHASE_PROVIDER_LIMIT};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key, only required by the enrichment route
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Image CDN prefix prepended to catalog poster paths
    #[serde(default = "default_poster_base_url")]
    pub poster_base_url: String,

    /// Movie catalog (CSV)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Feature matrix (.npy), row-aligned with the catalog
    #[serde(default = "default_features_path")]
    pub features_path: String,

    /// Neighbor model parameters (JSON)
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of titles returned by the popular-titles route
    #[serde(default = "default_popular_count")]
    pub popular_count: usize,

    /// Popular titles are drawn from the first `popular_pool` catalog rows
    #[serde(default = "default_popular_pool")]
    pub popular_pool: usize,

    /// Maximum number of fuzzy search matches
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    #[serde(default = "default_purchase_provider_limit")]
    pub provider_rent_limit: usize,

    #[serde(default = "default_purchase_provider_limit")]
    pub provider_buy_limit: usize,

    /// Timeout for each TMDB request
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_poster_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_catalog_path() -> String {
    "./data/indexed_movies.csv".to_string()
}

fn default_features_path() -> String {
    "./data/features.npy".to_string()
}

fn default_model_path() -> String {
    "./data/model.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_popular_count() -> usize {
    12
}

fn default_popular_pool() -> usize {
    100
}

fn default_search_limit() -> usize {
    5
}

fn default_purchase_provider_limit() -> usize {
    DEFAULT_PURCHASE_PROVIDER_LIMIT
}

fn default_http_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Returns the TMDB API key if one is configured and non-blank
    pub fn tmdb_api_key(&self) -> Option<&str> {
        self.tmdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn provider_limits(&self) -> ProviderLimits {
        ProviderLimits {
            rent: self.provider_rent_limit,
            buy: self.provider_buy_limit,
            ..ProviderLimits::default()
        }
    }
}

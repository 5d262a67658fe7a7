use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        catalog::Catalog,
        features::FeatureIndex,
        neighbors::{BruteForceModel, ModelArtifact, NeighborModel},
        popularity::PopularitySampler,
        title_search::{PartialTokenSortScorer, SimilarityScorer, DEFAULT_SEARCH_LIMIT},
    },
};

/// Request-independent knobs for the core services
#[derive(Debug, Clone)]
pub struct Settings {
    pub poster_base_url: String,
    pub popular_count: usize,
    pub popular_pool: usize,
    pub search_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poster_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            popular_count: 12,
            popular_pool: 100,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            poster_base_url: config.poster_base_url.clone(),
            popular_count: config.popular_count,
            popular_pool: config.popular_pool,
            search_limit: config.search_limit,
        }
    }
}

/// Everything the recommendation pipeline reads, built once at startup
///
/// Never mutated after construction, so a single instance is shared by all
/// requests behind an `Arc`.
pub struct ServiceContext {
    catalog: Catalog,
    features: Arc<FeatureIndex>,
    model: Box<dyn NeighborModel>,
    scorer: Box<dyn SimilarityScorer>,
    popularity: PopularitySampler,
    settings: Settings,
}

impl ServiceContext {
    /// Assembles a context, checking that the catalog and feature rows line up
    pub fn new(
        catalog: Catalog,
        features: Arc<FeatureIndex>,
        model: Box<dyn NeighborModel>,
        scorer: Box<dyn SimilarityScorer>,
        settings: Settings,
    ) -> anyhow::Result<Self> {
        if catalog.len() != features.len() {
            anyhow::bail!(
                "Catalog has {} rows but feature index has {}",
                catalog.len(),
                features.len()
            );
        }

        let popularity = PopularitySampler::new(settings.popular_count, settings.popular_pool);

        Ok(Self {
            catalog,
            features,
            model,
            scorer,
            popularity,
            settings,
        })
    }

    /// Loads the catalog, feature matrix and model artifact named in `config`
    pub fn load(config: &Config) -> anyhow::Result<Self> {
        let catalog = Catalog::load(&config.catalog_path)?;
        let features = Arc::new(FeatureIndex::load(&config.features_path)?);
        let artifact = ModelArtifact::load(&config.model_path)?;

        tracing::info!(
            n_neighbors = artifact.n_neighbors,
            metric = ?artifact.metric,
            "Loaded neighbor model"
        );

        let model = BruteForceModel::new(features.clone(), &artifact);

        Self::new(
            catalog,
            features,
            Box::new(model),
            Box::new(PartialTokenSortScorer),
            Settings::from(config),
        )
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn features(&self) -> &FeatureIndex {
        &self.features
    }

    pub fn model(&self) -> &dyn NeighborModel {
        self.model.as_ref()
    }

    pub fn scorer(&self) -> &dyn SimilarityScorer {
        self.scorer.as_ref()
    }

    pub fn popularity(&self) -> &PopularitySampler {
        &self.popularity
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::CatalogEntry, services::neighbors::Metric};
    use ndarray::array;
    use std::io::Write;

    fn catalog(count: usize) -> Catalog {
        Catalog::from_entries(
            (0..count)
                .map(|i| CatalogEntry {
                    id: i as i64,
                    title: format!("Movie {}", i),
                    poster_path: Some(format!("/{}.jpg", i)),
                    imdb_id: format!("tt{:07}", i),
                    vote_average: 6.0,
                })
                .collect(),
        )
    }

    fn model(features: &Arc<FeatureIndex>) -> Box<dyn NeighborModel> {
        Box::new(BruteForceModel::new(
            features.clone(),
            &ModelArtifact {
                n_neighbors: 2,
                metric: Metric::Cosine,
            },
        ))
    }

    #[test]
    fn test_new_accepts_aligned_rows() {
        let features = Arc::new(FeatureIndex::new(array![[1.0, 0.0], [0.0, 1.0]]));
        let context = ServiceContext::new(
            catalog(2),
            features.clone(),
            model(&features),
            Box::new(PartialTokenSortScorer),
            Settings::default(),
        )
        .unwrap();

        assert_eq!(context.catalog().len(), 2);
        assert_eq!(context.model().n_neighbors(), 2);
        assert_eq!(context.settings().search_limit, 5);
    }

    #[test]
    fn test_new_rejects_misaligned_rows() {
        let features = Arc::new(FeatureIndex::new(array![[1.0, 0.0]]));
        let result = ServiceContext::new(
            catalog(2),
            features.clone(),
            model(&features),
            Box::new(PartialTokenSortScorer),
            Settings::default(),
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_config() {
        let dir = tempfile::tempdir().unwrap();

        let catalog_path = dir.path().join("indexed_movies.csv");
        let mut file = std::fs::File::create(&catalog_path).unwrap();
        writeln!(file, "id,title,poster_path,imdb_id,vote_average").unwrap();
        writeln!(file, "1,Alien,/alien.jpg,tt0078748,8.1").unwrap();
        writeln!(file, "2,Aliens,/aliens.jpg,tt0090605,7.9").unwrap();
        drop(file);

        let features_path = dir.path().join("features.npy");
        ndarray_npy::write_npy(&features_path, &array![[1.0f64, 0.0], [0.9, 0.1]]).unwrap();

        let model_path = dir.path().join("model.json");
        std::fs::write(&model_path, r#"{"n_neighbors": 2}"#).unwrap();

        let config: Config = envy::from_iter(vec![
            (
                "CATALOG_PATH".to_string(),
                catalog_path.display().to_string(),
            ),
            (
                "FEATURES_PATH".to_string(),
                features_path.display().to_string(),
            ),
            ("MODEL_PATH".to_string(), model_path.display().to_string()),
            ("POPULAR_COUNT".to_string(), "2".to_string()),
        ])
        .unwrap();

        let context = ServiceContext::load(&config).unwrap();
        assert_eq!(context.catalog().len(), 2);
        assert_eq!(context.features().dimensions(), 2);
        assert_eq!(context.settings().popular_count, 2);
    }
}

use anyhow::Context;
use ndarray::{Array1, ArrayView1, Axis};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use super::features::FeatureIndex;

/// A catalog row and its distance from the query vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub distance: f64,
}

/// Nearest-neighbor lookup over the feature index
///
/// Implementations must be deterministic and return neighbors ordered by
/// ascending distance. A query taken from row `r` of the index is expected
/// to get `r` back at distance 0.
pub trait NeighborModel: Send + Sync {
    /// Number of neighbors the model was fitted to return
    fn n_neighbors(&self) -> usize;

    /// Returns up to `k` nearest rows to `query`
    fn kneighbors(&self, query: ArrayView1<'_, f64>, k: usize) -> Vec<Neighbor>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cosine,
    Euclidean,
}

/// Parameters of the fitted model, stored next to the feature matrix
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelArtifact {
    pub n_neighbors: usize,
    #[serde(default = "default_metric")]
    pub metric: Metric,
}

fn default_metric() -> Metric {
    Metric::Cosine
}

impl ModelArtifact {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model {}", path.display()))?;
        let artifact: ModelArtifact = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse model {}", path.display()))?;

        if artifact.n_neighbors == 0 {
            anyhow::bail!("Model {} has n_neighbors = 0", path.display());
        }

        Ok(artifact)
    }
}

/// Exact k-nearest-neighbor search by scanning every row
pub struct BruteForceModel {
    features: Arc<FeatureIndex>,
    norms: Array1<f64>,
    n_neighbors: usize,
    metric: Metric,
}

impl BruteForceModel {
    pub fn new(features: Arc<FeatureIndex>, artifact: &ModelArtifact) -> Self {
        let norms = features
            .matrix()
            .map_axis(Axis(1), |row| row.dot(&row).sqrt());

        Self {
            features,
            norms,
            n_neighbors: artifact.n_neighbors,
            metric: artifact.metric,
        }
    }

    fn distance(&self, row: usize, query: &ArrayView1<'_, f64>, query_norm: f64) -> f64 {
        let candidate = self.features.matrix().row(row);
        match self.metric {
            Metric::Cosine => {
                let denom = self.norms[row] * query_norm;
                if denom == 0.0 {
                    1.0
                } else {
                    // Rounding can push identical vectors slightly below zero
                    (1.0 - candidate.dot(query) / denom).max(0.0)
                }
            }
            Metric::Euclidean => candidate
                .iter()
                .zip(query.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>()
                .sqrt(),
        }
    }
}

impl NeighborModel for BruteForceModel {
    fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    fn kneighbors(&self, query: ArrayView1<'_, f64>, k: usize) -> Vec<Neighbor> {
        let query_norm = query.dot(&query).sqrt();

        let mut neighbors: Vec<Neighbor> = (0..self.features.len())
            .map(|row| Neighbor {
                row,
                distance: self.distance(row, &query, query_norm),
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.row.cmp(&b.row))
        });
        neighbors.truncate(k);
        neighbors
    }
}

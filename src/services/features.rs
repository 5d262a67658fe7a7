use anyhow::Context;
use ndarray::{Array2, ArrayView1};
use ndarray_npy::{read_npy, ReadNpyError};
use std::path::Path;

/// Precomputed feature vectors, one row per catalog entry
#[derive(Debug, Clone)]
pub struct FeatureIndex {
    matrix: Array2<f64>,
}

impl FeatureIndex {
    pub fn new(matrix: Array2<f64>) -> Self {
        Self { matrix }
    }

    /// Loads a 2-D `.npy` array. float64 is expected; float32 files are widened.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let matrix = match read_npy::<_, Array2<f64>>(path) {
            Ok(matrix) => matrix,
            Err(ReadNpyError::WrongDescriptor(_)) => read_npy::<_, Array2<f32>>(path)
                .with_context(|| format!("Failed to read features {}", path.display()))?
                .mapv(f64::from),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read features {}", path.display()))
            }
        };

        tracing::info!(
            path = %path.display(),
            rows = matrix.nrows(),
            dimensions = matrix.ncols(),
            "Loaded feature index"
        );

        Ok(Self::new(matrix))
    }

    pub fn len(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.nrows() == 0
    }

    pub fn dimensions(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn row(&self, row: usize) -> Option<ArrayView1<'_, f64>> {
        (row < self.len()).then(|| self.matrix.row(row))
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }
}

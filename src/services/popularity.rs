use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    services::catalog::Catalog,
};

/// Picks a random handful of titles from the head of the catalog
///
/// The catalog is ordered by popularity, so the first `pool` rows are treated
/// as the popular set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopularitySampler {
    count: usize,
    pool: usize,
}

impl PopularitySampler {
    pub fn new(count: usize, pool: usize) -> Self {
        Self { count, pool }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Samples with the thread-local RNG
    pub fn sample(&self, catalog: &Catalog) -> AppResult<Vec<String>> {
        self.sample_with(catalog, &mut rand::thread_rng())
    }

    /// Returns `count` distinct titles drawn without replacement from the pool
    pub fn sample_with<R: Rng + ?Sized>(
        &self,
        catalog: &Catalog,
        rng: &mut R,
    ) -> AppResult<Vec<String>> {
        let available = self.pool.min(catalog.len());
        if self.count > available {
            return Err(AppError::ExhaustedPool {
                requested: self.count,
                available,
            });
        }

        let mut rows: Vec<usize> = (0..available).collect();
        rows.shuffle(rng);

        let mut seen = HashSet::with_capacity(self.count);
        let titles: Vec<String> = rows
            .into_iter()
            .filter_map(|row| catalog.get(row))
            .filter(|&entry| seen.insert(entry.title.as_str()))
            .take(self.count)
            .map(|entry| entry.title.clone())
            .collect();

        // Duplicate titles inside the pool can leave us short
        if titles.len() < self.count {
            return Err(AppError::ExhaustedPool {
                requested: self.count,
                available: titles.len(),
            });
        }

        Ok(titles)
    }
}

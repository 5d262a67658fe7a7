use anyhow::Context;
use std::collections::HashMap;
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogEntry, MovieSummary},
};

/// Static movie catalog, indexed by row position and by title
///
/// Loaded once at startup and never mutated. Row positions line up with the
/// rows of the feature matrix.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_title: HashMap<String, usize>,
}

/// Titles are stored with ampersands spelled out so that query strings do
/// not need escaping.
pub fn normalize_title(title: &str) -> String {
    title.replace('&', "and")
}

impl Catalog {
    /// Builds a catalog from already-parsed rows, normalizing titles
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let entries: Vec<CatalogEntry> = entries
            .into_iter()
            .map(|mut entry| {
                entry.title = normalize_title(&entry.title);
                entry
            })
            .collect();

        let mut by_title = HashMap::with_capacity(entries.len());
        for (row, entry) in entries.iter().enumerate() {
            if let Some(&first) = by_title.get(&entry.title) {
                tracing::warn!(
                    title = %entry.title,
                    first_row = first,
                    duplicate_row = row,
                    "Duplicate catalog title, keeping first row"
                );
                continue;
            }
            by_title.insert(entry.title.clone(), row);
        }

        Self { entries, by_title }
    }

    /// Loads the catalog from a CSV file with a header row
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open catalog {}", path.display()))?;

        let entries = reader
            .deserialize::<CatalogEntry>()
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to parse catalog {}", path.display()))?;

        let catalog = Self::from_entries(entries);

        tracing::info!(
            path = %path.display(),
            movies = catalog.len(),
            "Loaded movie catalog"
        );

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&CatalogEntry> {
        self.entries.get(row)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Exact, case-sensitive title lookup
    pub fn position(&self, title: &str) -> Option<usize> {
        self.by_title.get(title).copied()
    }

    /// Catalog data for a title, with the poster path expanded to a full URL
    pub fn movie_by_title(&self, title: &str, poster_base_url: &str) -> AppResult<MovieSummary> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "title must be a non-empty string".to_string(),
            ));
        }

        let entry = self
            .position(title)
            .and_then(|row| self.get(row))
            .ok_or_else(|| AppError::NotFound("Movie title not found".to_string()))?;

        let poster_path = entry
            .poster_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .ok_or_else(|| {
                AppError::InvalidData(format!("Catalog entry '{}' has no poster path", entry.title))
            })?;

        Ok(MovieSummary {
            title: entry.title.clone(),
            poster: format!("{}{}", poster_base_url, poster_path),
            imdb_id: entry.imdb_id.clone(),
            rating: entry.vote_average,
        })
    }
}

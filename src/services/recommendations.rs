use crate::{
    error::{AppError, AppResult},
    services::{context::ServiceContext, title_search},
};

/// Recommends titles similar to `title`
///
/// Resolves the title to its catalog row, asks the neighbor model for the
/// `n_neighbors` closest feature vectors and maps them back to titles.
/// The queried movie itself is always excluded, so at most
/// `n_neighbors - 1` titles are returned, closest first.
pub fn get_recommendations(context: &ServiceContext, title: &str) -> AppResult<Vec<String>> {
    let row = title_search::resolve(context.catalog(), title)?;

    let vector = context.features().row(row).ok_or_else(|| {
        AppError::Internal(format!("No feature vector for catalog row {}", row))
    })?;

    let model = context.model();
    let k = model.n_neighbors();

    let recommended: Vec<String> = model
        .kneighbors(vector, k)
        .into_iter()
        .filter(|neighbor| neighbor.row != row)
        .take(k.saturating_sub(1))
        .map(|neighbor| {
            context
                .catalog()
                .get(neighbor.row)
                .map(|entry| entry.title.clone())
                .ok_or_else(|| {
                    AppError::Internal(format!("Neighbor row {} outside catalog", neighbor.row))
                })
        })
        .collect::<AppResult<_>>()?;

    tracing::debug!(
        title = %title,
        row = row,
        results = recommended.len(),
        "Recommendations computed"
    );

    Ok(recommended)
}

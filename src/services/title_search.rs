use crate::{
    error::{AppError, AppResult},
    services::catalog::Catalog,
};

/// Number of fuzzy matches returned when no limit is configured
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// String similarity scorer used for fuzzy title search
///
/// Scores range from 0 (nothing in common) to 100 (identical after
/// preprocessing).
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, query: &str, candidate: &str) -> u32;
}

/// Partial token-sort ratio
///
/// Both strings are lowercased, stripped of punctuation and have their
/// tokens sorted, so word order does not matter. The shorter string is then
/// compared against every equally long window of the longer one and the best
/// window wins, so a query matching part of a title scores high. Windows are
/// scored with the Indel ratio `2 * LCS / (len_a + len_b)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialTokenSortScorer;

fn sorted_tokens(s: &str) -> Vec<char> {
    let cleaned: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect();

    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ").chars().collect()
}

/// Length of the longest common subsequence
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Indel similarity in `[0, 1]`
fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * lcs_len(a, b)) as f64 / total as f64
}

impl SimilarityScorer for PartialTokenSortScorer {
    fn score(&self, query: &str, candidate: &str) -> u32 {
        let a = sorted_tokens(query);
        let b = sorted_tokens(candidate);
        if a.is_empty() || b.is_empty() {
            return 0;
        }

        let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };

        let best = longer
            .windows(shorter.len())
            .map(|window| indel_ratio(&shorter, window))
            .fold(0.0_f64, f64::max);

        (best * 100.0).round() as u32
    }
}

/// Maps an exact title to its catalog row
pub fn resolve(catalog: &Catalog, title: &str) -> AppResult<usize> {
    if title.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "title must be a non-empty string".to_string(),
        ));
    }

    catalog
        .position(title)
        .ok_or_else(|| AppError::NotFound("Movie title not found".to_string()))
}

/// Fuzzy title search across the whole catalog
///
/// Returns at most `limit` titles ordered by descending score. Equal scores
/// keep catalog order. A blank query matches nothing.
pub fn search_titles(
    catalog: &Catalog,
    scorer: &dyn SimilarityScorer,
    query: &str,
    limit: usize,
) -> Vec<String> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(u32, &str)> = catalog
        .entries()
        .iter()
        .map(|entry| (scorer.score(query, &entry.title), entry.title.as_str()))
        .collect();

    // sort_by is stable, so ties stay in catalog order
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let matches: Vec<String> = scored
        .into_iter()
        .take(limit)
        .map(|(_, title)| title.to_string())
        .collect();

    tracing::debug!(query = %query, results = matches.len(), "Title search completed");

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogEntry;

    fn catalog(titles: &[&str]) -> Catalog {
        Catalog::from_entries(
            titles
                .iter()
                .enumerate()
                .map(|(i, title)| CatalogEntry {
                    id: i as i64,
                    title: title.to_string(),
                    poster_path: Some(format!("/{}.jpg", i)),
                    imdb_id: format!("tt{:07}", i),
                    vote_average: 7.0,
                })
                .collect(),
        )
    }

    #[test]
    fn test_identical_strings_score_100() {
        assert_eq!(PartialTokenSortScorer.score("Inception", "Inception"), 100);
    }

    #[test]
    fn test_score_ignores_case_punctuation_and_order() {
        assert_eq!(
            PartialTokenSortScorer.score("dark knight the", "The Dark Knight!"),
            100
        );
    }

    #[test]
    fn test_partial_match_scores_100() {
        assert_eq!(PartialTokenSortScorer.score("godfather", "The Godfather"), 100);
    }

    #[test]
    fn test_unrelated_strings_score_low() {
        assert!(PartialTokenSortScorer.score("zzzz", "Amelie") < 30);
    }

    #[test]
    fn test_window_scored_by_common_subsequence() {
        // LCS "bcd" of two 4-char strings: 2 * 3 / 8
        assert_eq!(PartialTokenSortScorer.score("abcd", "bcda"), 75);
        assert_eq!(PartialTokenSortScorer.score("abcdefgh", "cdefghab"), 75);
        assert_eq!(PartialTokenSortScorer.score("abcdefgh", "abcdexyz"), 63);
    }

    #[test]
    fn test_lcs_len() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(lcs_len(&chars("godfather"), &chars("goodfella")), 5);
        assert_eq!(lcs_len(&chars(""), &chars("heat")), 0);
        assert_eq!(lcs_len(&chars("heat"), &chars("heat")), 4);
    }

    #[test]
    fn test_empty_input_scores_zero() {
        assert_eq!(PartialTokenSortScorer.score("", "Heat"), 0);
        assert_eq!(PartialTokenSortScorer.score("!!!", "Heat"), 0);
    }

    #[test]
    fn test_resolve_exact_title() {
        let catalog = catalog(&["Heat", "Alien"]);
        assert_eq!(resolve(&catalog, "Alien").unwrap(), 1);
    }

    #[test]
    fn test_resolve_blank_title() {
        let catalog = catalog(&["Heat"]);
        assert!(matches!(resolve(&catalog, ""), Err(AppError::InvalidInput(_))));
        assert!(matches!(resolve(&catalog, "   "), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_resolve_unknown_title() {
        let catalog = catalog(&["Heat"]);
        assert!(matches!(
            resolve(&catalog, "Nonexistent Movie Title"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(resolve(&catalog, "heat"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_search_orders_by_score() {
        let catalog = catalog(&[
            "Amelie",
            "The Godfather Part II",
            "Goodfellas",
            "The Godfather",
            "Heat",
        ]);
        let scorer = PartialTokenSortScorer;
        let matches = search_titles(&catalog, &scorer, "godfather", 5);

        assert_eq!(matches.len(), 5);
        assert_eq!(matches[0], "The Godfather Part II");
        assert_eq!(matches[1], "The Godfather");

        let scores: Vec<u32> = matches
            .iter()
            .map(|title| scorer.score("godfather", title))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_search_respects_limit() {
        let catalog = catalog(&["Alien", "Aliens", "Alien 3", "Heat"]);
        let matches = search_titles(&catalog, &PartialTokenSortScorer, "alien", 2);
        assert_eq!(matches, vec!["Alien", "Aliens"]);
    }

    #[test]
    fn test_search_ranks_longest_common_subsequence_first() {
        let catalog = catalog(&["abcdexyz", "cdefghab"]);
        let matches = search_titles(&catalog, &PartialTokenSortScorer, "abcdefgh", 5);
        assert_eq!(matches, vec!["cdefghab", "abcdexyz"]);
    }

    #[test]
    fn test_search_blank_query() {
        let catalog = catalog(&["Alien"]);
        assert!(search_titles(&catalog, &PartialTokenSortScorer, "  ", 5).is_empty());
    }
}

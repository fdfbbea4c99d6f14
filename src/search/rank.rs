//! Filter and rank stage deriving the visible item list.
//!
//! The visible set is a pure function of the item list and the query: disabled
//! items are dropped, the rest are scored, non-matches are dropped, and the
//! survivors are ordered by descending score. Ties keep their original order
//! because the sort is stable.
//!
//! The result is recomputed on every call and never cached, since the query may
//! change several times within a single effect batch.

use super::scorer::{score, Scorer};
use crate::domain::{Item, ScoredItem};
use std::cmp::Ordering;

/// Computes the ordered, visible subset of `items` for `query`.
///
/// # Filtering Algorithm
///
/// 1. **Disabled Filter**: Skip items with `disabled == true`
/// 2. **Scoring**: Score each remaining value against the query
/// 3. **Match Filter**: Drop items scoring `0.0` or less
/// 4. **Ranking**: Stable sort by descending score
///
/// # Tracing
///
/// Creates a trace-level span with the item count and query length.
///
/// # Example
///
/// ```rust
/// use palette_machine::search::{visible_items, SkimScorer};
/// use palette_machine::Item;
///
/// let items = vec![Item::new("one"), Item::disabled("two"), Item::new("three")];
/// let visible = visible_items(&items, "", &SkimScorer::default());
/// let values: Vec<&str> = visible.iter().map(|s| s.value()).collect();
/// assert_eq!(values, ["one", "three"]);
/// ```
pub fn visible_items(items: &[Item], query: &str, scorer: &dyn Scorer) -> Vec<ScoredItem> {
    let _span = tracing::trace_span!(
        "visible_items",
        total_items = items.len(),
        query_len = query.len()
    )
    .entered();

    let mut scored: Vec<ScoredItem> = items
        .iter()
        .filter(|item| !item.disabled)
        .filter_map(|item| {
            let score = score(scorer, &item.value, query);
            (score > 0.0).then(|| ScoredItem {
                item: item.clone(),
                score,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    tracing::trace!(visible_count = scored.len(), "visible set computed");

    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SkimScorer;

    /// Scores by value length, so ties are easy to construct.
    struct LengthScorer;

    impl Scorer for LengthScorer {
        fn score(&self, value: &str, query: &str) -> f64 {
            if value.contains(query) {
                #[allow(clippy::cast_precision_loss)]
                let len = value.len() as f64;
                len
            } else {
                0.0
            }
        }
    }

    fn values(visible: &[ScoredItem]) -> Vec<&str> {
        visible.iter().map(ScoredItem::value).collect()
    }

    #[test]
    fn disabled_and_unmatched_items_are_excluded() {
        let items = vec![
            Item::new("alpha"),
            Item::disabled("alphabet"),
            Item::new("beta"),
        ];
        let visible = visible_items(&items, "alp", &SkimScorer::default());
        assert_eq!(values(&visible), ["alpha"]);
    }

    #[test]
    fn empty_values_are_never_visible() {
        let items = vec![Item::new(""), Item::new("x")];
        let visible = visible_items(&items, "", &SkimScorer::default());
        assert_eq!(values(&visible), ["x"]);
    }

    #[test]
    fn ranks_by_descending_score_keeping_input_order_on_ties() {
        let items = vec![
            Item::new("ab"),
            Item::new("abcd"),
            Item::new("ba"),
            Item::new("abc"),
            Item::new("cd"),
        ];
        let visible = visible_items(&items, "", &LengthScorer);
        assert_eq!(values(&visible), ["abcd", "abc", "ab", "ba", "cd"]);
    }

    #[test]
    fn is_deterministic() {
        let items: Vec<Item> = ["one", "two", "three", "four", "five"]
            .into_iter()
            .map(Item::new)
            .collect();
        let scorer = SkimScorer::default();
        let first = visible_items(&items, "o", &scorer);
        let second = visible_items(&items, "o", &scorer);
        assert_eq!(first, second);
    }
}

//! Scoring adapter around the fuzzy matcher.
//!
//! The engine only depends on the [`Scorer`] contract: a score of `0.0` means "no
//! match", larger scores mean better matches, and an empty query matches every
//! non-empty value. [`SkimScorer`] is the default implementation, backed by
//! `fuzzy-matcher`'s Skim V2 algorithm.
//!
//! Callers never invoke a scorer directly; they go through [`score`], which guards
//! against empty candidates and turns scorer failures into a zero score so that one
//! misbehaving candidate cannot hide the rest of the list.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Score given to every candidate when the query is empty.
///
/// A uniform score keeps the unfiltered listing in input order.
const EMPTY_QUERY_SCORE: f64 = 1.0;

/// Fuzzy scoring contract used by the filter/rank stage.
pub trait Scorer: Send + Sync {
    /// Scores `value` against `query`.
    ///
    /// Must return `0.0` for no match and a positive number otherwise. Must return
    /// a positive number for any non-empty `value` when `query` is empty.
    fn score(&self, value: &str, query: &str) -> f64;

    /// Character positions in `value` matched by `query`, used for highlighting.
    ///
    /// Scorers that cannot report positions return `None`.
    fn match_indices(&self, _value: &str, _query: &str) -> Option<Vec<usize>> {
        None
    }
}

/// Default scorer using the Skim V2 fuzzy matching algorithm.
///
/// Matching is smart-case: lowercase queries match case-insensitively, queries
/// containing uppercase letters match exactly.
///
/// # Example
///
/// ```rust
/// use palette_machine::search::{Scorer, SkimScorer};
///
/// let scorer = SkimScorer::default();
/// assert!(scorer.score("open file", "opf") > 0.0);
/// assert_eq!(scorer.score("open file", "xyz"), 0.0);
/// assert!(scorer.score("open file", "") > 0.0);
/// ```
#[derive(Default)]
pub struct SkimScorer {
    matcher: SkimMatcherV2,
}

impl fmt::Debug for SkimScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkimScorer").finish_non_exhaustive()
    }
}

impl Scorer for SkimScorer {
    fn score(&self, value: &str, query: &str) -> f64 {
        if query.is_empty() {
            return EMPTY_QUERY_SCORE;
        }

        // Skim reports a match of 0 for weak matches; shift so every match is positive.
        #[allow(clippy::cast_precision_loss)]
        self.matcher
            .fuzzy_match(value, query)
            .map_or(0.0, |raw| raw.max(0) as f64 + 1.0)
    }

    fn match_indices(&self, value: &str, query: &str) -> Option<Vec<usize>> {
        if query.is_empty() {
            return None;
        }
        self.matcher
            .fuzzy_indices(value, query)
            .map(|(_score, indices)| indices)
    }
}

/// Scores a candidate through `scorer`, enforcing the adapter guarantees.
///
/// - An empty `value` always scores `0.0`.
/// - A scorer that panics, or returns a NaN, infinite or negative score, is
///   treated as "no match" and logged at warn level.
///
/// # Example
///
/// ```rust
/// use palette_machine::search::{score, SkimScorer};
///
/// let scorer = SkimScorer::default();
/// assert_eq!(score(&scorer, "", ""), 0.0);
/// assert!(score(&scorer, "one", "") > 0.0);
/// ```
pub fn score(scorer: &dyn Scorer, value: &str, query: &str) -> f64 {
    if value.is_empty() {
        return 0.0;
    }

    match panic::catch_unwind(AssertUnwindSafe(|| scorer.score(value, query))) {
        Ok(result) if result.is_finite() && result >= 0.0 => result,
        Ok(result) => {
            tracing::warn!(
                value = %value,
                query = %query,
                score = result,
                "scorer returned an invalid score, excluding candidate"
            );
            0.0
        }
        Err(_) => {
            tracing::warn!(value = %value, query = %query, "scorer panicked, excluding candidate");
            0.0
        }
    }
}

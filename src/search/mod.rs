//! Fuzzy scoring and the filter/rank stage.
//!
//! # Modules
//!
//! - [`scorer`]: The [`Scorer`] contract, the Skim-backed default, and the guarded
//!   [`score`] entry point
//! - [`rank`]: [`visible_items`], deriving the ranked visible set

pub mod rank;
pub mod scorer;

pub use rank::visible_items;
pub use scorer::{score, Scorer, SkimScorer};

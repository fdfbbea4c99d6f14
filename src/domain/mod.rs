//! Domain layer for the palette engine.
//!
//! This module contains the core data types shared by every other layer,
//! independent of matching, state machine, or rendering concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`item`]: Item, group and scored-item models
//!
//! # Examples
//!
//! ```
//! use palette_machine::domain::{Group, Item, Result};
//!
//! fn seed() -> Result<(Vec<Item>, Vec<Group>)> {
//!     Ok((
//!         vec![Item::new("one"), Item::disabled("two")],
//!         vec![Group::new("numbers", ["one", "two"])],
//!     ))
//! }
//! ```

pub mod error;
pub mod item;

pub use error::{PaletteError, Result};
pub use item::{Group, Item, ScoredItem};

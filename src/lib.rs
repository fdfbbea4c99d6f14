//! Palette Machine: a keyboard-driven command palette selection engine.
//!
//! Palette Machine keeps one highlighted item consistent while a user types a
//! query, navigates with the keyboard and the host replaces the item list:
//! - Fuzzy filtering and ranking of items against the query
//! - Next/previous/first/last navigation with optional wraparound
//! - Group jumps with `Alt` and edge jumps with `Meta`
//! - Confirmation via `Enter` with a host change callback
//! - Accessibility attributes and a render-ready view model

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Replay Driver (main.rs)                            │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Keyboard interpretation                          │  ← Transitions
//! │  - Effect capture and dispatch                      │
//! └─────────────────────────────────────────────────────┘
//!         │                                     │
//! ┌───────────────────────┐       ┌───────────────────────┐
//! │ Search Layer          │       │ UI Layer              │
//! │ (search/)             │       │ (ui/)                 │
//! │ - Scorer seam         │       │ - ARIA attributes     │
//! │ - Visible set ranking │       │ - View model          │
//! └───────────────────────┘       └───────────────────────┘
//!         │                                     │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │  ← Core types
//! │  - Error types (domain/error)                       │
//! │  - Item and group model (domain/item)               │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing subscriber setup                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Selection state machine with event/effect model
//! - [`domain`]: Core domain types (Item, Group, errors)
//! - [`search`]: Scoring and visible set computation
//! - [`ui`]: Accessibility attributes and view model
//! - [`observability`]: Tracing subscriber setup
//!
//! # Configuration
//!
//! The engine can be configured from TOML:
//!
//! ```toml
//! loop = true
//! trace_level = "debug"
//!
//! [[items]]
//! value = "one"
//!
//! [[items]]
//! value = "three"
//! disabled = true
//!
//! [[groups]]
//! name = "first"
//! items = ["one", "two", "three", "four"]
//! ```
//!
//! # Examples
//!
//! ```rust
//! use palette_machine::{initialize, Config, Event, KeyEvent};
//!
//! let config = Config::from_toml_str(
//!     r#"
//!     loop = false
//!     items = [{ value = "one" }, { value = "two" }, { value = "three", disabled = true }]
//!     "#,
//! )?;
//!
//! let mut machine = initialize(&config, |item| println!("picked {}", item.value));
//! machine.send(Event::KeyDown { key_event: KeyEvent::new("ArrowDown") })?;
//! machine.send(Event::KeyDown { key_event: KeyEvent::new("ArrowDown") })?;
//! assert_eq!(machine.selected_index(), Some(1));
//! # Ok::<(), palette_machine::PaletteError>(())
//! ```
//!
//! # Key Design Decisions
//!
//! ## Value-Based Selection
//!
//! The selection is stored as an item value and resolved against the visible set
//! on read. The display index is always derived, so re-ranking never leaves the
//! index pointing at a different item.
//!
//! ## Atomic Dispatch
//!
//! A dispatch resolves the event and every raised follow-up on a working copy of
//! the context. The copy is committed only when the whole chain succeeds, and the
//! change callback runs after the commit.

pub mod app;
pub mod domain;
pub mod observability;
pub mod search;
pub mod ui;

pub use app::{CommandMachine, Dispatch, ElementIds, Event, KeyEvent};
pub use domain::{Group, Item, PaletteError, Result, ScoredItem};
pub use ui::PaletteView;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration loaded from TOML.
///
/// Every field is optional in the TOML source; missing fields fall back to
/// [`Config::default`].
///
/// # Example
///
/// ```rust
/// use palette_machine::Config;
///
/// let config = Config::from_toml_str(r#"list_id = "cmd-list""#)?;
/// assert_eq!(config.list_id, "cmd-list");
/// assert!(config.loop_navigation);
/// # Ok::<(), palette_machine::PaletteError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial item list. Values must be unique.
    pub items: Vec<Item>,

    /// Static group metadata for `Alt`-modified navigation.
    pub groups: Vec<Group>,

    /// Wraparound at the list edges. Default: `true`
    #[serde(rename = "loop")]
    pub loop_navigation: bool,

    /// Id of the list element.
    pub list_id: String,

    /// Id of the input element.
    pub input_id: String,

    /// Id of the label element.
    pub label_id: String,

    /// Tracing level filter.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let ids = ElementIds::default();
        Self {
            items: Vec::new(),
            groups: Vec::new(),
            loop_navigation: true,
            list_id: ids.list_id,
            input_id: ids.input_id,
            label_id: ids.label_id,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::Config`] if the TOML is malformed or two items share
    /// a value.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| PaletteError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::Io`] if the file cannot be read, or
    /// [`PaletteError::Config`] if its contents are invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Self::from_toml_str(&contents)
    }

    /// Element ids derived from the configured list, input and label ids.
    #[must_use]
    pub fn ids(&self) -> ElementIds {
        ElementIds::new(&self.list_id, &self.input_id, &self.label_id)
    }

    fn validate(&self) -> Result<()> {
        match domain::item::duplicate_value(&self.items) {
            Some(value) => Err(PaletteError::Config(format!("duplicate item value '{value}'"))),
            None => Ok(()),
        }
    }
}

/// Creates a machine over `items` with default options.
///
/// The first visible item is selected, the query is empty, looping is on and no
/// groups are defined. Use [`CommandMachine::with_groups`],
/// [`CommandMachine::with_loop`] and [`CommandMachine::with_scorer`] to adjust.
///
/// # Example
///
/// ```rust
/// use palette_machine::{create, ElementIds, Item};
///
/// let machine = create(
///     vec![Item::disabled("zero"), Item::new("one")],
///     ElementIds::default(),
///     |_| {},
/// );
/// assert_eq!(machine.selected_item(), Some(Item::new("one")));
/// ```
#[must_use]
pub fn create(
    items: Vec<Item>,
    ids: ElementIds,
    on_change: impl FnMut(&Item) + 'static,
) -> CommandMachine {
    CommandMachine::new(items, ids, on_change)
}

/// Creates a machine from configuration.
///
/// Applies the configured items, groups, loop flag and element ids. Tracing is
/// not initialized here; call [`observability::init_tracing`] first if wanted.
#[must_use]
pub fn initialize(config: &Config, on_change: impl FnMut(&Item) + 'static) -> CommandMachine {
    tracing::debug!(
        items = config.items.len(),
        groups = config.groups.len(),
        loop_navigation = config.loop_navigation,
        "initializing palette machine"
    );

    create(config.items.clone(), config.ids(), on_change)
        .with_groups(&config.groups)
        .with_loop(config.loop_navigation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_default_ids() {
        let config = Config::default();
        assert_eq!(config.ids(), ElementIds::default());
        assert!(config.loop_navigation);
        assert!(config.items.is_empty());
    }

    #[test]
    fn parses_loop_key_and_items() {
        let config = Config::from_toml_str(
            r#"
            loop = false
            trace_level = "debug"

            [[items]]
            value = "one"

            [[items]]
            value = "two"
            disabled = true

            [[groups]]
            name = "first"
            items = ["one", "two"]
            "#,
        )
        .unwrap();

        assert!(!config.loop_navigation);
        assert_eq!(config.items, vec![Item::new("one"), Item::disabled("two")]);
        assert_eq!(config.groups, vec![Group::new("first", ["one", "two"])]);
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
    }

    #[test]
    fn rejects_duplicate_values() {
        let result =
            Config::from_toml_str(r#"items = [{ value = "a" }, { value = "a", disabled = true }]"#);
        assert!(matches!(result, Err(PaletteError::Config(message)) if message.contains("'a'")));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(Config::from_toml_str("loop = "), Err(PaletteError::Config(_))));
    }

    #[test]
    fn initialize_applies_loop_flag() {
        let config = Config {
            items: vec![Item::new("a"), Item::new("b")],
            loop_navigation: false,
            ..Config::default()
        };
        let mut machine = initialize(&config, |_| {});
        machine.send(Event::JumpToLast).unwrap();
        machine
            .send(Event::KeyDown {
                key_event: KeyEvent::new("ArrowDown"),
            })
            .unwrap();
        assert_eq!(machine.selected_item(), Some(Item::new("b")));
        assert!(!machine.context().loop_navigation);
    }
}

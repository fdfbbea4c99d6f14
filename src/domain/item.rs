//! Palette item and group models.
//!
//! An [`Item`] is a single candidate shown in the palette. Its `value` is both the
//! display label and the identity used for selection, so values are expected to be
//! unique within one item list. A [`Group`] is static seed data naming a set of
//! values for coarse (alt-modified) navigation; it never changes when the live item
//! list is replaced.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A candidate entry in the palette.
///
/// Item lists are handed to the engine wholesale and never patched in place.
///
/// # Examples
///
/// ```
/// use palette_machine::Item;
///
/// let item = Item::new("open file");
/// assert_eq!(item.value, "open file");
/// assert!(!item.disabled);
///
/// let hidden = Item::disabled("delete everything");
/// assert!(hidden.disabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier and display label.
    pub value: String,
    /// Disabled items are never visible and never selectable.
    #[serde(default)]
    pub disabled: bool,
}

impl Item {
    /// Creates an enabled item.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            disabled: false,
        }
    }

    /// Creates a disabled item.
    #[must_use]
    pub fn disabled(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            disabled: true,
        }
    }
}

impl From<&str> for Item {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A named partition of item values used for group-jump navigation.
///
/// Membership is by value equality. A value belongs to the group whether or not an
/// item with that value currently exists in the live list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Display name of the group.
    pub name: String,
    /// Member values in declared order.
    #[serde(default)]
    pub items: Vec<String>,
}

impl Group {
    /// Creates a group from a name and its member values.
    ///
    /// # Examples
    ///
    /// ```
    /// use palette_machine::Group;
    ///
    /// let group = Group::new("first", ["one", "two", "three"]);
    /// assert!(group.contains("two"));
    /// assert!(!group.contains("four"));
    /// ```
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if `value` is declared as a member of this group.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.items.iter().any(|member| member == value)
    }
}

/// The first value that occurs more than once in `items`, if any.
///
/// # Examples
///
/// ```
/// use palette_machine::domain::item::duplicate_value;
/// use palette_machine::Item;
///
/// let items = vec![Item::new("a"), Item::disabled("b"), Item::new("b")];
/// assert_eq!(duplicate_value(&items), Some("b"));
/// assert_eq!(duplicate_value(&items[..2]), None);
/// ```
#[must_use]
pub fn duplicate_value(items: &[Item]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .map(|item| item.value.as_str())
        .find(|value| !seen.insert(*value))
}

/// An [`Item`] paired with its match score against the current query.
///
/// Scored items are transient: they are recomputed every time the visible set is
/// requested and never stored in the engine context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredItem {
    /// The underlying item.
    pub item: Item,
    /// Match score, always greater than zero for visible items.
    pub score: f64,
}

impl ScoredItem {
    /// The item's value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.item.value
    }
}

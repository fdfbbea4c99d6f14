//! Engine context and the patches that mutate it.
//!
//! This module defines [`CommandContext`], the single source of truth for a palette
//! instance: the full item list, the query, the selected value, the loop flag, the
//! static group index and the element ids handed to the renderer.
//!
//! # Selection Identity
//!
//! Selection is stored by value, not by position. A value keeps pointing at the
//! same item when the visible set is re-ranked after a keystroke, whereas a
//! position would silently move to a different item. The display index is derived
//! on demand by [`CommandContext::selected_index`].
//!
//! # Example
//!
//! ```rust
//! use palette_machine::app::state::{CommandContext, ElementIds};
//! use palette_machine::search::SkimScorer;
//! use palette_machine::Item;
//! use std::sync::Arc;
//!
//! let items = vec![Item::disabled("zero"), Item::new("one"), Item::new("two")];
//! let ctx = CommandContext::new(items, ElementIds::default(), Arc::new(SkimScorer::default()));
//! assert_eq!(ctx.selected.as_deref(), Some("one"));
//! assert_eq!(ctx.selected_index(), Some(0));
//! ```

use super::capture::Patch;
use crate::domain::{Group, Item, ScoredItem};
use crate::search::{visible_items, Scorer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Opaque element identifiers passed through to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementIds {
    pub list_id: String,
    pub input_id: String,
    pub label_id: String,
}

impl ElementIds {
    #[must_use]
    pub fn new(
        list_id: impl Into<String>,
        input_id: impl Into<String>,
        label_id: impl Into<String>,
    ) -> Self {
        Self {
            list_id: list_id.into(),
            input_id: input_id.into(),
            label_id: label_id.into(),
        }
    }
}

impl Default for ElementIds {
    fn default() -> Self {
        Self::new("palette-list", "palette-input", "palette-label")
    }
}

/// Ordered group metadata with constant-time membership checks.
///
/// Built once from the seed [`Group`] list. Group order is declaration order; a
/// value listed in several groups belongs to the first one.
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    groups: Vec<GroupEntry>,
}

#[derive(Debug, Clone)]
struct GroupEntry {
    name: String,
    members: HashSet<String>,
}

impl GroupIndex {
    /// Indexes `groups` in declared order.
    #[must_use]
    pub fn new(groups: &[Group]) -> Self {
        Self {
            groups: groups
                .iter()
                .map(|group| GroupEntry {
                    name: group.name.clone(),
                    members: group.items.iter().cloned().collect(),
                })
                .collect(),
        }
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group names in declared order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.name.as_str())
    }

    /// Position of the first group declaring `value` as a member.
    #[must_use]
    pub fn group_of(&self, value: &str) -> Option<usize> {
        self.groups.iter().position(|group| group.members.contains(value))
    }

    /// Returns `true` if the group at `index` declares `value` as a member.
    #[must_use]
    pub fn contains(&self, index: usize, value: &str) -> bool {
        self.groups
            .get(index)
            .is_some_and(|group| group.members.contains(value))
    }
}

/// Persistent state of one palette instance.
///
/// Mutated only through [`ContextPatch`]es applied by the machine's effect batches.
#[derive(Clone)]
pub struct CommandContext {
    /// Full candidate list; replaced wholesale, never patched.
    pub items: Vec<Item>,

    /// Current query text.
    pub search: String,

    /// Value of the selected item, `None` when nothing is visible.
    pub selected: Option<String>,

    /// Whether single-step navigation wraps at the list edges.
    pub loop_navigation: bool,

    /// Static grouping metadata for alt-modified navigation.
    pub groups: GroupIndex,

    /// Element ids for the rendering layer.
    pub ids: ElementIds,

    scorer: Arc<dyn Scorer>,
}

impl CommandContext {
    /// Creates a context selecting the first visible item, with an empty query,
    /// looping enabled and no groups.
    #[must_use]
    pub fn new(items: Vec<Item>, ids: ElementIds, scorer: Arc<dyn Scorer>) -> Self {
        let mut ctx = Self {
            items,
            search: String::new(),
            selected: None,
            loop_navigation: true,
            groups: GroupIndex::default(),
            ids,
            scorer,
        };
        ctx.selected = ctx.first_visible_value();
        ctx
    }

    /// The scorer used for every visible-set computation.
    #[must_use]
    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }

    pub(crate) fn set_scorer(&mut self, scorer: Arc<dyn Scorer>) {
        self.scorer = scorer;
    }

    /// The ranked visible set for the current items and query.
    #[must_use]
    pub fn visible_items(&self) -> Vec<ScoredItem> {
        visible_items(&self.items, &self.search, self.scorer())
    }

    /// The selected item, resolved against the visible set.
    ///
    /// Returns `None` if nothing is selected or the selected value is not
    /// currently visible.
    #[must_use]
    pub fn selected_item(&self) -> Option<Item> {
        let selected = self.selected.as_deref()?;
        self.visible_items()
            .into_iter()
            .find(|scored| scored.value() == selected)
            .map(|scored| scored.item)
    }

    /// Display position of the selected item within the visible set.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        self.visible_items()
            .iter()
            .position(|scored| scored.value() == selected)
    }

    /// Returns `true` if `value` is the resolved selection.
    #[must_use]
    pub fn is_selected(&self, value: &str) -> bool {
        self.selected_item().is_some_and(|item| item.value == value)
    }

    pub(crate) fn first_visible_value(&self) -> Option<String> {
        self.visible_items()
            .into_iter()
            .next()
            .map(|scored| scored.item.value)
    }
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("items", &self.items)
            .field("search", &self.search)
            .field("selected", &self.selected)
            .field("loop_navigation", &self.loop_navigation)
            .field("groups", &self.groups)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

/// A partial update to [`CommandContext`].
///
/// Only the fields that were set are merged.
///
/// # Example
///
/// ```rust
/// use palette_machine::app::state::ContextPatch;
///
/// let patch = ContextPatch::default()
///     .search("ope")
///     .selected(None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextPatch {
    items: Option<Vec<Item>>,
    search: Option<String>,
    selected: Option<Option<String>>,
}

impl ContextPatch {
    #[must_use]
    pub fn items(mut self, items: Vec<Item>) -> Self {
        self.items = Some(items);
        self
    }

    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn selected(mut self, selected: Option<String>) -> Self {
        self.selected = Some(selected);
        self
    }
}

impl Patch<CommandContext> for ContextPatch {
    fn apply_to(self, ctx: &mut CommandContext) {
        if let Some(items) = self.items {
            ctx.items = items;
        }
        if let Some(search) = self.search {
            ctx.search = search;
        }
        if let Some(selected) = self.selected {
            ctx.selected = selected;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SkimScorer;

    fn context(values: &[&str]) -> CommandContext {
        let items = values.iter().copied().map(Item::new).collect();
        CommandContext::new(items, ElementIds::default(), Arc::new(SkimScorer::default()))
    }

    #[test]
    fn starts_on_first_visible_item() {
        let items = vec![Item::disabled("a"), Item::new("b")];
        let ctx =
            CommandContext::new(items, ElementIds::default(), Arc::new(SkimScorer::default()));
        assert_eq!(ctx.selected.as_deref(), Some("b"));
        assert!(ctx.loop_navigation);
        assert!(ctx.search.is_empty());
    }

    #[test]
    fn empty_list_has_no_selection() {
        let ctx = context(&[]);
        assert_eq!(ctx.selected, None);
        assert_eq!(ctx.selected_item(), None);
        assert_eq!(ctx.selected_index(), None);
    }

    #[test]
    fn selection_resolves_only_against_visible_items() {
        let mut ctx = context(&["one", "two"]);
        ctx.selected = Some("missing".into());
        assert_eq!(ctx.selected_item(), None);
        assert!(!ctx.is_selected("missing"));

        ctx.selected = Some("two".into());
        assert_eq!(ctx.selected_index(), Some(1));
        assert!(ctx.is_selected("two"));
    }

    #[test]
    fn patch_merges_only_set_fields() {
        let mut ctx = context(&["one", "two"]);
        ContextPatch::default().search("tw").apply_to(&mut ctx);
        assert_eq!(ctx.search, "tw");
        assert_eq!(ctx.selected.as_deref(), Some("one"));

        ContextPatch::default()
            .items(vec![Item::new("three")])
            .selected(None)
            .apply_to(&mut ctx);
        assert_eq!(ctx.items, vec![Item::new("three")]);
        assert_eq!(ctx.selected, None);
        assert_eq!(ctx.search, "tw");
    }

    #[test]
    fn group_index_keeps_declared_order() {
        let index = GroupIndex::new(&[
            Group::new("first", ["one", "two"]),
            Group::new("second", ["two", "three"]),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.names().collect::<Vec<_>>(), ["first", "second"]);
        assert_eq!(index.group_of("two"), Some(0));
        assert_eq!(index.group_of("three"), Some(1));
        assert_eq!(index.group_of("four"), None);
        assert!(index.contains(1, "two"));
        assert!(!index.contains(5, "two"));
    }
}

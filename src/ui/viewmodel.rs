//! View model representing renderable palette state.
//!
//! This module defines an immutable view model computed from the engine context.
//! It contains no business logic, only display-ready data: the visible items with
//! their option attributes and fuzzy match highlight ranges, the input and list
//! attributes, and the derived selection index.
//!
//! # Example
//!
//! ```rust
//! use palette_machine::ui::PaletteView;
//! use palette_machine::{create, ElementIds, Event, Item};
//!
//! let mut machine = create(
//!     vec![Item::new("open file"), Item::new("close file")],
//!     ElementIds::default(),
//!     |_| {},
//! );
//! machine.send(Event::Search { value: "clo".into() })?;
//!
//! let view = PaletteView::from_context(machine.context());
//! assert_eq!(view.items.len(), 1);
//! assert_eq!(view.selected_index, Some(0));
//! assert!(view.items[0].attributes.selected);
//! # Ok::<(), palette_machine::PaletteError>(())
//! ```

use super::aria::{self, InputAttributes, ItemAttributes, ListAttributes};
use crate::app::state::CommandContext;
use crate::domain::ScoredItem;
use serde::Serialize;

/// Complete render-ready palette state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteView {
    /// Current query text.
    pub search: String,

    /// Attributes for the text input.
    pub input: InputAttributes,

    /// Attributes for the list container.
    pub list: ListAttributes,

    /// Visible items in rank order.
    pub items: Vec<ItemView>,

    /// Position of the selected item within `items`.
    pub selected_index: Option<usize>,
}

/// Display information for a single visible item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    /// Item value (also the label).
    pub value: String,

    /// Match score against the current query.
    pub score: f64,

    /// Option attributes.
    pub attributes: ItemAttributes,

    /// Matched character ranges as `(start, end)` with exclusive end.
    pub highlight_ranges: Vec<(usize, usize)>,
}

impl PaletteView {
    /// Computes the view model for `ctx`.
    #[must_use]
    pub fn from_context(ctx: &CommandContext) -> Self {
        let visible = ctx.visible_items();
        let selected_index = ctx
            .selected
            .as_deref()
            .and_then(|selected| visible.iter().position(|scored| scored.value() == selected));

        let items = visible
            .iter()
            .enumerate()
            .map(|(index, scored)| Self::compute_item(ctx, scored, Some(index) == selected_index))
            .collect();

        Self {
            search: ctx.search.clone(),
            input: aria::input_attributes(ctx),
            list: aria::list_attributes(ctx),
            items,
            selected_index,
        }
    }

    fn compute_item(ctx: &CommandContext, scored: &ScoredItem, is_selected: bool) -> ItemView {
        let highlight_ranges = ctx
            .scorer()
            .match_indices(scored.value(), &ctx.search)
            .map_or_else(Vec::new, |indices| coalesce(&indices));

        ItemView {
            value: scored.item.value.clone(),
            score: scored.score,
            attributes: ItemAttributes {
                role: "option",
                selected: is_selected,
                disabled: scored.item.disabled,
            },
            highlight_ranges,
        }
    }
}

/// Coalesces sorted match positions into contiguous `(start, end)` ranges.
fn coalesce(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();

    for &idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::ElementIds;
    use crate::domain::Item;
    use crate::search::SkimScorer;
    use std::sync::Arc;

    #[test]
    fn coalesces_consecutive_indices() {
        assert_eq!(coalesce(&[]), vec![]);
        assert_eq!(coalesce(&[0, 1, 2, 5, 7, 8]), vec![(0, 3), (5, 6), (7, 9)]);
    }

    #[test]
    fn view_marks_selection_and_highlights_matches() {
        let items = vec![Item::new("one"), Item::new("bone"), Item::disabled("ones")];
        let mut ctx =
            CommandContext::new(items, ElementIds::default(), Arc::new(SkimScorer::default()));
        ctx.search = "on".into();
        ctx.selected = Some("bone".into());

        let view = PaletteView::from_context(&ctx);
        let values: Vec<&str> = view.items.iter().map(|item| item.value.as_str()).collect();
        assert_eq!(values.len(), 2);
        assert!(values.contains(&"one") && values.contains(&"bone"));

        let bone = view.items.iter().find(|item| item.value == "bone").unwrap();
        assert!(bone.attributes.selected);
        assert_eq!(bone.highlight_ranges, vec![(1, 3)]);
        assert_eq!(view.items.iter().filter(|item| item.attributes.selected).count(), 1);
        assert_eq!(view.selected_index, view.items.iter().position(|item| item.value == "bone"));
    }

    #[test]
    fn empty_query_has_no_highlights() {
        let ctx = CommandContext::new(
            vec![Item::new("one")],
            ElementIds::default(),
            Arc::new(SkimScorer::default()),
        );
        let view = PaletteView::from_context(&ctx);
        assert!(view.items[0].highlight_ranges.is_empty());
        assert_eq!(view.selected_index, Some(0));
        assert_eq!(view.search, "");
    }
}

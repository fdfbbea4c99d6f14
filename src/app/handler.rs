//! Events and the transition handlers that process them.
//!
//! The machine has a single `ready` state; every variation comes from the event and
//! the context. [`Transition::for_event`] is the routing table from events to
//! handlers, and each [`Transition`] variant is a composed handler that queues
//! effects rather than mutating anything.
//!
//! # Event Types
//!
//! - **Navigation**: `Next`, `Prev`, `JumpToStart`, `JumpToLast`, `UpdateSelectedToIndex`
//! - **Input**: `Search`, `KeyDown`
//! - **Data**: `ItemsUpdate`
//! - **Selection**: `Change`
//!
//! # Handler Composition
//!
//! ```text
//! KeyDown ──raise──▶ Next ──capture──▶ JumpToLast ──capture──▶ UpdateSelectedToIndex(n)
//!                      │  (meta)
//!                      ├─capture──▶ MoveToGroup ──capture──▶ MoveBy   (alt, no group target)
//!                      │  (alt)
//!                      └─capture──▶ MoveBy
//! Search ──assign search──capture──▶ ResetSelection
//! ```

use super::actions::Action;
use super::capture::{Composer, Effects};
use super::keymap::{self, Command, KeyEvent};
use super::state::{CommandContext, ContextPatch};
use crate::domain::error::{PaletteError, Result};
use crate::domain::item::duplicate_value;
use crate::domain::{Item, ScoredItem};
use serde::{Deserialize, Serialize};

/// Events accepted by the machine.
///
/// Serialized with a `type` tag using the palette's wire names, for example
/// `{"type": "search", "value": "op"}` or
/// `{"type": "keydown", "keyEvent": {"key": "ArrowDown"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Moves selection forward; modifiers on the key event select the variant.
    #[serde(rename = "next")]
    Next {
        #[serde(rename = "keyEvent")]
        key_event: KeyEvent,
    },

    /// Moves selection backward; modifiers on the key event select the variant.
    #[serde(rename = "prev")]
    Prev {
        #[serde(rename = "keyEvent")]
        key_event: KeyEvent,
    },

    /// Selects the first visible item.
    #[serde(rename = "jump-to-start")]
    JumpToStart,

    /// Selects the last visible item.
    #[serde(rename = "jump-to-last")]
    JumpToLast,

    /// Selects the visible item at `index`; out-of-range indices are ignored.
    #[serde(rename = "update-selected-to-index")]
    UpdateSelectedToIndex {
        index: usize,
    },

    /// Replaces the query text.
    #[serde(rename = "search")]
    Search {
        value: String,
    },

    /// Replaces the full item list.
    #[serde(rename = "items.update")]
    ItemsUpdate {
        items: Vec<Item>,
    },

    /// Explicitly selects an item, e.g. from a pointer click.
    #[serde(rename = "change")]
    Change {
        item: Item,
    },

    /// A raw key press, routed through the keyboard interpreter.
    #[serde(rename = "keydown")]
    KeyDown {
        #[serde(rename = "keyEvent")]
        key_event: KeyEvent,
    },
}

impl Event {
    /// Wire name of the event type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Next { .. } => "next",
            Self::Prev { .. } => "prev",
            Self::JumpToStart => "jump-to-start",
            Self::JumpToLast => "jump-to-last",
            Self::UpdateSelectedToIndex { .. } => "update-selected-to-index",
            Self::Search { .. } => "search",
            Self::ItemsUpdate { .. } => "items.update",
            Self::Change { .. } => "change",
            Self::KeyDown { .. } => "keydown",
        }
    }

    /// The key event carried by `Next`, `Prev` and `KeyDown`.
    #[must_use]
    pub const fn key_event(&self) -> Option<&KeyEvent> {
        match self {
            Self::Next { key_event } | Self::Prev { key_event } | Self::KeyDown { key_event } => {
                Some(key_event)
            }
            _ => None,
        }
    }

    /// Decodes an event from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::InvalidEvent`] if the JSON is malformed or does not
    /// describe a known event shape.
    ///
    /// # Example
    ///
    /// ```rust
    /// use palette_machine::Event;
    ///
    /// let event = Event::from_json(r#"{"type":"search","value":"on"}"#)?;
    /// assert_eq!(event, Event::Search { value: "on".into() });
    /// assert!(Event::from_json(r#"{"type":"teleport"}"#).is_err());
    /// # Ok::<(), palette_machine::PaletteError>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PaletteError::InvalidEvent(e.to_string()))
    }
}

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Composed transition handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// `next`/`prev`: dispatch on the key event's modifiers.
    Navigate(Direction),
    /// Select the first visible item.
    JumpToStart,
    /// Select the last visible item.
    JumpToLast,
    /// Select the visible item at a position.
    UpdateSelectedToIndex(usize),
    /// Move to the adjacent visible item, honoring the loop flag.
    MoveBy(Direction),
    /// Move to the first visible member of the adjacent group.
    MoveToGroup(Direction),
    /// Select the first visible item, or nothing if the visible set is empty.
    ResetSelection,
    /// Interpret a raw key press.
    KeyDown,
    /// Replace the query.
    Search,
    /// Replace the item list.
    ItemsUpdate,
    /// Select an item explicitly and notify the host.
    Change,
}

impl Transition {
    /// The handler that processes `event`.
    #[must_use]
    pub const fn for_event(event: &Event) -> Self {
        match event {
            Event::Next { .. } => Self::Navigate(Direction::Forward),
            Event::Prev { .. } => Self::Navigate(Direction::Backward),
            Event::JumpToStart => Self::JumpToStart,
            Event::JumpToLast => Self::JumpToLast,
            Event::UpdateSelectedToIndex { index } => Self::UpdateSelectedToIndex(*index),
            Event::Search { .. } => Self::Search,
            Event::ItemsUpdate { .. } => Self::ItemsUpdate,
            Event::Change { .. } => Self::Change,
            Event::KeyDown { .. } => Self::KeyDown,
        }
    }
}

impl Composer for Transition {
    type Context = CommandContext;
    type Event = Event;
    type Patch = ContextPatch;
    type Action = Action;

    fn compose(&self, ctx: &CommandContext, event: &Event, fx: &mut Effects<Self>) -> Result<()> {
        let _span =
            tracing::trace_span!("compose", handler = ?self, event = event.name()).entered();

        match self {
            Self::Navigate(direction) => navigate(*direction, event, fx),
            Self::JumpToStart => fx.capture(Self::UpdateSelectedToIndex(0)),
            Self::JumpToLast => {
                let count = ctx.visible_items().len();
                if count == 0 {
                    tracing::debug!("no visible items, jump to last ignored");
                } else {
                    fx.capture(Self::UpdateSelectedToIndex(count - 1));
                }
            }
            Self::UpdateSelectedToIndex(index) => {
                match ctx.visible_items().into_iter().nth(*index) {
                    Some(scored) => select(fx, &scored),
                    None => {
                        tracing::debug!(index = index, "index outside visible set, selection kept");
                    }
                }
            }
            Self::MoveBy(direction) => move_by(ctx, *direction, fx),
            Self::MoveToGroup(direction) => {
                let visible = ctx.visible_items();
                match group_jump_target(ctx, &visible, *direction) {
                    Some(target) => select(fx, target),
                    None => {
                        tracing::debug!(
                            direction = ?direction,
                            "no group target, falling back to item move"
                        );
                        fx.capture(Self::MoveBy(*direction));
                    }
                }
            }
            Self::ResetSelection => {
                fx.assign(ContextPatch::default().selected(ctx.first_visible_value()));
            }
            Self::KeyDown => key_down(ctx, event, fx),
            Self::Search => {
                let Event::Search { value } = event else {
                    return Err(mismatch(self, event));
                };
                fx.assign(ContextPatch::default().search(value.clone()));
                fx.capture(Self::ResetSelection);
            }
            Self::ItemsUpdate => {
                let Event::ItemsUpdate { items } = event else {
                    return Err(mismatch(self, event));
                };
                if let Some(value) = duplicate_value(items) {
                    return Err(PaletteError::InvalidEvent(format!(
                        "items.update lists `{value}` more than once"
                    )));
                }
                fx.assign(ContextPatch::default().items(items.clone()).search(""));
                fx.capture(Self::ResetSelection);
            }
            Self::Change => {
                let Event::Change { item } = event else {
                    return Err(mismatch(self, event));
                };
                let visible = ctx.visible_items();
                match visible.iter().find(|scored| scored.value() == item.value) {
                    Some(scored) => {
                        select(fx, scored);
                        fx.exec(Action::NotifyChange(scored.item.clone()));
                    }
                    None => {
                        tracing::debug!(
                            value = %item.value,
                            "changed item is not visible, ignored"
                        );
                    }
                }
            }
        }

        Ok(())
    }
}

fn mismatch(handler: &Transition, event: &Event) -> PaletteError {
    PaletteError::InvalidEvent(format!("{handler:?} handler cannot process `{}`", event.name()))
}

fn select(fx: &mut Effects<Transition>, target: &ScoredItem) {
    fx.assign(ContextPatch::default().selected(Some(target.item.value.clone())));
}

fn navigate(direction: Direction, event: &Event, fx: &mut Effects<Transition>) {
    fx.exec(Action::PreventDefault);

    let (meta, alt) = event.key_event().map_or((false, false), |key| (key.meta, key.alt));

    if meta {
        match direction {
            Direction::Forward => fx.capture(Transition::JumpToLast),
            Direction::Backward => fx.capture(Transition::UpdateSelectedToIndex(0)),
        }
    } else if alt {
        fx.capture(Transition::MoveToGroup(direction));
    } else {
        fx.capture(Transition::MoveBy(direction));
    }
}

fn move_by(ctx: &CommandContext, direction: Direction, fx: &mut Effects<Transition>) {
    let visible = ctx.visible_items();
    let Some(position) = ctx
        .selected
        .as_deref()
        .and_then(|selected| visible.iter().position(|scored| scored.value() == selected))
    else {
        tracing::debug!(selected = ?ctx.selected, "selection not visible, move ignored");
        return;
    };

    let last = visible.len() - 1;
    let target = match direction {
        Direction::Forward if position < last => Some(position + 1),
        Direction::Forward => ctx.loop_navigation.then_some(0),
        Direction::Backward if position > 0 => Some(position - 1),
        Direction::Backward => ctx.loop_navigation.then_some(last),
    };

    match target {
        Some(index) => select(fx, &visible[index]),
        None => tracing::trace!(position = position, "at list edge without loop, move ignored"),
    }
}

/// First visible member of the nearest group in `direction` that has one.
fn group_jump_target<'a>(
    ctx: &CommandContext,
    visible: &'a [ScoredItem],
    direction: Direction,
) -> Option<&'a ScoredItem> {
    if ctx.groups.is_empty() {
        return None;
    }
    let current = ctx.groups.group_of(ctx.selected.as_deref()?)?;
    let first_visible_in =
        move |group: usize| {
            visible
                .iter()
                .find(|scored| ctx.groups.contains(group, scored.value()))
        };

    match direction {
        Direction::Forward => (current + 1..ctx.groups.len()).find_map(first_visible_in),
        Direction::Backward => (0..current).rev().find_map(first_visible_in),
    }
}

fn key_down(ctx: &CommandContext, event: &Event, fx: &mut Effects<Transition>) {
    let Some(key_event) = event.key_event() else {
        return;
    };
    let Some(command) = keymap::interpret(key_event) else {
        tracing::trace!(
            key = %key_event.key,
            prevented = key_event.default_prevented,
            "key not handled"
        );
        return;
    };

    if command.prevents_default() {
        fx.exec(Action::PreventDefault);
    }

    match command {
        Command::Next => fx.raise(Event::Next {
            key_event: key_event.clone(),
        }),
        Command::Prev => fx.raise(Event::Prev {
            key_event: key_event.clone(),
        }),
        Command::JumpToStart => fx.raise(Event::JumpToStart),
        Command::JumpToLast => fx.raise(Event::JumpToLast),
        Command::Confirm => match ctx.selected_item() {
            Some(item) => fx.exec(Action::NotifyChange(item)),
            None => tracing::debug!("nothing selected to confirm"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::capture::resolve;
    use crate::app::state::ElementIds;
    use crate::search::SkimScorer;
    use std::sync::Arc;

    fn context(values: &[&str]) -> CommandContext {
        let items = values.iter().copied().map(Item::new).collect();
        CommandContext::new(items, ElementIds::default(), Arc::new(SkimScorer::default()))
    }

    fn run(ctx: &mut CommandContext, event: &Event) -> (Vec<Event>, Vec<Action>) {
        let batch = resolve(&Transition::for_event(event), ctx, event).unwrap();
        (batch.raised, batch.actions)
    }

    #[test]
    fn keydown_raises_navigation_without_moving() {
        let mut ctx = context(&["one", "two"]);
        let event = Event::KeyDown {
            key_event: KeyEvent::new("ArrowDown"),
        };
        let (raised, actions) = run(&mut ctx, &event);
        assert_eq!(raised, vec![Event::Next { key_event: KeyEvent::new("ArrowDown") }]);
        assert!(actions.is_empty());
        assert_eq!(ctx.selected.as_deref(), Some("one"));
    }

    #[test]
    fn keydown_home_and_end_prevent_default() {
        let mut ctx = context(&["one", "two"]);
        let (raised, actions) = run(&mut ctx, &Event::KeyDown { key_event: KeyEvent::new("End") });
        assert_eq!(raised, vec![Event::JumpToLast]);
        assert_eq!(actions, vec![Action::PreventDefault]);

        let (raised, _) = run(&mut ctx, &Event::KeyDown { key_event: KeyEvent::new("Home") });
        assert_eq!(raised, vec![Event::JumpToStart]);
    }

    #[test]
    fn next_prevents_default_and_moves() {
        let mut ctx = context(&["one", "two"]);
        let (_, actions) = run(&mut ctx, &Event::Next { key_event: KeyEvent::new("ArrowDown") });
        assert_eq!(actions, vec![Action::PreventDefault]);
        assert_eq!(ctx.selected.as_deref(), Some("two"));
    }

    #[test]
    fn search_resets_selection_against_new_query() {
        let mut ctx = context(&["alpha", "beta", "gamma"]);
        ctx.selected = Some("gamma".into());
        run(&mut ctx, &Event::Search { value: "bet".into() });
        assert_eq!(ctx.search, "bet");
        assert_eq!(ctx.selected.as_deref(), Some("beta"));

        run(&mut ctx, &Event::Search { value: "zzz".into() });
        assert_eq!(ctx.selected, None);
    }

    #[test]
    fn update_selected_to_index_out_of_range_is_noop() {
        let mut ctx = context(&["one", "two"]);
        run(&mut ctx, &Event::UpdateSelectedToIndex { index: 9 });
        assert_eq!(ctx.selected.as_deref(), Some("one"));
        run(&mut ctx, &Event::UpdateSelectedToIndex { index: 1 });
        assert_eq!(ctx.selected.as_deref(), Some("two"));
    }

    #[test]
    fn change_to_invisible_item_is_ignored() {
        let mut ctx = context(&["one", "two"]);
        let (_, actions) = run(&mut ctx, &Event::Change { item: Item::new("nine") });
        assert!(actions.is_empty());
        assert_eq!(ctx.selected.as_deref(), Some("one"));
    }

    #[test]
    fn mismatched_event_is_a_programming_error() {
        let mut ctx = context(&["one"]);
        let event = Event::JumpToStart;
        let result = resolve(&Transition::Search, &mut ctx, &event);
        assert!(matches!(result, Err(PaletteError::InvalidEvent(_))));
    }

    #[test]
    fn events_use_wire_names() {
        let event = Event::from_json(r#"{"type":"items.update","items":[{"value":"a"}]}"#).unwrap();
        assert_eq!(event, Event::ItemsUpdate { items: vec![Item::new("a")] });
        assert_eq!(event.name(), "items.update");

        let event = Event::from_json(
            r#"{"type":"next","keyEvent":{"key":"ArrowDown","altKey":true}}"#,
        )
        .unwrap();
        assert!(event.key_event().is_some_and(|key| key.alt));
        assert_eq!(Event::from_json(r#"{"type":"jump-to-last"}"#).unwrap(), Event::JumpToLast);
    }

    #[test]
    fn malformed_events_are_rejected() {
        assert!(matches!(Event::from_json("{"), Err(PaletteError::InvalidEvent(_))));
        assert!(matches!(
            Event::from_json(r#"{"type":"search"}"#),
            Err(PaletteError::InvalidEvent(_))
        ));
    }

    #[test]
    fn items_update_with_repeated_value_is_rejected() {
        let mut ctx = context(&["one", "two"]);
        let event = Event::ItemsUpdate {
            items: vec![Item::new("a"), Item::disabled("a"), Item::new("b")],
        };

        let err = resolve(&Transition::for_event(&event), &mut ctx, &event).err().unwrap();

        assert!(matches!(err, PaletteError::InvalidEvent(message) if message.contains("`a`")));
        assert_eq!(ctx.items, vec![Item::new("one"), Item::new("two")]);
        assert_eq!(ctx.selected.as_deref(), Some("one"));
    }
}

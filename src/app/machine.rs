//! The selection state machine.
//!
//! [`CommandMachine`] owns the [`CommandContext`] and the host's change callback.
//! Every call to [`CommandMachine::send`] runs to completion before returning:
//!
//! 1. The event is routed to its [`Transition`] and resolved on a working copy of
//!    the context
//! 2. Raised follow-up events are processed in FIFO order on the same copy
//! 3. The copy is committed
//! 4. Queued actions run in order (default-prevented reporting, change callback)
//!
//! If any step before the commit fails, the committed context is untouched and no
//! action runs.
//!
//! # Example
//!
//! ```rust
//! use palette_machine::app::keymap::KeyEvent;
//! use palette_machine::{create, ElementIds, Event, Item};
//!
//! let items = vec![Item::new("one"), Item::new("two")];
//! let mut machine = create(items, ElementIds::default(), |item| println!("chose {}", item.value));
//!
//! machine.send(Event::KeyDown { key_event: KeyEvent::new("ArrowDown") })?;
//! assert_eq!(machine.selected_item().map(|item| item.value), Some("two".to_string()));
//!
//! let dispatch = machine.send(Event::KeyDown { key_event: KeyEvent::new("Enter") })?;
//! assert!(dispatch.default_prevented);
//! assert_eq!(dispatch.changed, vec![Item::new("two")]);
//! # Ok::<(), palette_machine::PaletteError>(())
//! ```

use super::actions::Action;
use super::capture::{self, Composer};
use super::handler::{Event, Transition};
use super::keymap::KeyEvent;
use super::state::{CommandContext, ElementIds, GroupIndex};
use crate::domain::error::{PaletteError, Result};
use crate::domain::{Group, Item, ScoredItem};
use crate::search::{Scorer, SkimScorer};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Maximum number of raised events processed within one dispatch.
pub const MAX_RAISE_DEPTH: usize = 50;

/// Host callback invoked with the confirmed or explicitly chosen item.
pub type ChangeCallback = Box<dyn FnMut(&Item)>;

/// Summary of one completed dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dispatch {
    /// Whether the originating key event's default action was claimed.
    pub default_prevented: bool,
    /// Items passed to the change callback, in order.
    pub changed: Vec<Item>,
    /// Events processed, counting the external event and every raised one.
    pub events_processed: usize,
}

/// A palette selection engine instance.
pub struct CommandMachine {
    context: CommandContext,
    on_change: ChangeCallback,
}

impl CommandMachine {
    /// Creates a machine selecting the first visible item, with an empty query,
    /// looping enabled, no groups and the default [`SkimScorer`].
    #[must_use]
    pub fn new(items: Vec<Item>, ids: ElementIds, on_change: impl FnMut(&Item) + 'static) -> Self {
        Self {
            context: CommandContext::new(items, ids, Arc::new(SkimScorer::default())),
            on_change: Box::new(on_change),
        }
    }

    /// Sets the static group metadata used by alt-modified navigation.
    #[must_use]
    pub fn with_groups(mut self, groups: &[Group]) -> Self {
        self.context.groups = GroupIndex::new(groups);
        tracing::debug!(
            groups = ?self.context.groups.names().collect::<Vec<_>>(),
            "group index built"
        );
        self
    }

    /// Enables or disables wraparound at the list edges.
    #[must_use]
    pub fn with_loop(mut self, loop_navigation: bool) -> Self {
        self.context.loop_navigation = loop_navigation;
        self
    }

    /// Replaces the scorer and reselects the first visible item.
    #[must_use]
    pub fn with_scorer(mut self, scorer: impl Scorer + 'static) -> Self {
        self.context.set_scorer(Arc::new(scorer));
        self.context.selected = self.context.first_visible_value();
        self
    }

    /// Read-only view of the committed context.
    #[must_use]
    pub const fn context(&self) -> &CommandContext {
        &self.context
    }

    /// The ranked visible set.
    #[must_use]
    pub fn visible_items(&self) -> Vec<ScoredItem> {
        self.context.visible_items()
    }

    /// The selected item, resolved against the visible set.
    #[must_use]
    pub fn selected_item(&self) -> Option<Item> {
        self.context.selected_item()
    }

    /// Display position of the selected item.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.context.selected_index()
    }

    /// Processes `event` and everything it raises, then runs queued actions.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::RaiseLimitExceeded`] or
    /// [`PaletteError::CaptureDepthExceeded`] for runaway handler chains, and
    /// [`PaletteError::InvalidEvent`] if a handler receives an event it cannot
    /// process. The committed context is unchanged on error.
    pub fn send(&mut self, event: Event) -> Result<Dispatch> {
        let event_name = event.name();
        let _span = tracing::debug_span!("send", event = event_name).entered();

        let mut working = self.context.clone();
        let (actions, events_processed) =
            drain(&mut working, event, event_name, Transition::for_event)?;

        if working.selected != self.context.selected {
            tracing::debug!(
                from = ?self.context.selected,
                to = ?working.selected,
                "selection changed"
            );
        }
        self.context = working;

        let mut dispatch = Dispatch {
            events_processed,
            ..Dispatch::default()
        };
        for action in actions {
            match action {
                Action::PreventDefault => dispatch.default_prevented = true,
                Action::NotifyChange(item) => {
                    tracing::debug!(value = %item.value, "notifying change");
                    (self.on_change)(&item);
                    dispatch.changed.push(item);
                }
            }
        }

        Ok(dispatch)
    }

    /// Dispatches a raw key press, marking `key_event` as default-prevented if the
    /// machine claimed it.
    ///
    /// # Errors
    ///
    /// Same as [`CommandMachine::send`].
    pub fn send_key(&mut self, key_event: &mut KeyEvent) -> Result<Dispatch> {
        let dispatch = self.send(Event::KeyDown {
            key_event: key_event.clone(),
        })?;
        if dispatch.default_prevented {
            key_event.prevent_default();
        }
        Ok(dispatch)
    }
}

impl fmt::Debug for CommandMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandMachine")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Resolves `event` and its raised follow-ups in FIFO order on `ctx`.
///
/// Returns the queued actions and the number of events processed.
fn drain<H, F>(
    ctx: &mut H::Context,
    event: H::Event,
    event_name: &'static str,
    route: F,
) -> Result<(Vec<H::Action>, usize)>
where
    H: Composer,
    F: Fn(&H::Event) -> H,
{
    let mut queue = VecDeque::from([event]);
    let mut actions = Vec::new();
    let mut raised_total = 0;
    let mut processed = 0;

    while let Some(current) = queue.pop_front() {
        processed += 1;
        let batch = capture::resolve(&route(&current), ctx, &current)?;
        actions.extend(batch.actions);

        raised_total += batch.raised.len();
        if raised_total > MAX_RAISE_DEPTH {
            tracing::error!(
                event = event_name,
                limit = MAX_RAISE_DEPTH,
                "raise limit exceeded, dispatch discarded"
            );
            return Err(PaletteError::RaiseLimitExceeded {
                limit: MAX_RAISE_DEPTH,
                event: event_name,
            });
        }
        queue.extend(batch.raised);
    }

    Ok((actions, processed))
}

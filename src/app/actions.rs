//! Side effects queued by transition handlers.
//!
//! This module defines the [`Action`] type, the payload of the `exec` effect. Actions
//! bridge pure transition logic and the outside world: they run only after a
//! dispatch has fully resolved and its context has been committed, in the order
//! they were queued.
//!
//! # Example
//!
//! ```rust
//! use palette_machine::app::Action;
//! use palette_machine::Item;
//!
//! let actions = vec![
//!     Action::PreventDefault,
//!     Action::NotifyChange(Item::new("open file")),
//! ];
//! ```

use crate::domain::Item;

/// Side effects executed by the machine once a dispatch commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Marks the originating key event's default action as handled.
    ///
    /// Reported to the host through [`Dispatch::default_prevented`](super::machine::Dispatch).
    PreventDefault,

    /// Invokes the caller's change callback with the chosen item.
    ///
    /// Queued when the user confirms the selection (`Enter`) or picks an item
    /// directly (pointer click).
    NotifyChange(Item),
}

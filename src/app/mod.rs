//! Application layer: the selection state machine and its building blocks.
//!
//! This module sits between the host (which delivers key presses, text changes and
//! list replacements) and the search layer (which computes the visible set). It
//! implements the event-driven flow that keeps a single selection consistent under
//! interleaved typing and navigation.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Key Event → keymap → Event → Transition → Effects → Context Commit → Actions
//!                        ↑                      │
//!                        └────── raise ─────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects executed after a dispatch commits
//! - [`capture`]: Effect composition for transition handlers
//! - [`handler`]: Events and the transition handlers that process them
//! - [`keymap`]: Keyboard command interpretation
//! - [`machine`]: The machine that owns the context and runs dispatches
//! - [`state`]: Engine context and context patches
//!
//! # Example
//!
//! ```rust
//! use palette_machine::app::{CommandMachine, Event};
//! use palette_machine::{ElementIds, Item};
//!
//! let mut machine = CommandMachine::new(vec![Item::new("one")], ElementIds::default(), |_| {});
//! machine.send(Event::Search { value: "on".into() })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod actions;
pub mod capture;
pub mod handler;
pub mod keymap;
pub mod machine;
pub mod state;

pub use actions::Action;
pub use handler::{Direction, Event, Transition};
pub use keymap::{interpret, Command, Key, KeyEvent};
pub use machine::{ChangeCallback, CommandMachine, Dispatch};
pub use state::{CommandContext, ContextPatch, ElementIds, GroupIndex};

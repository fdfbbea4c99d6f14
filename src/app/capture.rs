//! Effect composition for transition handlers.
//!
//! A transition handler often wants to do several things at once: update a few
//! context fields, emit a follow-up event, notify the host, or delegate part of the
//! work to another handler. This module lets a handler describe all of that
//! imperatively while the machine still applies it as one ordered batch.
//!
//! # Architecture
//!
//! ```text
//! Composer::compose(ctx, event, &mut Effects)   ← decide (pure, runs once)
//!         │
//!         ▼
//! [Assign | Raise | Exec | Capture(nested)]      ← queued effects
//!         │
//!         ▼
//! resolve(): apply in queued order               ← do
//!   Assign  → merge patch into the working context
//!   Raise   → append to the batch's raised events
//!   Exec    → append to the batch's actions
//!   Capture → compose the nested handler against the
//!             working context and splice its effects here
//! ```
//!
//! Handlers never mutate anything themselves, so a handler cannot apply half its
//! effects and then branch on the result. A nested handler does observe the
//! assignments queued before it in the same batch, which is what lets a handler
//! set the query and then capture a "select first visible item" step.
//!
//! # Example
//!
//! ```rust
//! use palette_machine::app::capture::{resolve, Composer, Effects, Patch};
//! use palette_machine::Result;
//!
//! struct Add(i32);
//!
//! impl Patch<i32> for Add {
//!     fn apply_to(self, ctx: &mut i32) {
//!         *ctx += self.0;
//!     }
//! }
//!
//! enum Step {
//!     Add(i32),
//!     Twice(i32),
//! }
//!
//! impl Composer for Step {
//!     type Context = i32;
//!     type Event = ();
//!     type Patch = Add;
//!     type Action = ();
//!
//!     fn compose(&self, _ctx: &i32, _event: &(), fx: &mut Effects<Self>) -> Result<()> {
//!         match self {
//!             Step::Add(n) => fx.assign(Add(*n)),
//!             Step::Twice(n) => {
//!                 fx.capture(Step::Add(*n));
//!                 fx.capture(Step::Add(*n));
//!             }
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut total = 1;
//! resolve(&Step::Twice(5), &mut total, &())?;
//! assert_eq!(total, 11);
//! # Ok::<(), palette_machine::PaletteError>(())
//! ```

use crate::domain::error::{PaletteError, Result};
use std::fmt;

/// Maximum nesting of `capture` within a single handler expansion.
pub const MAX_CAPTURE_DEPTH: usize = 50;

/// A partial context update queued by [`Effects::assign`].
pub trait Patch<C> {
    /// Merges this patch into `ctx`.
    fn apply_to(self, ctx: &mut C);
}

/// A composed transition handler.
///
/// Implementors are usually small enums naming each handler, so that nested
/// handlers can be queued as plain values.
pub trait Composer: Sized {
    /// State the handler reads and the batch mutates.
    type Context;
    /// Events the machine dispatches; also the type of raised events.
    type Event;
    /// Context merge queued by `assign`.
    type Patch: Patch<Self::Context>;
    /// Side effect queued by `exec`.
    type Action;

    /// Decides what to do for `event` given `ctx`, queueing effects on `fx`.
    ///
    /// # Errors
    ///
    /// Any error aborts the whole batch.
    fn compose(
        &self,
        ctx: &Self::Context,
        event: &Self::Event,
        fx: &mut Effects<Self>,
    ) -> Result<()>;
}

/// One queued effect.
pub enum Effect<H: Composer> {
    /// Merge a patch into the context.
    Assign(H::Patch),
    /// Emit a follow-up event after the current batch completes.
    Raise(H::Event),
    /// Run a side effect once the dispatch commits.
    Exec(H::Action),
    /// Expand a nested handler at this position.
    Capture(H),
}

impl<H> fmt::Debug for Effect<H>
where
    H: Composer + fmt::Debug,
    H::Patch: fmt::Debug,
    H::Event: fmt::Debug,
    H::Action: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign(patch) => f.debug_tuple("Assign").field(patch).finish(),
            Self::Raise(event) => f.debug_tuple("Raise").field(event).finish(),
            Self::Exec(action) => f.debug_tuple("Exec").field(action).finish(),
            Self::Capture(handler) => f.debug_tuple("Capture").field(handler).finish(),
        }
    }
}

/// Ordered effect queue handed to [`Composer::compose`].
pub struct Effects<H: Composer> {
    queue: Vec<Effect<H>>,
}

impl<H: Composer> Effects<H> {
    const fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a context merge.
    pub fn assign(&mut self, patch: H::Patch) {
        self.queue.push(Effect::Assign(patch));
    }

    /// Queues a follow-up event.
    pub fn raise(&mut self, event: H::Event) {
        self.queue.push(Effect::Raise(event));
    }

    /// Queues a side effect.
    pub fn exec(&mut self, action: H::Action) {
        self.queue.push(Effect::Exec(action));
    }

    /// Queues the expansion of a nested handler.
    pub fn capture(&mut self, handler: H) {
        self.queue.push(Effect::Capture(handler));
    }

    /// Number of effects queued so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing has been queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Output of [`resolve`]: everything the batch produced besides context changes.
pub struct Batch<H: Composer> {
    /// Raised events in queued order.
    pub raised: Vec<H::Event>,
    /// Side effects in queued order.
    pub actions: Vec<H::Action>,
}

impl<H: Composer> Default for Batch<H> {
    fn default() -> Self {
        Self {
            raised: Vec::new(),
            actions: Vec::new(),
        }
    }
}

/// Composes `handler` and applies its effects to `ctx` in queued order.
///
/// `ctx` is mutated in place, so callers that need all-or-nothing semantics pass
/// a working copy and only keep it when this returns `Ok`.
///
/// # Errors
///
/// Returns the first error from any composed handler, or
/// [`PaletteError::CaptureDepthExceeded`] if captures nest deeper than
/// [`MAX_CAPTURE_DEPTH`].
pub fn resolve<H: Composer>(
    handler: &H,
    ctx: &mut H::Context,
    event: &H::Event,
) -> Result<Batch<H>> {
    let mut batch = Batch::default();
    expand(handler, ctx, event, &mut batch, 0)?;
    Ok(batch)
}

fn expand<H: Composer>(
    handler: &H,
    ctx: &mut H::Context,
    event: &H::Event,
    batch: &mut Batch<H>,
    depth: usize,
) -> Result<()> {
    if depth > MAX_CAPTURE_DEPTH {
        return Err(PaletteError::CaptureDepthExceeded {
            limit: MAX_CAPTURE_DEPTH,
        });
    }

    let mut fx = Effects::new();
    handler.compose(ctx, event, &mut fx)?;
    if fx.is_empty() {
        return Ok(());
    }
    tracing::trace!(depth, effects = fx.len(), "applying effects");

    for effect in fx.queue {
        match effect {
            Effect::Assign(patch) => patch.apply_to(ctx),
            Effect::Raise(raised) => batch.raised.push(raised),
            Effect::Exec(action) => batch.actions.push(action),
            Effect::Capture(nested) => expand(&nested, ctx, event, batch, depth + 1)?,
        }
    }

    Ok(())
}

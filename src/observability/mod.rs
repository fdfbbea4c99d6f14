//! Structured logging for the engine.
//!
//! The library emits `tracing` spans and events (a span per dispatch and per
//! visible set computation, debug events for selection changes and ignored
//! events, warnings for scorer failures). This module installs a subscriber that
//! prints them to stderr.
//!
//! # Configuration
//!
//! Trace level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! # Usage
//!
//! Initialize tracing early, before creating a machine:
//!
//! ```rust
//! use palette_machine::observability::init_tracing;
//! use palette_machine::Config;
//!
//! let config = Config::default();
//! init_tracing(&config);
//!
//! tracing::debug!("palette initialized");
//! ```
//!
//! # Modules
//!
//! - [`init`]: Tracing initialization and subscriber setup

mod init;

pub use init::init_tracing;

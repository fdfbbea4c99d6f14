//! Rendering contract: accessibility attributes and the palette view model.
//!
//! The engine does not draw anything. These modules compute what a renderer
//! (terminal, web, native) needs after each dispatch.
//!
//! # Modules
//!
//! - [`aria`]: Combobox, listbox and option attribute derivations
//! - [`viewmodel`]: Render-ready [`PaletteView`] with match highlight ranges

pub mod aria;
pub mod viewmodel;

pub use aria::{input_attributes, item_attributes, list_attributes};
pub use viewmodel::{ItemView, PaletteView};

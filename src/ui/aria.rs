//! Accessibility attribute derivations.
//!
//! The engine never renders; it computes the combobox/listbox/option attributes a
//! renderer should attach. Each struct serializes with the ARIA attribute names,
//! and boolean flags are omitted when false so they can be spread onto markup
//! as-is.

use crate::app::state::CommandContext;
use crate::domain::Item;
use serde::Serialize;

/// Attributes for the text input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputAttributes {
    pub role: &'static str,
    #[serde(rename = "autoComplete")]
    pub autocomplete: &'static str,
    #[serde(rename = "aria-autocomplete")]
    pub aria_autocomplete: &'static str,
    /// Id of the listbox the input controls.
    #[serde(rename = "aria-controls")]
    pub aria_controls: String,
    /// Id of the input's label.
    #[serde(rename = "aria-labelledby")]
    pub aria_labelledby: String,
}

/// Attributes for the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListAttributes {
    pub role: &'static str,
    #[serde(rename = "aria-label")]
    pub aria_label: &'static str,
    /// Id of the input labelling the list.
    #[serde(rename = "aria-labelledby")]
    pub aria_labelledby: String,
}

/// Attributes for one option in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemAttributes {
    pub role: &'static str,
    #[serde(rename = "aria-selected", skip_serializing_if = "is_false")]
    pub selected: bool,
    #[serde(rename = "aria-disabled", skip_serializing_if = "is_false")]
    pub disabled: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Combobox attributes linking the input to the list and its label.
///
/// # Example
///
/// ```rust
/// use palette_machine::app::state::CommandContext;
/// use palette_machine::search::SkimScorer;
/// use palette_machine::ui::aria::input_attributes;
/// use palette_machine::ElementIds;
/// use std::sync::Arc;
///
/// let ids = ElementIds::new("list", "input", "label");
/// let ctx = CommandContext::new(vec![], ids, Arc::new(SkimScorer::default()));
/// let attrs = input_attributes(&ctx);
/// assert_eq!(attrs.role, "combobox");
/// assert_eq!(attrs.aria_controls, "list");
/// ```
#[must_use]
pub fn input_attributes(ctx: &CommandContext) -> InputAttributes {
    InputAttributes {
        role: "combobox",
        autocomplete: "off",
        aria_autocomplete: "list",
        aria_controls: ctx.ids.list_id.clone(),
        aria_labelledby: ctx.ids.label_id.clone(),
    }
}

/// Listbox attributes linking the list back to the input.
#[must_use]
pub fn list_attributes(ctx: &CommandContext) -> ListAttributes {
    ListAttributes {
        role: "listbox",
        aria_label: "Suggestions",
        aria_labelledby: ctx.ids.input_id.clone(),
    }
}

/// Option attributes for `item`.
///
/// `selected` is set only when `item` is the resolved selection; `disabled` mirrors
/// the item's own flag.
#[must_use]
pub fn item_attributes(item: &Item, ctx: &CommandContext) -> ItemAttributes {
    ItemAttributes {
        role: "option",
        selected: ctx.is_selected(&item.value),
        disabled: item.disabled,
    }
}

//! Raw tree records: the JSON interchange format.
//!
//! A tree is described by a flat-to-nested list of [`RawItem`] records. The
//! `children` field is deliberately three-valued, and the distinction is
//! load-bearing for lazy loading:
//!
//! | JSON           | [`RawChildren`] | Meaning                             |
//! |----------------|-----------------|-------------------------------------|
//! | field absent   | `Leaf`          | never has children                  |
//! | `null`         | `Unfetched`     | branch, subtree loads on demand     |
//! | `[...]`        | `Fetched`       | branch with a known (maybe empty) subtree |
//!
//! Validation is shallow on purpose: [`parse_items`] only insists that the
//! top level is an array. Missing `title`/`value` fields default to empty
//! strings rather than failing the whole document.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::InputError;

// ── Records ─────────────────────────────────────────────────────────────

/// One item of a raw tree document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    /// Label shown next to the checkbox.
    #[serde(default)]
    pub title: String,
    /// Submission value of the item.
    #[serde(default)]
    pub value: String,
    /// Optional icon reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Initial checked flag. Taken as-is when building a tree; it is not
    /// reconciled against the flags of ancestors or descendants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    /// Initial collapsed flag. Only meaningful for fetched branches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    /// Child list, see [`RawChildren`].
    #[serde(default, skip_serializing_if = "RawChildren::is_leaf")]
    pub children: RawChildren,
}

/// The three shapes of a `children` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawChildren {
    /// Field absent: the item is a leaf.
    #[default]
    Leaf,
    /// Field `null`: the item is a branch whose subtree has not been fetched.
    Unfetched,
    /// Field is a list: the item is a branch with this subtree.
    Fetched(Vec<RawItem>),
}

impl RawChildren {
    /// True for the absent-field shape.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf)
    }

    /// True for the `null` shape.
    pub fn is_unfetched(&self) -> bool {
        matches!(self, Self::Unfetched)
    }

    /// Child records of the fetched shape, `None` otherwise.
    pub fn items(&self) -> Option<&[RawItem]> {
        match self {
            Self::Fetched(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Vec<RawItem>> for RawChildren {
    fn from(items: Vec<RawItem>) -> Self {
        Self::Fetched(items)
    }
}

impl Serialize for RawChildren {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            // Leaf is normally skipped at the field level; emit null as the
            // conservative fallback if it ever reaches a serializer.
            Self::Leaf | Self::Unfetched => serializer.serialize_none(),
            Self::Fetched(items) => items.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for RawChildren {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // An absent field never reaches this point (serde default → Leaf),
        // so a None here is an explicit null.
        Ok(match Option::<Vec<RawItem>>::deserialize(deserializer)? {
            None => Self::Unfetched,
            Some(items) => Self::Fetched(items),
        })
    }
}

// ── Builders ────────────────────────────────────────────────────────────

impl RawItem {
    /// New leaf record with the given title and submission value.
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Set the icon reference.
    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the initial checked flag.
    #[must_use]
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    /// Set the initial collapsed flag.
    #[must_use]
    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = Some(collapsed);
        self
    }

    /// Turn the record into a branch with the given subtree.
    #[must_use]
    pub fn children(mut self, children: Vec<RawItem>) -> Self {
        self.children = RawChildren::Fetched(children);
        self
    }

    /// Turn the record into a branch whose subtree loads on demand.
    #[must_use]
    pub fn on_demand(mut self) -> Self {
        self.children = RawChildren::Unfetched;
        self
    }
}

// ── Parsing ─────────────────────────────────────────────────────────────

/// Parse a JSON document into tree records.
///
/// The only structural requirement is that the top level is an array;
/// anything else is rejected with [`InputError::NotAnArray`] before item
/// conversion is attempted. Item fields are lenient per the field defaults
/// on [`RawItem`].
pub fn parse_items(text: &str) -> Result<Vec<RawItem>, InputError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_array() {
        return Err(InputError::NotAnArray {
            found: json_kind(&value),
        });
    }
    Ok(serde_json::from_value(value)?)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ── Tests ───────────────────────────────────────────────────────────────

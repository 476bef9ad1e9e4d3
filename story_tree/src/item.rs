//! Items - save markers and color-tagged events attached to a node.

use serde::{Deserialize, Serialize};

/// What an item marks.
///
/// Files store the kind as a one-letter code. Any code that is not recognized
/// loads as [`ItemKind::Default`] instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    /// A save point in the story.
    SaveMarker,
    /// Red event, code `r`.
    Red,
    /// Green event, code `g`.
    Green,
    /// Blue event, code `b`.
    Blue,
    /// Cyan event, code `c`.
    Cyan,
    /// Yellow event, code `y`.
    Yellow,
    /// Magenta event, code `m`.
    Magenta,
    /// Uncolored event (white).
    #[default]
    Default,
}

impl ItemKind {
    /// Every event color, in menu order. Save markers are not events.
    pub const EVENT_COLORS: [ItemKind; 7] = [
        ItemKind::Red,
        ItemKind::Green,
        ItemKind::Blue,
        ItemKind::Cyan,
        ItemKind::Yellow,
        ItemKind::Magenta,
        ItemKind::Default,
    ];

    /// Map a free-form code to a kind. Total: unknown codes become `Default`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "s" => ItemKind::SaveMarker,
            "r" => ItemKind::Red,
            "g" => ItemKind::Green,
            "b" => ItemKind::Blue,
            "c" => ItemKind::Cyan,
            "y" => ItemKind::Yellow,
            "m" => ItemKind::Magenta,
            _ => ItemKind::Default,
        }
    }

    /// The code written to tree files.
    pub fn code(&self) -> &'static str {
        match self {
            ItemKind::SaveMarker => "s",
            ItemKind::Red => "r",
            ItemKind::Green => "g",
            ItemKind::Blue => "b",
            ItemKind::Cyan => "c",
            ItemKind::Yellow => "y",
            ItemKind::Magenta => "m",
            ItemKind::Default => "d",
        }
    }

    pub fn is_save_marker(&self) -> bool {
        matches!(self, ItemKind::SaveMarker)
    }
}

impl From<String> for ItemKind {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        kind.code().to_string()
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One entry in a node's ordered item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub text: String,
}

impl Item {
    pub fn new(kind: ItemKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Create a save marker.
    pub fn save(text: impl Into<String>) -> Self {
        Self::new(ItemKind::SaveMarker, text)
    }

    /// Create a colored event.
    pub fn event(kind: ItemKind, text: impl Into<String>) -> Self {
        Self::new(kind, text)
    }
}

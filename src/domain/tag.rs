use serde::{Deserialize, Serialize};

use super::error::ValidationError;

pub const DEFAULT_TAG_COLOR: &str = "#6366f1";

/// Colors offered when creating a tag.
pub const PRESET_COLORS: [&str; 8] = [
    "#6366f1", // indigo
    "#8b5cf6", // purple
    "#ec4899", // pink
    "#ef4444", // red
    "#f59e0b", // amber
    "#10b981", // green
    "#06b6d4", // cyan
    "#3b82f6", // blue
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TagId(pub i64);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String { "#cccccc".to_string() }

impl Tag {
    /// Display color as 8-bit RGB, if the stored value parses.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> { color_rgb(&self.color) }
}

/// Any CSS color string as 8-bit RGB.
pub fn color_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let [r, g, b, _] = csscolorparser::parse(color).ok()?.to_rgba8();
    Some((r, g, b))
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub color: String,
}

impl NewTag {
    /// Trims the name and normalizes any CSS color to `#rrggbb`.
    pub fn new(name: &str, color: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() { return Err(ValidationError::EmptyTagName); }
        let parsed = csscolorparser::parse(color.trim()).map_err(|_| ValidationError::InvalidColor(color.to_string()))?;
        Ok(Self { name: name.to_string(), color: parsed.to_hex_string() })
    }
}

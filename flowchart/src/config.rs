//! Diagram configuration - sizes, spacing, fonts and colors.

use resvg::tiny_skia::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use story_tree::ItemKind;

use crate::FlowchartError;

/// An 8-bit RGBA color, written as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 0xff])
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub fn parse(hex: &str) -> Result<Self, FlowchartError> {
        let invalid = || FlowchartError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        let well_formed = matches!(digits.len(), 6 | 8)
            && digits.chars().all(|c| c.is_ascii_hexdigit());
        if !well_formed {
            return Err(invalid());
        }
        let mut channels = [0xff_u8; 4];
        for (i, channel) in channels.iter_mut().enumerate().take(digits.len() / 2) {
            *channel = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(channels))
    }

    /// `#rrggbb`, for SVG paint attributes.
    pub fn to_rgb_hex(&self) -> String {
        let [r, g, b, _] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Alpha as a 0.0-1.0 opacity.
    pub fn opacity(&self) -> f32 {
        self.0[3] as f32 / 255.0
    }

    pub fn to_color(&self) -> Color {
        let [r, g, b, a] = self.0;
        Color::from_rgba8(r, g, b, a)
    }
}

impl TryFrom<String> for Rgba {
    type Error = FlowchartError;

    fn try_from(hex: String) -> Result<Self, Self::Error> {
        Self::parse(&hex)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

/// Fill colors for item shapes, one per item kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemColors {
    pub red: Rgba,
    pub green: Rgba,
    pub blue: Rgba,
    pub cyan: Rgba,
    pub yellow: Rgba,
    pub magenta: Rgba,
    pub save: Rgba,
    pub default: Rgba,
}

impl Default for ItemColors {
    fn default() -> Self {
        Self {
            red: Rgba::rgb(0xff, 0x00, 0x00),
            green: Rgba::rgb(0x00, 0xff, 0x00),
            blue: Rgba::rgb(0x00, 0x00, 0xff),
            cyan: Rgba::rgb(0x00, 0xff, 0xff),
            yellow: Rgba::rgb(0xff, 0xff, 0x00),
            magenta: Rgba::rgb(0xff, 0x00, 0xff),
            save: Rgba::rgb(0x00, 0xff, 0xff),
            default: Rgba::rgb(0xff, 0xff, 0xff),
        }
    }
}

impl ItemColors {
    pub fn for_kind(&self, kind: ItemKind) -> Rgba {
        match kind {
            ItemKind::SaveMarker => self.save,
            ItemKind::Red => self.red,
            ItemKind::Green => self.green,
            ItemKind::Blue => self.blue,
            ItemKind::Cyan => self.cyan,
            ItemKind::Yellow => self.yellow,
            ItemKind::Magenta => self.magenta,
            ItemKind::Default => self.default,
        }
    }
}

/// Everything that controls how a tree is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Content width of every node shape, in pixels.
    pub node_width: u32,

    /// Content height of every node shape, in pixels.
    pub node_height: u32,

    /// Transparent padding around each shape.
    pub node_buffer: u32,

    /// Gap between neighbouring layouts, horizontally and vertically.
    pub internode_gap: u32,

    /// Label font size, in pixels.
    pub font_size: u32,

    /// Thickness of shape outlines and connector lines.
    pub outline_width: u32,

    /// Font families to try, in order. A generic sans-serif face is used last.
    pub font_families: Vec<String>,

    /// Label fill.
    pub font_color: Rgba,

    /// Stroke drawn around label glyphs.
    pub font_outline: Rgba,

    /// Shape outlines and connector arrows.
    pub outline_color: Rgba,

    /// Fill of prompt diamonds.
    pub prompt_color: Rgba,

    /// Fill of response rectangles.
    pub response_color: Rgba,

    /// Canvas behind the whole diagram.
    pub background_color: Rgba,

    /// Side length of the image produced for an empty tree.
    pub blank_size: u32,

    pub colors: ItemColors,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            node_width: 150,
            node_height: 75,
            node_buffer: 3,
            internode_gap: 20,
            font_size: 14,
            outline_width: 2,
            font_families: vec![
                "DejaVu Sans".to_string(),
                "Arial Black".to_string(),
                "Arial".to_string(),
            ],
            font_color: Rgba::rgb(0xff, 0xff, 0xff),
            font_outline: Rgba::rgb(0x00, 0x00, 0x00),
            outline_color: Rgba::rgb(0x00, 0x00, 0x00),
            prompt_color: Rgba::rgb(0xff, 0x80, 0x00),
            response_color: Rgba::rgb(0x00, 0x80, 0x00),
            background_color: Rgba::rgb(0x80, 0x80, 0x80),
            blank_size: 100,
            colors: ItemColors::default(),
        }
    }
}

impl DiagramConfig {
    /// Parse a TOML configuration. Missing keys keep their defaults.
    pub fn from_toml_str(toml: &str) -> Result<Self, FlowchartError> {
        let config: DiagramConfig = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlowchartError> {
        let path = path.as_ref();
        let toml = fs::read_to_string(path).map_err(|source| FlowchartError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&toml)
    }

    /// Reject sizes that would produce empty canvases.
    pub fn validate(&self) -> Result<(), FlowchartError> {
        let sizes = [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
            ("font_size", self.font_size),
            ("blank_size", self.blank_size),
        ];
        for (name, value) in sizes {
            if value == 0 {
                return Err(FlowchartError::InvalidConfig(format!(
                    "{name} must be greater than zero"
                )));
            }
        }
        Ok(())
    }
}

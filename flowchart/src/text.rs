//! Text rendering - word-wrapped, centered, outlined labels.
//!
//! Labels are drawn by building a small SVG document and rasterizing it with
//! `resvg`, so glyph shaping and font lookup come from the system font
//! database.

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use tracing::{debug, warn};

use crate::layout::blank_canvas;
use crate::{FlowchartError, Rgba};

/// Size and paint of a text label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Content width, excluding the buffer.
    pub width: u32,
    /// Content height, excluding the buffer.
    pub height: u32,
    pub buffer: u32,
    pub font_size: u32,
    pub fill: Rgba,
    pub outline: Rgba,
}

/// Characters per line for text squeezed into `width` pixels.
///
/// Conservative: assumes every glyph is half the font size wide and keeps two
/// characters of slack.
pub fn wrap_width(width: u32, font_size: u32) -> usize {
    let glyph = (font_size as f32 / 2.0).max(1.0);
    ((width as f32 / glyph) as usize).saturating_sub(2).max(1)
}

/// Greedy word wrap. Words longer than a line are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while !chars.is_empty() {
            let room = if current_len == 0 {
                width
            } else {
                width.saturating_sub(current_len + 1)
            };
            if chars.len() <= room {
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current_len += chars.len();
                current.extend(chars.drain(..));
            } else if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            } else {
                current.extend(chars.drain(..width));
                lines.push(std::mem::take(&mut current));
            }
        }
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Rasterizes labels with the first configured font family that is installed.
pub struct TextRenderer {
    options: usvg::Options<'static>,
    font_family: String,
}

impl TextRenderer {
    /// Load the system fonts and resolve `families` in order, falling back to
    /// a generic sans-serif face.
    pub fn new(families: &[String]) -> Self {
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();

        let resolved = families.iter().find(|family| {
            let query = fontdb::Query {
                families: &[fontdb::Family::Name(family.as_str())],
                weight: fontdb::Weight::BOLD,
                ..fontdb::Query::default()
            };
            options.fontdb.query(&query).is_some()
        });
        let font_family = match resolved {
            Some(family) => {
                debug!(family = %family, "label font resolved");
                format!("'{}', sans-serif", family.replace('\'', ""))
            }
            None => {
                debug!(?families, "no configured font installed; using sans-serif");
                "sans-serif".to_string()
            }
        };

        Self {
            options,
            font_family,
        }
    }

    /// The `font-family` list labels are drawn with.
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// SVG document for a label. `None` when there is nothing to draw.
    pub fn label_svg(&self, text: &str, style: &TextStyle) -> Option<String> {
        let lines = wrap_text(text, wrap_width(style.width, style.font_size));
        if lines.is_empty() {
            return None;
        }

        let canvas_width = style.width + style.buffer * 2;
        let canvas_height = style.height + style.buffer * 2;
        let font_size = style.font_size as i64;
        let stroke = font_size / 6;
        let spacing = font_size / 4;
        let count = lines.len() as i64;
        let block = font_size * count + spacing * (count - 1);
        let top = (canvas_height as i64 - block) / 2;
        let center = canvas_width as f32 / 2.0;

        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{canvas_width}\" height=\"{canvas_height}\" viewBox=\"0 0 {canvas_width} {canvas_height}\">\n"
        );
        for (i, line) in lines.iter().enumerate() {
            let line_top = top + (font_size + spacing) * i as i64;
            let baseline = line_top as f32 + font_size as f32 * 0.8;
            svg.push_str(&format!(
                "  <text x=\"{center:.1}\" y=\"{baseline:.1}\" text-anchor=\"middle\" font-family=\"{family}\" font-size=\"{font_size}\" font-weight=\"bold\" fill=\"{fill}\" fill-opacity=\"{fill_opacity:.3}\" stroke=\"{outline}\" stroke-opacity=\"{outline_opacity:.3}\" stroke-width=\"{stroke_width}\" stroke-linejoin=\"round\" paint-order=\"stroke\">{text}</text>\n",
                family = self.font_family,
                fill = style.fill.to_rgb_hex(),
                fill_opacity = style.fill.opacity(),
                outline = style.outline.to_rgb_hex(),
                outline_opacity = style.outline.opacity(),
                stroke_width = stroke * 2,
                text = escape_xml(line),
            ));
        }
        svg.push_str("</svg>\n");
        Some(svg)
    }

    /// Render `text` into a transparent canvas the size of a shape with the
    /// same content size and buffer.
    ///
    /// A label that cannot be rasterized leaves the canvas empty.
    pub fn render(&self, text: &str, style: &TextStyle) -> Result<Pixmap, FlowchartError> {
        let mut canvas = blank_canvas(
            style.width + style.buffer * 2,
            style.height + style.buffer * 2,
        )?;
        let Some(svg) = self.label_svg(text, style) else {
            return Ok(canvas);
        };
        match usvg::Tree::from_str(&svg, &self.options) {
            Ok(tree) => resvg::render(&tree, Transform::identity(), &mut canvas.as_mut()),
            Err(err) => warn!(%err, text, "label not rendered"),
        }
        Ok(canvas)
    }
}

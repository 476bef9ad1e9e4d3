//! Primitive shapes and connector arrows.
//!
//! Every shape canvas is the content size plus `buffer` on each side, with one
//! top anchor centered on the upper buffer edge and one bottom anchor centered
//! on the lower buffer edge.

use resvg::tiny_skia::{
    FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};
use std::f32::consts::PI;

use crate::layout::{blank_canvas, Anchor, ConnectorStyle, Layout};
use crate::{FlowchartError, Rgba};

/// Size and paint of a primitive shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    /// Content width, excluding the buffer.
    pub width: u32,
    /// Content height, excluding the buffer.
    pub height: u32,
    pub buffer: u32,
    pub outline_width: u32,
    pub fill: Rgba,
    pub outline: Rgba,
}

impl ShapeStyle {
    pub fn canvas_width(&self) -> u32 {
        self.width + self.buffer * 2
    }

    pub fn canvas_height(&self) -> u32 {
        self.height + self.buffer * 2
    }

    fn anchors(&self) -> (Vec<Anchor>, Vec<Anchor>) {
        let x = (self.canvas_width() / 2) as i32;
        let top = Anchor::new(x, self.buffer as i32);
        let bottom = Anchor::new(x, (self.height + self.buffer) as i32);
        (vec![top], vec![bottom])
    }
}

fn polygon(points: &[(f32, f32)]) -> Option<Path> {
    let ((x, y), rest) = points.split_first()?;
    let mut builder = PathBuilder::new();
    builder.move_to(*x, *y);
    for (x, y) in rest {
        builder.line_to(*x, *y);
    }
    builder.close();
    builder.finish()
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_color());
    paint.anti_alias = true;
    paint
}

fn shape_layout(style: &ShapeStyle, outline: Option<Path>) -> Result<Layout, FlowchartError> {
    let mut canvas = blank_canvas(style.canvas_width(), style.canvas_height())?;
    if let Some(path) = outline {
        canvas.fill_path(
            &path,
            &paint(style.fill),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
        if style.outline_width > 0 {
            let stroke = Stroke {
                width: style.outline_width as f32,
                ..Stroke::default()
            };
            canvas.stroke_path(
                &path,
                &paint(style.outline),
                &stroke,
                Transform::identity(),
                None,
            );
        }
    }
    let (top, bottom) = style.anchors();
    Ok(Layout::new(canvas, top, bottom))
}

/// Axis-aligned rectangle filling the content area.
pub fn rectangle(style: &ShapeStyle) -> Result<Layout, FlowchartError> {
    let b = style.buffer as f32;
    let (w, h) = (style.width as f32, style.height as f32);
    let points = [(b, b), (b, b + h), (b + w, b + h), (b + w, b)];
    shape_layout(style, polygon(&points))
}

/// Diamond touching the middle of each content edge.
pub fn diamond(style: &ShapeStyle) -> Result<Layout, FlowchartError> {
    let b = style.buffer as f32;
    let (w, h) = (style.width as f32, style.height as f32);
    let mid_x = (style.canvas_width() / 2) as f32;
    let mid_y = (style.canvas_height() / 2) as f32;
    let points = [(mid_x, b), (b, mid_y), (mid_x, b + h), (b + w, mid_y)];
    shape_layout(style, polygon(&points))
}

/// Hexagon with flat top and bottom edges spanning 70% of the content width.
pub fn hexagon(style: &ShapeStyle) -> Result<Layout, FlowchartError> {
    let b = style.buffer as f32;
    let (w, h) = (style.width as f32, style.height as f32);
    let flat = style.width * 7 / 10;
    let inset = ((style.canvas_width() - flat) / 2) as f32;
    let far = style.canvas_width() as f32 - inset;
    let mid_y = (style.canvas_height() / 2) as f32;
    let points = [
        (b, mid_y),
        (inset, b),
        (far, b),
        (w + b, mid_y),
        (far, h + b),
        (inset, h + b),
    ];
    shape_layout(style, polygon(&points))
}

/// Ellipse inscribed in the content area.
pub fn ellipse(style: &ShapeStyle) -> Result<Layout, FlowchartError> {
    let b = style.buffer as f32;
    let oval = Rect::from_xywh(b, b, style.width as f32, style.height as f32)
        .and_then(PathBuilder::from_oval);
    shape_layout(style, oval)
}

/// Draw a straight connector from `start` to `end`, finished by a filled
/// triangular head whose tip touches `end`.
///
/// The head is inscribed in a circle of radius 2.5 line widths, oriented along
/// the line. A zero-length connector draws nothing.
pub fn draw_arrow(canvas: &mut Pixmap, start: Anchor, end: Anchor, style: &ConnectorStyle) {
    let (sx, sy) = (start.x as f32, start.y as f32);
    let (ex, ey) = (end.x as f32, end.y as f32);
    let (dx, dy) = (ex - sx, ey - sy);
    if dx.hypot(dy) < f32::EPSILON {
        return;
    }

    let angle = dy.atan2(dx);
    let radius = style.line_width.max(1) as f32 * 2.5;
    let (cx, cy) = (ex - angle.cos() * radius, ey - angle.sin() * radius);
    let corner = |turn: f32| {
        let a = angle + turn;
        (cx + a.cos() * radius, cy + a.sin() * radius)
    };
    let head = [corner(0.0), corner(2.0 * PI / 3.0), corner(-2.0 * PI / 3.0)];

    let color = paint(style.color);
    let mut line = PathBuilder::new();
    line.move_to(sx, sy);
    line.line_to(cx, cy);
    if let Some(path) = line.finish() {
        let stroke = Stroke {
            width: style.line_width.max(1) as f32,
            ..Stroke::default()
        };
        canvas.stroke_path(&path, &color, &stroke, Transform::identity(), None);
    }
    if let Some(path) = polygon(&head) {
        canvas.fill_path(&path, &color, FillRule::Winding, Transform::identity(), None);
    }
}

/// A transparent `width` x `height` canvas holding one connector arrow.
pub fn arrow(
    start: Anchor,
    end: Anchor,
    width: u32,
    height: u32,
    style: &ConnectorStyle,
) -> Result<Pixmap, FlowchartError> {
    let mut canvas = blank_canvas(width, height)?;
    draw_arrow(&mut canvas, start, end, style);
    Ok(canvas)
}

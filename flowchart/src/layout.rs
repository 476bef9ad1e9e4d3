//! Layouts - rendered canvases with connector anchors, and the two ways of
//! combining them.
//!
//! Horizontal combination places siblings side by side. Vertical combination
//! stacks stages and routes one connector arrow from each bottom anchor of the
//! upper layer to the top anchor with the same index on the layer below.

use resvg::tiny_skia::{Pixmap, PixmapPaint, Transform};
use tracing::debug;

use crate::shapes::draw_arrow;
use crate::{FlowchartError, Rgba};

/// A connector attachment point, in pixels from the owning canvas's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    /// Pixels from the left edge.
    pub x: i32,
    /// Pixels from the top edge.
    pub y: i32,
}

impl Anchor {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The same point seen from a canvas this one is placed into at `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// An arrow drawn from a bottom anchor to a top anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connector {
    /// Bottom anchor of the upper layout, where the line leaves.
    pub start: Anchor,
    /// Top anchor of the lower layout, where the arrowhead's tip lands.
    pub end: Anchor,
}

impl Connector {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            start: self.start.offset(dx, dy),
            end: self.end.offset(dx, dy),
        }
    }
}

/// How connector arrows are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorStyle {
    /// Line thickness; the arrowhead scales with it.
    pub line_width: u32,
    /// Color of both the line and the head.
    pub color: Rgba,
}

/// A rendered piece of the diagram.
///
/// `top` anchors are where incoming connectors attach and `bottom` anchors
/// where outgoing ones leave, both in left-to-right placement order.
/// `connectors` lists every arrow already drawn on the canvas.
#[derive(Debug, Clone)]
pub struct Layout {
    pub canvas: Pixmap,
    pub top: Vec<Anchor>,
    pub bottom: Vec<Anchor>,
    pub connectors: Vec<Connector>,
}

impl Layout {
    pub fn new(canvas: Pixmap, top: Vec<Anchor>, bottom: Vec<Anchor>) -> Self {
        Self {
            canvas,
            top,
            bottom,
            connectors: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// Paint `front` over this layout's canvas. Anchors are unchanged.
    pub fn with_overlay(mut self, front: &Pixmap) -> Self {
        overlay(&mut self.canvas, front, 0, 0);
        self
    }

    /// Replace the bottom anchors with `count` copies of the first one, so a
    /// single exit can fan out to `count` connectors.
    pub fn fan_out(mut self, count: usize) -> Self {
        if let Some(&exit) = self.bottom.first() {
            self.bottom = vec![exit; count];
        }
        self
    }
}

/// A fully transparent canvas.
pub fn blank_canvas(width: u32, height: u32) -> Result<Pixmap, FlowchartError> {
    Pixmap::new(width, height).ok_or(FlowchartError::Canvas { width, height })
}

/// Alpha-composite `front` onto `back` with its top-left corner at `(x, y)`.
pub fn overlay(back: &mut Pixmap, front: &Pixmap, x: i32, y: i32) {
    back.draw_pixmap(
        x,
        y,
        front.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

/// Lay layouts out left to right with `gap` pixels between them.
///
/// Absent entries are dropped first; a single survivor passes through
/// unchanged and no survivors give `None`. Anchors of every child are kept,
/// in order. No connectors are drawn.
pub fn combine_horizontally(
    layouts: impl IntoIterator<Item = Option<Layout>>,
    gap: u32,
) -> Result<Option<Layout>, FlowchartError> {
    let mut layouts: Vec<Layout> = layouts.into_iter().flatten().collect();
    if layouts.len() <= 1 {
        return Ok(layouts.pop());
    }

    let gaps = gap * (layouts.len() as u32 - 1);
    let width = layouts.iter().map(Layout::width).sum::<u32>() + gaps;
    let height = layouts.iter().map(Layout::height).max().unwrap_or(0);
    let mut canvas = blank_canvas(width, height)?;

    let mut top = Vec::new();
    let mut bottom = Vec::new();
    let mut connectors = Vec::new();
    let mut x = 0_i32;
    for layout in &layouts {
        overlay(&mut canvas, &layout.canvas, x, 0);
        top.extend(layout.top.iter().map(|a| a.offset(x, 0)));
        bottom.extend(layout.bottom.iter().map(|a| a.offset(x, 0)));
        connectors.extend(layout.connectors.iter().map(|c| c.offset(x, 0)));
        x += (layout.width() + gap) as i32;
    }

    Ok(Some(Layout {
        canvas,
        top,
        bottom,
        connectors,
    }))
}

/// Stack layouts top to bottom with `gap` pixels between them, each centered
/// horizontally, and connect every adjacent pair.
///
/// Absent entries are dropped as in [`combine_horizontally`]. Between layer
/// `i - 1` and layer `i`, bottom anchor `j` of the upper layer is joined to
/// top anchor `j` of the lower one. Arrows are painted above the shapes.
pub fn combine_vertically(
    layouts: impl IntoIterator<Item = Option<Layout>>,
    gap: u32,
    style: &ConnectorStyle,
) -> Result<Option<Layout>, FlowchartError> {
    let mut layouts: Vec<Layout> = layouts.into_iter().flatten().collect();
    if layouts.len() <= 1 {
        return Ok(layouts.pop());
    }

    let gaps = gap * (layouts.len() as u32 - 1);
    let width = layouts.iter().map(Layout::width).max().unwrap_or(0);
    let height = layouts.iter().map(Layout::height).sum::<u32>() + gaps;
    let mut canvas = blank_canvas(width, height)?;

    let mut origins = Vec::with_capacity(layouts.len());
    let mut connectors = Vec::new();
    let mut y = 0_i32;
    for layout in &layouts {
        let x = ((width - layout.width()) / 2) as i32;
        overlay(&mut canvas, &layout.canvas, x, y);
        connectors.extend(layout.connectors.iter().map(|c| c.offset(x, y)));
        origins.push((x, y));
        y += (layout.height() + gap) as i32;
    }

    let mut arrows = blank_canvas(width, height)?;
    for i in 1..layouts.len() {
        let (upper_x, upper_y) = origins[i - 1];
        let (lower_x, lower_y) = origins[i];
        let upper = &layouts[i - 1].bottom;
        let lower = &layouts[i].top;
        if upper.len() != lower.len() {
            debug!(
                upper = upper.len(),
                lower = lower.len(),
                "anchor counts differ; extra anchors stay unconnected"
            );
        }
        for (exit, entry) in upper.iter().zip(lower) {
            let connector = Connector {
                start: exit.offset(upper_x, upper_y),
                end: entry.offset(lower_x, lower_y),
            };
            draw_arrow(&mut arrows, connector.start, connector.end, style);
            connectors.push(connector);
        }
    }
    overlay(&mut canvas, &arrows, 0, 0);

    let (first_x, first_y) = origins[0];
    let (last_x, last_y) = origins[origins.len() - 1];
    let top = layouts[0]
        .top
        .iter()
        .map(|a| a.offset(first_x, first_y))
        .collect();
    let bottom = layouts[layouts.len() - 1]
        .bottom
        .iter()
        .map(|a| a.offset(last_x, last_y))
        .collect();

    Ok(Some(Layout {
        canvas,
        top,
        bottom,
        connectors,
    }))
}

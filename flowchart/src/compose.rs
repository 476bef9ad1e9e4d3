//! Flowchart Composer - turns a whole story tree into one diagram.
//!
//! The composer walks the tree depth first:
//! 1. **Items**: one labelled shape per item, chained top to bottom
//! 2. **Branch header**: the prompt diamond fanned out to a row of response rectangles
//! 3. **Children**: every child composed recursively, side by side under its response
//! 4. **Stacking**: items above the branch, connectors between every stage
//!
//! Each call returns an independent layout; the tree is only read.

use resvg::tiny_skia::Pixmap;
use std::fs;
use std::path::Path;
use story_tree::{Item, Node};
use tracing::debug;

use crate::layout::{
    blank_canvas, combine_horizontally, combine_vertically, overlay, ConnectorStyle, Layout,
};
use crate::shapes::{diamond, ellipse, hexagon, rectangle, ShapeStyle};
use crate::text::{TextRenderer, TextStyle};
use crate::{DiagramConfig, FlowchartError, Rgba};

type ShapeFn = fn(&ShapeStyle) -> Result<Layout, FlowchartError>;

/// Renders story trees as flowcharts.
pub struct FlowchartComposer {
    config: DiagramConfig,
    text: TextRenderer,
}

impl FlowchartComposer {
    /// Create a composer, rejecting configurations that cannot be drawn.
    pub fn new(config: DiagramConfig) -> Result<Self, FlowchartError> {
        config.validate()?;
        let text = TextRenderer::new(&config.font_families);
        Ok(Self { config, text })
    }

    /// Create a composer with the default configuration.
    pub fn with_defaults() -> Self {
        let config = DiagramConfig::default();
        let text = TextRenderer::new(&config.font_families);
        Self { config, text }
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    fn shape_style(&self, fill: Rgba) -> ShapeStyle {
        ShapeStyle {
            width: self.config.node_width,
            height: self.config.node_height,
            buffer: self.config.node_buffer,
            outline_width: self.config.outline_width,
            fill,
            outline: self.config.outline_color,
        }
    }

    fn text_style(&self) -> TextStyle {
        TextStyle {
            width: self.config.node_width,
            height: self.config.node_height,
            buffer: self.config.node_buffer,
            font_size: self.config.font_size,
            fill: self.config.font_color,
            outline: self.config.font_outline,
        }
    }

    fn connector_style(&self) -> ConnectorStyle {
        ConnectorStyle {
            line_width: self.config.outline_width,
            color: self.config.outline_color,
        }
    }

    /// A shape with `text` painted over it.
    fn labelled(&self, shape: ShapeFn, fill: Rgba, text: &str) -> Result<Layout, FlowchartError> {
        let layout = shape(&self.shape_style(fill))?;
        let label = self.text.render(text, &self.text_style())?;
        Ok(layout.with_overlay(&label))
    }

    fn item_node(&self, item: &Item) -> Result<Layout, FlowchartError> {
        let shape: ShapeFn = if item.kind.is_save_marker() {
            ellipse
        } else {
            hexagon
        };
        self.labelled(shape, self.config.colors.for_kind(item.kind), &item.text)
    }

    /// The node's items as a connected column, or `None` without items.
    pub fn item_column(&self, node: &Node) -> Result<Option<Layout>, FlowchartError> {
        let items = node
            .items
            .iter()
            .map(|item| self.item_node(item).map(Some))
            .collect::<Result<Vec<_>, _>>()?;
        combine_vertically(items, self.config.internode_gap, &self.connector_style())
    }

    /// The prompt diamond above a row of response rectangles, one connector
    /// per response. `None` for a leaf.
    pub fn branch_header(&self, node: &Node) -> Result<Option<Layout>, FlowchartError> {
        if node.children.is_empty() {
            return Ok(None);
        }
        let prompt = self
            .labelled(
                diamond,
                self.config.prompt_color,
                node.fork_prompt().unwrap_or_default(),
            )?
            .fan_out(node.children.len());

        let responses = node
            .children
            .iter()
            .map(|child| {
                self.labelled(
                    rectangle,
                    self.config.response_color,
                    child.response.as_deref().unwrap_or_default(),
                )
                .map(Some)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let row = combine_horizontally(responses, self.config.internode_gap)?;

        combine_vertically(
            [Some(prompt), row],
            self.config.internode_gap,
            &self.connector_style(),
        )
    }

    /// The full diagram for `node` and everything below it.
    ///
    /// A node with neither items nor children has no diagram.
    pub fn compose(&self, node: &Node) -> Result<Option<Layout>, FlowchartError> {
        let gap = self.config.internode_gap;
        let connector = self.connector_style();
        let items = self.item_column(node)?;

        let branch = match self.branch_header(node)? {
            None => None,
            Some(mut header) => {
                let subtrees = node
                    .children
                    .iter()
                    .map(|child| self.compose(child))
                    .collect::<Result<Vec<_>, _>>()?;
                // Responses whose subtree is empty have nothing to point at.
                header.bottom = header
                    .bottom
                    .iter()
                    .zip(&subtrees)
                    .filter(|(_, subtree)| subtree.is_some())
                    .map(|(anchor, _)| *anchor)
                    .collect();
                let children = combine_horizontally(subtrees, gap)?;
                combine_vertically([Some(header), children], gap, &connector)?
            }
        };

        let layout = combine_vertically([items, branch], gap, &connector)?;
        if let Some(layout) = &layout {
            debug!(
                width = layout.width(),
                height = layout.height(),
                connectors = layout.connectors.len(),
                "node composed"
            );
        }
        Ok(layout)
    }

    /// Render `tree` onto the background color. An empty tree gives a blank
    /// square of `blank_size` pixels.
    pub fn render(&self, tree: &Node) -> Result<Pixmap, FlowchartError> {
        let background = self.config.background_color.to_color();
        let Some(diagram) = self.compose(tree)? else {
            let size = self.config.blank_size;
            let mut canvas = blank_canvas(size, size)?;
            canvas.fill(background);
            return Ok(canvas);
        };

        let mut canvas = blank_canvas(diagram.width(), diagram.height())?;
        canvas.fill(background);
        overlay(&mut canvas, &diagram.canvas, 0, 0);
        debug!(
            width = canvas.width(),
            height = canvas.height(),
            leaves = tree.leaf_count(),
            "flowchart rendered"
        );
        Ok(canvas)
    }

    /// Render `tree` as PNG bytes.
    pub fn render_png(&self, tree: &Node) -> Result<Vec<u8>, FlowchartError> {
        self.render(tree)?
            .encode_png()
            .map_err(|err| FlowchartError::Png(err.to_string()))
    }

    /// Render `tree` and write it as a PNG file.
    pub fn save_png(&self, tree: &Node, path: impl AsRef<Path>) -> Result<(), FlowchartError> {
        let path = path.as_ref();
        let png = self.render_png(tree)?;
        fs::write(path, png).map_err(|source| FlowchartError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_tree::{Edit, ItemKind};

    fn small_config() -> DiagramConfig {
        DiagramConfig {
            node_width: 60,
            node_height: 30,
            node_buffer: 2,
            internode_gap: 10,
            font_size: 10,
            ..DiagramConfig::default()
        }
    }

    fn composer() -> FlowchartComposer {
        FlowchartComposer::new(small_config()).unwrap()
    }

    #[test]
    fn test_empty_tree_renders_blank_background() {
        let canvas = FlowchartComposer::with_defaults().render(&Node::new()).unwrap();

        assert_eq!((canvas.width(), canvas.height()), (100, 100));
        let pixel = canvas.pixel(50, 50).unwrap();
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (0x80, 0x80, 0x80));
        assert_eq!(pixel.alpha(), 255);
    }

    #[test]
    fn test_item_column_chains_items() {
        let node = Node::new()
            .append_item(ItemKind::SaveMarker, "1-1")
            .append_item(ItemKind::Red, "Fight")
            .append_item(ItemKind::from_code("x"), "Odd");

        let column = composer().item_column(&node).unwrap().unwrap();

        // Three 64x34 shapes with two 10px gaps.
        assert_eq!((column.width(), column.height()), (64, 122));
        assert_eq!(column.connectors.len(), 2);
        assert_eq!(column.top.len(), 1);
        assert_eq!(column.bottom.len(), 1);
        assert!(composer().item_column(&Node::new()).unwrap().is_none());
    }

    #[test]
    fn test_branch_header_fans_out() {
        let node = Node::new().fork("Which?", ["A", "B", "C"]).into_inner();

        let header = composer().branch_header(&node).unwrap().unwrap();

        assert_eq!(header.connectors.len(), 3);
        assert_eq!(header.top.len(), 1);
        assert_eq!(header.bottom.len(), 3);
        // Row of three 64px rectangles with two gaps under one diamond.
        assert_eq!((header.width(), header.height()), (212, 78));
        assert!(composer().branch_header(&Node::new()).unwrap().is_none());
    }

    #[test]
    fn test_leaf_without_items_has_no_diagram() {
        let leaf = Node::option("Q", "A").with_terminal(true);
        assert!(composer().compose(&leaf).unwrap().is_none());
    }

    #[test]
    fn test_two_way_fork_with_finished_leaves() {
        let tree = Node::new()
            .append_item(ItemKind::SaveMarker, "start")
            .fork("Which way?", ["Left", "Right"])
            .into_inner()
            .edit_at(&[0], |n| {
                n.append_item(ItemKind::Green, "Found a key")
                    .toggle_terminal()
            })
            .into_inner()
            .edit_at(&[1], |n| {
                n.append_item(ItemKind::Blue, "Lost")
                    .toggle_terminal()
            })
            .into_inner();
        assert!(tree.is_complete());

        let diagram = composer().compose(&tree).unwrap().unwrap();

        // item -> diamond, diamond -> 2 responses, 2 responses -> 2 children
        assert_eq!(diagram.connectors.len(), 5);
        assert_eq!(diagram.top.len(), 1);
        assert_eq!(diagram.bottom.len(), 2);
        // Column of item, diamond, responses, children.
        assert_eq!(diagram.height(), 34 * 4 + 10 * 3);
        assert_eq!(diagram.width(), 64 * 2 + 10);
    }

    #[test]
    fn test_two_way_fork_into_finished_empty_leaves() {
        let tree = Node::new()
            .append_item(ItemKind::SaveMarker, "start")
            .fork("Which way?", ["Left", "Right"])
            .into_inner()
            .edit_at(&[0], Node::toggle_terminal)
            .into_inner()
            .edit_at(&[1], Node::toggle_terminal)
            .into_inner();
        assert!(tree.is_complete());

        let header = composer().branch_header(&tree).unwrap().unwrap();
        assert_eq!(header.bottom.len(), 2);

        let diagram = composer().compose(&tree).unwrap().unwrap();

        // item -> diamond and diamond -> 2 responses; the leaves add nothing.
        assert_eq!(diagram.connectors.len(), 3);
        assert!(diagram.bottom.is_empty());
        // Item column over the branch header, with no children row below.
        assert_eq!(diagram.height(), 34 + 10 + header.height());
        assert_eq!(diagram.width(), header.width());
    }

    #[test]
    fn test_empty_children_are_skipped_without_misrouting() {
        let tree = Node::new()
            .fork("Which way?", ["Left", "Middle", "Right"])
            .into_inner()
            .edit_at(&[2], |n| Edit::Applied(n.append_item(ItemKind::Red, "Trap")))
            .into_inner();

        let diagram = composer().compose(&tree).unwrap().unwrap();

        // diamond -> 3 responses, then only "Right" continues.
        assert_eq!(diagram.connectors.len(), 4);
        let last = diagram.connectors[3];
        let right_response = diagram.connectors[2].end;
        assert_eq!(last.start.x, right_response.x);
    }

    #[test]
    fn test_render_paints_background_under_diagram() {
        let tree = Node::new().append_item(ItemKind::Red, "Only event");
        let canvas = composer().render(&tree).unwrap();

        assert_eq!((canvas.width(), canvas.height()), (64, 34));
        let corner = canvas.pixel(0, 0).unwrap();
        assert_eq!((corner.red(), corner.alpha()), (0x80, 255));
        assert!(canvas.pixels().iter().all(|p| p.alpha() == 255));
    }

    #[test]
    fn test_render_png_and_save() {
        let tree = Node::new().fork("Go?", ["Yes", "No"]).into_inner();
        let png = composer().render_png(&tree).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        composer().save_png(&tree, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = DiagramConfig {
            node_width: 0,
            ..DiagramConfig::default()
        };
        assert!(FlowchartComposer::new(config).is_err());
    }
}

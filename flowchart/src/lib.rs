//! # Flowchart
//!
//! Draws a story tree as a single raster diagram: item columns, prompt
//! diamonds fanning out to their responses, and every child branch laid out
//! underneath, joined by arrows.
//!
//! ## Core Components
//!
//! - **config**: Sizes, fonts and colors, loadable from TOML
//! - **shapes**: Rectangle, diamond, hexagon and ellipse nodes, plus arrows
//! - **text**: Wrapped, centered, outlined labels
//! - **layout**: Anchored canvases and their horizontal/vertical combination
//! - **compose**: The recursive walk from a tree to a finished image
//!
//! ## Design Philosophy
//!
//! - **Pure**: Composition reads the tree and returns a fresh image
//! - **Anchored**: Every layout carries its connector attachment points, so
//!   nesting never needs to re-measure what is already drawn

pub mod compose;
pub mod config;
pub mod error;
pub mod layout;
pub mod shapes;
pub mod text;

pub use compose::FlowchartComposer;
pub use config::*;
pub use error::FlowchartError;
pub use layout::{Anchor, Connector, ConnectorStyle, Layout};

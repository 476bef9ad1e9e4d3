//! Subcommand implementations. Each edit loads the tree file, applies one
//! path-addressed edit and saves the file again if anything changed.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use flowchart::{DiagramConfig, FlowchartComposer};
use story_tree::{render_view, Edit, ItemKind, Node, Path as TreePath, TreeFile};
use tracing::{info, warn};

fn load(file: &Path) -> Result<TreeFile> {
    TreeFile::load(file).with_context(|| format!("Failed to open tree file {}", file.display()))
}

/// Apply `edit` to the node at `path` inside `file`.
///
/// Edits that do not apply are reported and leave the file untouched.
fn edit_node(
    file: &Path,
    path: &TreePath,
    action: &str,
    edit: impl FnOnce(Node) -> Edit<Node>,
) -> Result<()> {
    let mut tree_file = load(file)?;
    let tree = std::mem::take(&mut tree_file.tree);

    match tree.edit_at(path.as_slice(), edit) {
        Edit::Applied(tree) => {
            tree_file.tree = tree;
            tree_file
                .save(file)
                .with_context(|| format!("Failed to save tree file {}", file.display()))?;
            info!(%path, action, "edit applied");
        }
        other => warn!(%path, action, outcome = other.outcome(), "nothing changed"),
    }
    Ok(())
}

pub fn init(
    file: &Path,
    primary: Option<PathBuf>,
    secondary: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    if file.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            file.display()
        );
    }
    TreeFile::new(primary, secondary)
        .save(file)
        .with_context(|| format!("Failed to create tree file {}", file.display()))
}

pub fn show(file: &Path, path: &TreePath) -> Result<String> {
    let tree_file = load(file)?;
    render_view(&tree_file.tree, path.as_slice())
        .with_context(|| format!("No node at {path} in {}", file.display()))
}

pub fn add_save(file: &Path, path: &TreePath, name: String) -> Result<()> {
    edit_node(file, path, "add save", |node| {
        Edit::Applied(node.append_item(ItemKind::SaveMarker, name))
    })
}

pub fn add_event(file: &Path, path: &TreePath, color: &str, text: String) -> Result<()> {
    let kind = ItemKind::from_code(color);
    if kind.is_save_marker() {
        bail!("'{color}' is the save marker code; use add-save instead");
    }
    edit_node(file, path, "add event", |node| {
        Edit::Applied(node.append_item(kind, text))
    })
}

pub fn branch(
    file: &Path,
    path: &TreePath,
    prompt: String,
    responses: Vec<String>,
) -> Result<()> {
    edit_node(file, path, "branch", |node| node.fork(prompt, responses))
}

pub fn toggle_end(file: &Path, path: &TreePath) -> Result<()> {
    edit_node(file, path, "toggle end", Node::toggle_terminal)
}

pub fn delete_item(file: &Path, path: &TreePath, index: usize) -> Result<()> {
    edit_node(file, path, "delete item", |node| node.remove_item(index))
}

pub fn delete_branch(file: &Path, path: &TreePath, index: usize) -> Result<()> {
    edit_node(file, path, "delete branch", |node| node.remove_child(index))
}

pub fn render(file: &Path, output: &Path, config: Option<&Path>) -> Result<()> {
    let tree_file = load(file)?;
    let config = match config {
        Some(config) => DiagramConfig::load(config)
            .with_context(|| format!("Failed to read diagram config {}", config.display()))?,
        None => DiagramConfig::default(),
    };
    let composer = FlowchartComposer::new(config).context("Invalid diagram config")?;
    composer
        .save_png(&tree_file.tree, output)
        .with_context(|| format!("Failed to render flowchart to {}", output.display()))?;
    info!(output = %output.display(), "flowchart written");
    Ok(())
}

//! Text view of one node for terminal display.

use colored::{Color, Colorize};

use super::{Item, ItemKind, Node, PathError};

const NESTED_INDENT: &str = "     ";

/// Terminal color for an item kind. `None` keeps the default color.
pub fn item_color(kind: ItemKind) -> Option<Color> {
    match kind {
        ItemKind::SaveMarker | ItemKind::Cyan => Some(Color::Cyan),
        ItemKind::Red => Some(Color::Red),
        ItemKind::Green => Some(Color::Green),
        ItemKind::Blue => Some(Color::Blue),
        ItemKind::Yellow => Some(Color::BrightYellow),
        ItemKind::Magenta => Some(Color::Magenta),
        ItemKind::Default => None,
    }
}

fn item_line(item: &Item) -> String {
    let line = if item.kind.is_save_marker() {
        format!("(S) {}", item.text)
    } else {
        format!("(E) {}", item.text)
    };
    match item_color(item.kind) {
        Some(color) => line.color(color).to_string(),
        None => line,
    }
}

fn prompt_line(prompt: &str) -> String {
    format!("(P) {prompt}").red().to_string()
}

fn response_line(response: &str) -> String {
    format!("    ﹂{response}").green().to_string()
}

/// Describe the node at `path`: where it came from, what happened there, and
/// the choices that follow.
pub fn render_view(tree: &Node, path: &[usize]) -> Result<String, PathError> {
    let node = tree.node_at(path)?;
    let nested = !path.is_empty();

    let mut body: Vec<String> = node.items.iter().map(item_line).collect();
    if node.terminal {
        body.push("[END]".to_string());
    }
    if !node.children.is_empty() {
        body.push(prompt_line(node.fork_prompt().unwrap_or_default()));
        for child in &node.children {
            body.push(response_line(child.response.as_deref().unwrap_or_default()));
        }
    }

    let mut lines = Vec::new();
    if nested {
        lines.push("(...)".to_string());
    }
    if node.is_complete() {
        lines.push("[COMPLETE BRANCH]".green().to_string());
    }
    if let Some((_, parent_path)) = path.split_last() {
        let parent = tree.node_at(parent_path)?;
        if let Some(save) = parent.last_save() {
            lines.push(item_line(save));
        }
    }
    if let (Some(prompt), Some(response)) = (&node.prompt, &node.response) {
        lines.push(prompt_line(prompt));
        lines.push(response_line(response));
    }
    let indent = if nested { NESTED_INDENT } else { "" };
    lines.extend(body.into_iter().map(|line| format!("{indent}{line}")));

    Ok(lines.join("\n"))
}

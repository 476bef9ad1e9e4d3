//! Story nodes - the recursive branching tree and its path-addressed edits.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Edit, Item, ItemKind, PathError};

/// One point in a branching story.
///
/// A parent exclusively owns its children. Replacing a subtree moves the new
/// value into place and leaves every sibling subtree where it was.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Node {
    /// Question that forked the parent into this node. `None` at the root.
    pub prompt: Option<String>,

    /// Answer chosen to reach this node. `None` at the root.
    pub response: Option<String>,

    /// Save markers and events, in the order they happened.
    #[serde(rename = "item_list")]
    pub items: Vec<Item>,

    /// Response options, in display order. Empty for a leaf.
    #[serde(rename = "branch")]
    pub children: Vec<Node>,

    /// Whether this leaf is a finished ending. Always false when `children` is non-empty.
    #[serde(rename = "end")]
    pub terminal: bool,
}

impl Node {
    /// Create an empty root node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty node reached by answering `prompt` with `response`.
    pub fn option(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            response: Some(response.into()),
            ..Self::default()
        }
    }

    /// Add an item (builder form of [`Node::append_item`]).
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Set the children. Clears the terminal flag when any are given.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        if !children.is_empty() {
            self.terminal = false;
        }
        self.children = children;
        self
    }

    /// Set the terminal flag.
    pub fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Prompt shared by this node's children, if it has any.
    pub fn fork_prompt(&self) -> Option<&str> {
        self.children.first().and_then(|child| child.prompt.as_deref())
    }

    /// Latest save marker in this node's item list.
    pub fn last_save(&self) -> Option<&Item> {
        self.items.iter().rev().find(|item| item.kind.is_save_marker())
    }

    /// Look up the node at `path`.
    pub fn node_at(&self, path: &[usize]) -> Result<&Node, PathError> {
        let mut node = self;
        for (depth, &index) in path.iter().enumerate() {
            node = node.children.get(index).ok_or(PathError::OutOfRange {
                depth,
                index,
                len: node.children.len(),
            })?;
        }
        Ok(node)
    }

    fn slot_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut node = self;
        for &index in path {
            node = node.children.get_mut(index)?;
        }
        Some(node)
    }

    /// Replace the subtree at `path` with `subtree`.
    ///
    /// The empty path replaces the whole tree. An unresolvable path hands the
    /// original tree back as [`Edit::NotFound`]. The invariants of `subtree`
    /// are taken as given and not re-checked.
    pub fn replace_at(mut self, path: &[usize], subtree: Node) -> Edit<Node> {
        if path.is_empty() {
            return Edit::Applied(subtree);
        }
        if let Err(err) = self.node_at(path).map(|_| ()) {
            debug!(?path, %err, "replace skipped");
            return Edit::NotFound(self);
        }
        if let Some(slot) = self.slot_mut(path) {
            *slot = subtree;
        }
        Edit::Applied(self)
    }

    /// Apply `edit` to the node at `path` and put the result back in place.
    ///
    /// The addressed node is moved out, edited and moved back; nothing is
    /// copied. The outcome of `edit` is kept and an unresolvable path yields
    /// `NotFound`.
    pub fn edit_at(mut self, path: &[usize], edit: impl FnOnce(Node) -> Edit<Node>) -> Edit<Node> {
        if let Err(err) = self.node_at(path).map(|_| ()) {
            debug!(?path, %err, "edit skipped");
            return Edit::NotFound(self);
        }
        let Some(slot) = self.slot_mut(path) else {
            return Edit::NotFound(self);
        };
        match edit(std::mem::take(slot)) {
            Edit::Applied(node) => {
                *slot = node;
                Edit::Applied(self)
            }
            Edit::Unchanged(node) => {
                *slot = node;
                Edit::Unchanged(self)
            }
            Edit::NotFound(node) => {
                *slot = node;
                Edit::NotFound(self)
            }
        }
    }

    /// Append an item to the end of the item list.
    pub fn append_item(mut self, kind: ItemKind, text: impl Into<String>) -> Node {
        self.items.push(Item::new(kind, text));
        self
    }

    /// Replace the children with one fresh child per response, all sharing `prompt`.
    ///
    /// Clears the terminal flag. With no responses the node is returned as
    /// [`Edit::Unchanged`].
    pub fn fork<I, S>(mut self, prompt: impl Into<String>, responses: I) -> Edit<Node>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prompt = prompt.into();
        let children: Vec<Node> = responses
            .into_iter()
            .map(|response| Node::option(prompt.clone(), response))
            .collect();
        if children.is_empty() {
            return Edit::Unchanged(self);
        }
        self.children = children;
        self.terminal = false;
        Edit::Applied(self)
    }

    /// Remove the item at `index`.
    pub fn remove_item(mut self, index: usize) -> Edit<Node> {
        if index >= self.items.len() {
            return Edit::NotFound(self);
        }
        self.items.remove(index);
        Edit::Applied(self)
    }

    /// Remove the child at `index` together with its whole subtree.
    pub fn remove_child(mut self, index: usize) -> Edit<Node> {
        if index >= self.children.len() {
            return Edit::NotFound(self);
        }
        self.children.remove(index);
        Edit::Applied(self)
    }

    /// Flip the terminal flag of a leaf. Nodes with children stay non-terminal.
    pub fn toggle_terminal(mut self) -> Edit<Node> {
        if !self.children.is_empty() {
            self.terminal = false;
            return Edit::Unchanged(self);
        }
        self.terminal = !self.terminal;
        Edit::Applied(self)
    }

    /// True iff every leaf reachable from this node is terminal.
    pub fn is_complete(&self) -> bool {
        if self.children.is_empty() {
            self.terminal
        } else {
            self.children.iter().all(Node::is_complete)
        }
    }

    /// Number of leaves under (and including) this node.
    pub fn leaf_count(&self) -> usize {
        if self.children.is_empty() {
            1
        } else {
            self.children.iter().map(Node::leaf_count).sum()
        }
    }

    /// Length of the longest path from this node down to a leaf.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Node {
        let left = Node::option("Which way?", "Left")
            .append_item(ItemKind::SaveMarker, "1-1")
            .fork("Open the door?", ["Yes", "No"])
            .into_inner();
        let right = Node::option("Which way?", "Right").append_item(ItemKind::Red, "Ambush");
        Node::new()
            .append_item(ItemKind::SaveMarker, "start")
            .with_children(vec![left, right, Node::option("Which way?", "Back")])
    }

    #[test]
    fn test_new_node_is_empty() {
        let node = Node::new();
        assert!(node.prompt.is_none());
        assert!(node.response.is_none());
        assert!(node.items.is_empty());
        assert!(node.children.is_empty());
        assert!(!node.terminal);
    }

    #[test]
    fn test_node_at() {
        let tree = sample_tree();

        assert_eq!(tree.node_at(&[]).unwrap(), &tree);
        assert_eq!(tree.node_at(&[1]).unwrap().response.as_deref(), Some("Right"));
        assert_eq!(tree.node_at(&[0, 1]).unwrap().response.as_deref(), Some("No"));
        assert_eq!(
            tree.node_at(&[0, 1]).unwrap().prompt.as_deref(),
            Some("Open the door?")
        );
    }

    #[test]
    fn test_node_at_out_of_range() {
        let tree = sample_tree();

        assert_eq!(
            tree.node_at(&[3]),
            Err(PathError::OutOfRange {
                depth: 0,
                index: 3,
                len: 3
            })
        );
        assert_eq!(
            tree.node_at(&[1, 0]),
            Err(PathError::OutOfRange {
                depth: 1,
                index: 0,
                len: 0
            })
        );
        assert!(tree.node_at(&[0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_replace_then_read() {
        let replacement = Node::option("Which way?", "Up").with_terminal(true);
        for path in [vec![0], vec![1], vec![2], vec![0, 0], vec![0, 1]] {
            let tree = sample_tree().replace_at(&path, replacement.clone());
            assert!(tree.is_applied());
            assert_eq!(tree.into_inner().node_at(&path).unwrap(), &replacement);
        }
    }

    #[test]
    fn test_replace_root() {
        let replacement = Node::new().append_item(ItemKind::Blue, "Fresh start");
        let tree = sample_tree().replace_at(&[], replacement.clone());
        assert_eq!(tree, Edit::Applied(replacement));
    }

    #[test]
    fn test_replace_invalid_path_is_noop() {
        let original = sample_tree();
        let tree = original.clone().replace_at(&[0, 5], Node::new());
        assert!(tree.is_not_found());
        assert_eq!(tree.into_inner(), original);
    }

    #[test]
    fn test_replace_keeps_sibling_subtrees_in_place() {
        let tree = sample_tree();
        let sibling_children = tree.children[0].children.as_ptr();
        let sibling_items = tree.children[1].items.as_ptr();

        let tree = tree.replace_at(&[2], Node::new()).into_inner();

        assert_eq!(tree.children[0].children.as_ptr(), sibling_children);
        assert_eq!(tree.children[1].items.as_ptr(), sibling_items);
    }

    #[test]
    fn test_sibling_isolation() {
        let marked = Node::option("Open the door?", "Yes").append_item(ItemKind::Green, "Treasure");
        let tree = sample_tree().replace_at(&[0, 0], marked.clone()).into_inner();

        let tree = tree
            .replace_at(&[0, 1], Node::new().with_terminal(true))
            .into_inner()
            .replace_at(&[1], Node::new())
            .into_inner();

        assert_eq!(tree.node_at(&[0, 0]).unwrap(), &marked);
    }

    #[test]
    fn test_replaced_tree_is_independent_of_input_copy() {
        let original = sample_tree();
        let snapshot = original.clone();

        let edited = original
            .replace_at(&[1], Node::new().with_terminal(true))
            .into_inner();

        assert_ne!(edited, snapshot);
        assert_eq!(snapshot.node_at(&[1]).unwrap().items.len(), 1);
    }

    #[test]
    fn test_append_item_preserves_order() {
        let node = Node::option("Test?", "Yes")
            .append_item(ItemKind::SaveMarker, "12-1")
            .append_item(ItemKind::from_code("e"), "An event")
            .append_item(ItemKind::Magenta, "Another");

        assert_eq!(node.prompt.as_deref(), Some("Test?"));
        assert_eq!(node.response.as_deref(), Some("Yes"));
        assert_eq!(node.items.len(), 3);
        assert_eq!(node.items[0], Item::save("12-1"));
        assert_eq!(node.items[1].kind, ItemKind::Default);
        assert_eq!(node.items[2].text, "Another");
    }

    #[test]
    fn test_fork_creates_one_child_per_response() {
        let node = Node::new()
            .with_terminal(true)
            .fork("Pick one", ["r1", "r2", "r3"])
            .into_inner();

        assert!(!node.terminal);
        assert_eq!(node.children.len(), 3);
        for (child, response) in node.children.iter().zip(["r1", "r2", "r3"]) {
            assert_eq!(child.prompt.as_deref(), Some("Pick one"));
            assert_eq!(child.response.as_deref(), Some(response));
            assert!(child.items.is_empty());
            assert!(child.children.is_empty());
            assert!(!child.terminal);
        }
        assert_eq!(node.fork_prompt(), Some("Pick one"));
    }

    #[test]
    fn test_fork_without_responses_is_unchanged() {
        let node = Node::new().append_item(ItemKind::Red, "Event");
        let edit = node.clone().fork("Prompt", Vec::<String>::new());
        assert_eq!(edit, Edit::Unchanged(node));
    }

    #[test]
    fn test_fork_replaces_existing_children() {
        let node = sample_tree().fork("Again?", ["Sure"]).into_inner();
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].response.as_deref(), Some("Sure"));
    }

    #[test]
    fn test_remove_item_and_child() {
        let tree = sample_tree();

        let edited = tree.clone().remove_item(0);
        assert!(edited.is_applied());
        assert!(edited.into_inner().items.is_empty());

        let edited = tree.clone().remove_child(0).into_inner();
        assert_eq!(edited.children.len(), 2);
        assert_eq!(edited.children[0].response.as_deref(), Some("Right"));

        assert!(tree.clone().remove_item(4).is_not_found());
        assert!(tree.remove_child(3).is_not_found());
    }

    #[test]
    fn test_toggle_terminal() {
        let leaf = Node::option("Q", "A").toggle_terminal().into_inner();
        assert!(leaf.terminal);
        assert!(!leaf.toggle_terminal().into_inner().terminal);

        let edit = sample_tree().toggle_terminal();
        assert!(edit.is_unchanged());
        assert!(!edit.into_inner().terminal);
    }

    #[test]
    fn test_edit_at() {
        let tree = sample_tree()
            .edit_at(&[1], |node| Edit::Applied(node.append_item(ItemKind::Cyan, "Rescue")))
            .into_inner();
        assert_eq!(tree.node_at(&[1]).unwrap().items.len(), 2);

        let edit = sample_tree().edit_at(&[7], |node| Edit::Applied(node.with_terminal(true)));
        assert!(edit.is_not_found());

        let edit = sample_tree().edit_at(&[0], Node::toggle_terminal);
        assert!(edit.is_unchanged());
    }

    #[test]
    fn test_edit_at_keeps_untouched_subtrees_in_place() {
        let tree = sample_tree();
        let grandchildren = tree.children[0].children.as_ptr();
        let sibling_items = tree.children[1].items.as_ptr();

        let tree = tree
            .edit_at(&[0], |node| Edit::Applied(node.append_item(ItemKind::Blue, "Key")))
            .into_inner();
        assert_eq!(tree.children[0].children.as_ptr(), grandchildren);
        assert_eq!(tree.children[1].items.as_ptr(), sibling_items);
        assert_eq!(tree.children[0].items.len(), 2);

        let children = tree.children.as_ptr();
        let tree = tree
            .edit_at(&[], |node| Edit::Applied(node.append_item(ItemKind::Red, "Late")))
            .into_inner();
        assert_eq!(tree.children.as_ptr(), children);
        assert_eq!(tree.children[0].children.as_ptr(), grandchildren);
        assert_eq!(tree.items.len(), 2);
    }

    #[test]
    fn test_edit_at_puts_unapplied_node_back() {
        let tree = sample_tree();
        let snapshot = tree.clone();
        let grandchildren = tree.children[0].children.as_ptr();

        let edit = tree.edit_at(&[0], Node::toggle_terminal);
        assert!(edit.is_unchanged());
        let tree = edit.into_inner();
        assert_eq!(tree, snapshot);
        assert_eq!(tree.children[0].children.as_ptr(), grandchildren);

        let edit = tree.edit_at(&[2], |node| node.remove_item(4));
        assert!(edit.is_not_found());
        assert_eq!(edit.into_inner(), snapshot);
    }

    #[test]
    fn test_is_complete() {
        assert!(!Node::new().is_complete());
        assert!(Node::new().with_terminal(true).is_complete());

        let mut tree = sample_tree();
        assert!(!tree.is_complete());

        for path in [[0, 0], [0, 1]] {
            tree = tree.edit_at(&path, Node::toggle_terminal).into_inner();
        }
        assert!(!tree.is_complete());

        for path in [[1], [2]] {
            tree = tree.edit_at(&path, Node::toggle_terminal).into_inner();
        }
        assert!(tree.is_complete());
        assert!(tree.node_at(&[0]).unwrap().is_complete());
    }

    #[test]
    fn test_leaf_count_and_depth() {
        let tree = sample_tree();
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.depth(), 2);
        assert_eq!(Node::new().depth(), 0);
    }

    #[test]
    fn test_last_save() {
        let node = Node::new()
            .append_item(ItemKind::SaveMarker, "first")
            .append_item(ItemKind::SaveMarker, "second")
            .append_item(ItemKind::Yellow, "event");
        assert_eq!(node.last_save().map(|i| i.text.as_str()), Some("second"));
        assert!(Node::new().last_save().is_none());
    }

    #[test]
    fn test_json_keys() {
        let tree = sample_tree();
        let json = serde_json::to_value(&tree).unwrap();

        assert!(json["prompt"].is_null());
        assert_eq!(json["item_list"][0]["type"], "s");
        assert_eq!(json["branch"][1]["response"], "Right");
        assert_eq!(json["end"], false);

        let loaded: Node = serde_json::from_value(json).unwrap();
        assert_eq!(loaded, tree);
    }
}

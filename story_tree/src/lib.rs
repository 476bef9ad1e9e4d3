//! # Story Tree
//!
//! Keeps track of branching interactive stories: the prompts a player was
//! asked, the responses that led down each branch, and the save markers and
//! events met along the way.
//!
//! ## Core Components
//!
//! - **node**: The recursive tree and its path-addressed edits
//! - **path**: Child-index addresses into a tree
//! - **edit**: Explicit outcomes for mutations that never fail loudly
//! - **file**: The JSON envelope a tree is saved in
//! - **view**: Colored text view of a single node
//!
//! ## Design Philosophy
//!
//! - **Owned**: A parent exclusively owns its children; edits move subtrees instead of sharing them
//! - **Forgiving**: A bad address or empty input degrades to an unchanged tree, never a panic
//! - **Stateless addressing**: Paths are derived by the caller and never stored in the tree

pub mod edit;
pub mod file;
pub mod item;
pub mod node;
pub mod path;
pub mod view;

pub use edit::*;
pub use file::*;
pub use item::*;
pub use node::*;
pub use path::*;
pub use view::*;

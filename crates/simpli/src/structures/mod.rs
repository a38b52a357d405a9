//! Small data structures: queue, stack, binary tree and binary search

mod binary_tree;
mod queue;
mod search;
mod stack;

pub use binary_tree::{BinaryTree, BinaryTreeNode, NODE_CLASS, TREE_CLASS};
pub use queue::Queue;
pub use search::{binary_search, binary_search_value};
pub use stack::Stack;

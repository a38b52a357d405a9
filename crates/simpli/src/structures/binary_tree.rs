//! Binary tree of integers
//!
//! Nodes are shared (`Rc`) so the same node can be held by a tree and by
//! dynamic code at once. `insert` fills the shallowest free slot, left
//! before right.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use super::{Queue, Stack};
use crate::types::{Presence, TypeDescriptor, expect_type, to_exact_i64};
use crate::value::{HostObject, Value};
use crate::{Result, SimpliError};

pub const NODE_CLASS: &str = "simpli.BinaryTreeNode";
pub const TREE_CLASS: &str = "simpli.BinaryTree";

#[derive(Debug)]
pub struct BinaryTreeNode {
    data: i64,
    left: RefCell<Option<Rc<BinaryTreeNode>>>,
    right: RefCell<Option<Rc<BinaryTreeNode>>>,
}

impl BinaryTreeNode {
    pub fn new(data: i64) -> Rc<Self> {
        Rc::new(Self {
            data,
            left: RefCell::new(None),
            right: RefCell::new(None),
        })
    }

    /// Node from a dynamic integer
    pub fn from_value(data: &Value) -> Result<Rc<Self>> {
        let message = "Invalid data, it should be an integer";
        expect_type(data, &TypeDescriptor::integer(), Presence::Required, message)?;
        Ok(Self::new(to_exact_i64(data, message)?))
    }

    pub fn data(&self) -> i64 {
        self.data
    }

    pub fn left(&self) -> Option<Rc<BinaryTreeNode>> {
        self.left.borrow().clone()
    }

    pub fn right(&self) -> Option<Rc<BinaryTreeNode>> {
        self.right.borrow().clone()
    }

    pub fn has_left(&self) -> bool {
        self.left.borrow().is_some()
    }

    pub fn has_right(&self) -> bool {
        self.right.borrow().is_some()
    }

    pub fn set_left(&self, node: Rc<BinaryTreeNode>) -> Result<()> {
        self.check_acyclic(&node)?;
        *self.left.borrow_mut() = Some(node);
        Ok(())
    }

    pub fn set_right(&self, node: Rc<BinaryTreeNode>) -> Result<()> {
        self.check_acyclic(&node)?;
        *self.right.borrow_mut() = Some(node);
        Ok(())
    }

    /// `setLeftNode(integer | node)`
    pub fn set_left_value(&self, node: &Value) -> Result<()> {
        self.set_left(node_from_value(node)?)
    }

    /// `setRightNode(integer | node)`
    pub fn set_right_value(&self, node: &Value) -> Result<()> {
        self.set_right(node_from_value(node)?)
    }

    /// Nodes of this subtree, including this one
    fn count(self: &Rc<Self>) -> usize {
        let mut stack = Stack::new();
        stack.push(self.clone());
        let mut count = 0;
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend_children(&node);
        }
        count
    }

    /// A node may not become a child of itself or of one of its descendants
    fn check_acyclic(&self, child: &Rc<BinaryTreeNode>) -> Result<()> {
        let mut stack = Stack::new();
        stack.push(child.clone());
        while let Some(node) = stack.pop() {
            if std::ptr::eq(Rc::as_ptr(&node), self) {
                return Err(SimpliError::invalid_argument(
                    "Invalid node, it would become its own descendant",
                ));
            }
            stack.extend_children(&node);
        }
        Ok(())
    }
}

impl Stack<Rc<BinaryTreeNode>> {
    fn extend_children(&mut self, node: &BinaryTreeNode) {
        if let Some(left) = node.left() {
            self.push(left);
        }
        if let Some(right) = node.right() {
            self.push(right);
        }
    }
}

impl HostObject for BinaryTreeNode {
    fn class_name(&self) -> &str {
        NODE_CLASS
    }

    fn property(&self, name: &str) -> Value {
        match name {
            "data" => Value::from(self.data),
            "left" => self.left().map_or(Value::Null, Value::host),
            "right" => self.right().map_or(Value::Null, Value::host),
            _ => Value::Undefined,
        }
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

fn node_descriptor() -> TypeDescriptor {
    TypeDescriptor::union([TypeDescriptor::integer(), TypeDescriptor::class_of(NODE_CLASS)])
}

/// Integer -> fresh node, node -> itself
fn node_from_value(value: &Value) -> Result<Rc<BinaryTreeNode>> {
    expect_type(
        value,
        &node_descriptor(),
        Presence::Required,
        "Invalid node, it should be an integer or simpli.BinaryTreeNode",
    )?;
    match value.downcast::<BinaryTreeNode>() {
        Some(node) => Ok(node),
        None => BinaryTreeNode::from_value(value),
    }
}

#[derive(Debug, Default)]
pub struct BinaryTree {
    root: Option<Rc<BinaryTreeNode>>,
    size: usize,
}

impl BinaryTree {
    /// Empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree rooted at `root`; its size counts the whole subtree
    pub fn with_root(root: Rc<BinaryTreeNode>) -> Self {
        Self {
            size: root.count(),
            root: Some(root),
        }
    }

    /// From nothing, an integer, a node or another tree (sharing its root)
    pub fn from_value(init: &Value) -> Result<Self> {
        let init_type = TypeDescriptor::union([
            TypeDescriptor::integer(),
            TypeDescriptor::class_of(NODE_CLASS),
            TypeDescriptor::class_of(TREE_CLASS),
        ]);
        expect_type(
            init,
            &init_type,
            Presence::Optional,
            "Invalid initialization data, it should be an integer, simpli.BinaryTreeNode or simpli.BinaryTree",
        )?;
        if init.is_nullish() {
            return Ok(Self::new());
        }
        if let Some(tree) = init.downcast::<BinaryTree>() {
            return Ok(tree.root.clone().map_or_else(Self::new, Self::with_root));
        }
        Ok(Self::with_root(node_from_value(init)?))
    }

    /// Insert `node` (and its subtree) at the shallowest free slot
    pub fn insert(&mut self, node: Rc<BinaryTreeNode>) -> Result<()> {
        let added = node.count();
        let Some(root) = self.root.clone() else {
            self.root = Some(node);
            self.size = added;
            return Ok(());
        };
        let mut queue = Queue::new();
        queue.enqueue(root);
        while let Some(current) = queue.dequeue() {
            match current.left() {
                Some(left) => queue.enqueue(left),
                None => {
                    current.set_left(node)?;
                    break;
                }
            }
            match current.right() {
                Some(right) => queue.enqueue(right),
                None => {
                    current.set_right(node)?;
                    break;
                }
            }
        }
        self.size += added;
        Ok(())
    }

    /// `insert(integer | node)`
    pub fn insert_value(&mut self, node: &Value) -> Result<()> {
        self.insert(node_from_value(node)?)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of levels; 0 for an empty tree
    pub fn height(&self) -> usize {
        let Some(root) = self.root.clone() else {
            return 0;
        };
        let mut height = 0;
        let mut level = vec![root];
        while !level.is_empty() {
            height += 1;
            level = level
                .iter()
                .flat_map(|node| node.left().into_iter().chain(node.right()))
                .collect();
        }
        height
    }

    pub fn root(&self) -> Option<Rc<BinaryTreeNode>> {
        self.root.clone()
    }

    /// Replace the root; the size is recounted
    pub fn set_root(&mut self, root: Option<Rc<BinaryTreeNode>>) {
        self.size = root.as_ref().map_or(0, BinaryTreeNode::count);
        self.root = root;
    }

    pub fn pre_order(&self) -> Vec<i64> {
        let mut result = Vec::with_capacity(self.size);
        let mut stack = Stack::new();
        if let Some(root) = self.root.clone() {
            stack.push(root);
        }
        while let Some(node) = stack.pop() {
            result.push(node.data());
            if let Some(right) = node.right() {
                stack.push(right);
            }
            if let Some(left) = node.left() {
                stack.push(left);
            }
        }
        result
    }

    pub fn in_order(&self) -> Vec<i64> {
        fn walk(node: &BinaryTreeNode, out: &mut Vec<i64>) {
            if let Some(left) = node.left() {
                walk(&left, out);
            }
            out.push(node.data());
            if let Some(right) = node.right() {
                walk(&right, out);
            }
        }
        let mut result = Vec::with_capacity(self.size);
        if let Some(root) = &self.root {
            walk(root, &mut result);
        }
        result
    }

    pub fn post_order(&self) -> Vec<i64> {
        fn walk(node: &BinaryTreeNode, out: &mut Vec<i64>) {
            if let Some(left) = node.left() {
                walk(&left, out);
            }
            if let Some(right) = node.right() {
                walk(&right, out);
            }
            out.push(node.data());
        }
        let mut result = Vec::with_capacity(self.size);
        if let Some(root) = &self.root {
            walk(root, &mut result);
        }
        result
    }

    pub fn level_order(&self) -> Vec<i64> {
        let mut result = Vec::with_capacity(self.size);
        let mut queue = Queue::new();
        if let Some(root) = self.root.clone() {
            queue.enqueue(root);
        }
        while let Some(node) = queue.dequeue() {
            result.push(node.data());
            if let Some(left) = node.left() {
                queue.enqueue(left);
            }
            if let Some(right) = node.right() {
                queue.enqueue(right);
            }
        }
        result
    }
}

impl HostObject for BinaryTree {
    fn class_name(&self) -> &str {
        TREE_CLASS
    }

    fn property(&self, name: &str) -> Value {
        match name {
            "size" => Value::from(self.size),
            "height" => Value::from(self.height()),
            "root" => self.root().map_or(Value::Null, Value::host),
            _ => Value::Undefined,
        }
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(values: &[i64]) -> BinaryTree {
        let mut tree = BinaryTree::new();
        for &v in values {
            tree.insert(BinaryTreeNode::new(v)).unwrap();
        }
        tree
    }

    #[test]
    fn test_level_order_insert() {
        let tree = tree_of(&[1, 2, 3, 4, 5]);
        assert_eq!(tree.size(), 5);
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.level_order(), vec![1, 2, 3, 4, 5]);
        assert_eq!(tree.pre_order(), vec![1, 2, 4, 5, 3]);
        assert_eq!(tree.in_order(), vec![4, 2, 5, 1, 3]);
        assert_eq!(tree.post_order(), vec![4, 5, 2, 3, 1]);
    }

    #[test]
    fn test_empty_tree() {
        let tree = BinaryTree::new();
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.height(), 0);
        assert!(tree.pre_order().is_empty());
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_from_value() {
        let tree = BinaryTree::from_value(&Value::from(7)).unwrap();
        assert_eq!(tree.level_order(), vec![7]);

        let root = BinaryTreeNode::new(1);
        root.set_left_value(&Value::from(2)).unwrap();
        root.set_right(BinaryTreeNode::new(3)).unwrap();
        let tree = BinaryTree::from_value(&Value::host(root.clone())).unwrap();
        assert_eq!(tree.size(), 3);

        let copy = BinaryTree::from_value(&Value::host(Rc::new(tree))).unwrap();
        assert_eq!(copy.size(), 3);
        assert!(copy.root().is_some_and(|r| Rc::ptr_eq(&r, &root)));

        assert!(BinaryTree::from_value(&Value::from("7")).is_err());
        assert!(BinaryTree::from_value(&Value::Null).unwrap().root().is_none());
    }

    #[test]
    fn test_node_data_is_exact() {
        let limit = crate::types::MAX_SAFE_INTEGER;
        assert_eq!(BinaryTreeNode::from_value(&Value::from(limit)).unwrap().data(), limit as i64);
        assert!(matches!(
            BinaryTreeNode::from_value(&Value::from(1e19)),
            Err(SimpliError::InvalidArgument(_))
        ));
        assert!(BinaryTree::from_value(&Value::from(-1e19)).is_err());
        assert!(BinaryTree::new().insert_value(&Value::from(2e19)).is_err());
    }

    #[test]
    fn test_cycles_rejected() {
        let root = BinaryTreeNode::new(1);
        let child = BinaryTreeNode::new(2);
        root.set_left(child.clone()).unwrap();
        assert!(child.set_right(root.clone()).is_err());
        assert!(root.set_right(root.clone()).is_err());
    }

    #[test]
    fn test_set_root_recounts() {
        let mut tree = tree_of(&[1, 2, 3]);
        tree.set_root(Some(BinaryTreeNode::new(9)));
        assert_eq!(tree.size(), 1);
        tree.set_root(None);
        assert_eq!(tree.size(), 0);
        assert!(tree.insert_value(&Value::from(2.5)).is_err());
    }
}

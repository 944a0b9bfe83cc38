//! Shared views into a rule tree
//!
//! A [`RuleView`] points at one node of a tree held behind an `Arc`.
//! Moving to a child shares the same allocation and only records the
//! branch taken, so walking a tree never copies subtrees.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::rule::ast::RuleNode;

/// Which child of a connective node to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Left,
    Right,
}

impl Branch {
    pub fn of(self, node: &RuleNode) -> Option<&RuleNode> {
        match self {
            Branch::Left => node.left(),
            Branch::Right => node.right(),
        }
    }
}

/// A node inside a shared tree, addressed by its path from the root
#[derive(Debug, Clone)]
pub struct RuleView {
    root: Arc<RuleNode>,
    path: SmallVec<[Branch; 8]>,
}

impl RuleView {
    pub fn new(root: RuleNode) -> Self {
        Self::from(Arc::new(root))
    }

    /// The whole tree this view belongs to
    pub fn root(&self) -> &Arc<RuleNode> {
        &self.root
    }

    /// Branches followed from the root to reach this node
    pub fn path(&self) -> &[Branch] {
        &self.path
    }

    /// The node this view points at
    pub fn node(&self) -> &RuleNode {
        let mut node: &RuleNode = &self.root;
        for branch in &self.path {
            // paths are only extended by `child`, after the branch was seen
            match branch.of(node) {
                Some(child) => node = child,
                None => break,
            }
        }
        node
    }

    /// View of the left or right child, `None` for leaves
    pub fn child(&self, branch: Branch) -> Option<RuleView> {
        branch.of(self.node())?;
        let mut path = self.path.clone();
        path.push(branch);
        Some(RuleView {
            root: Arc::clone(&self.root),
            path,
        })
    }
}

impl From<Arc<RuleNode>> for RuleView {
    fn from(root: Arc<RuleNode>) -> Self {
        Self {
            root,
            path: SmallVec::new(),
        }
    }
}

//! Owned syntax tree
//!
//! Nodes live in a flat arena in pre-order, so the root is always index 0 and
//! every parent precedes its children. Traversals are iterative; long
//! expression chains produce trees far deeper than a worker thread's stack
//! would tolerate recursively.

use crate::models::Position;

pub type NodeId = usize;

/// A typed node with ordered children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    /// Grammar node type (e.g. `method_declaration`, or `if` for a keyword leaf)
    pub kind: &'static str,
    /// Named nodes are grammar rules; unnamed nodes are literal tokens
    pub named: bool,
    pub start_byte: usize,
    pub end_byte: usize,
    pub start: Position,
    pub children: Vec<NodeId>,
}

impl SyntaxNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A file's syntax tree. Owns its nodes exclusively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    pub const ROOT: NodeId = 0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node under `parent` (or as the root when `None`).
    ///
    /// Nodes must be pushed in pre-order: a parent before its children,
    /// siblings left to right.
    pub fn push(
        &mut self,
        parent: Option<NodeId>,
        kind: &'static str,
        named: bool,
        span: (usize, usize),
        start: Position,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SyntaxNode {
            kind,
            named,
            start_byte: span.0,
            end_byte: span.1,
            start,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id]
    }

    pub fn root(&self) -> Option<&SyntaxNode> {
        self.nodes.first()
    }

    /// All nodes in pre-order
    pub fn nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.nodes.iter()
    }

    /// Named nodes in pre-order
    pub fn named_nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.nodes.iter().filter(|n| n.named)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &SyntaxNode> {
        self.nodes[id].children.iter().map(move |&c| &self.nodes[c])
    }

    /// Nodes whose kind is one of `kinds`
    pub fn nodes_of_kind<'a>(
        &'a self,
        kinds: &'a [&'a str],
    ) -> impl Iterator<Item = (NodeId, &'a SyntaxNode)> + 'a {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| kinds.contains(&n.kind))
    }

    /// Depth of every node, counting named ancestors including itself.
    ///
    /// Pre-order storage means a single forward pass suffices.
    pub fn named_depths(&self) -> Vec<usize> {
        let mut depths = vec![0; self.nodes.len()];
        for (id, node) in self.nodes.iter().enumerate() {
            if id == Self::ROOT {
                depths[id] = usize::from(node.named);
            }
            for &child in &node.children {
                depths[child] = depths[id] + usize::from(self.nodes[child].named);
            }
        }
        depths
    }
}

//! Depth-first walk over a type graph.
//!
//! Nodes live in an arena owned by one synthesis run and point at their parent by
//! [`NodeId`]. A subtree's nodes are dropped again with [`Traversal::truncate`] once the
//! engine is done with it, so the arena never holds more than the active path plus the
//! node being visited.

use deepcopy_core::types::{TypeArena, TypeId, TypeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub ty: TypeId,
    pub parent: Option<NodeId>,
    /// Nesting depth of the enclosing range loops; suffixes the loop variables.
    pub index: usize,
    /// Position of this node in its parent's field list when the parent is a record.
    pub field_index: usize,
}

pub struct Traversal<'a> {
    arena: &'a TypeArena,
    nodes: Vec<Node>,
}

impl<'a> Traversal<'a> {
    pub fn new(arena: &'a TypeArena, root: TypeId) -> Self {
        Self {
            arena,
            nodes: vec![Node {
                ty: root,
                parent: None,
                index: 0,
                field_index: 0,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.node(id).parent.is_none()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &'a TypeKind {
        self.arena.kind(self.node(id).ty)
    }

    pub fn parent_kind(&self, id: NodeId) -> Option<&'a TypeKind> {
        self.node(id).parent.map(|parent| self.kind(parent))
    }

    /// The next node to visit after `id`, or `None` once its subtree is exhausted.
    ///
    /// Single-child shapes step into their element; a record steps into its first
    /// field; a leaf inside a record moves on to the following sibling field.
    pub fn next(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id).clone();
        let kind = self.kind(id);
        let child_index = if kind.is_iterable() {
            node.index + 1
        } else {
            node.index
        };
        match kind {
            TypeKind::Record { .. } => self.field(id, 0),
            TypeKind::Primitive { .. } => {
                let parent = node.parent?;
                if !matches!(self.kind(parent), TypeKind::Record { .. }) {
                    return None;
                }
                self.field(parent, node.field_index + 1)
            }
            TypeKind::Channel { .. } => None,
            TypeKind::Pointer { .. }
            | TypeKind::Sequence { .. }
            | TypeKind::FixedArray { .. }
            | TypeKind::Map { .. } => {
                let elem = kind.elem()?;
                Some(self.push(Node {
                    ty: elem,
                    parent: Some(id),
                    index: child_index,
                    field_index: 0,
                }))
            }
        }
    }

    /// Node for field `field_index` of the record at `record`.
    pub fn field(&mut self, record: NodeId, field_index: usize) -> Option<NodeId> {
        let field = self.kind(record).fields().get(field_index)?;
        let index = self.node(record).index;
        Some(self.push(Node {
            ty: field.ty,
            parent: Some(record),
            index,
            field_index,
        }))
    }

    pub fn mark(&self) -> usize {
        self.nodes.len()
    }

    /// Drops every node created since `mark`.
    pub fn truncate(&mut self, mark: usize) {
        self.nodes.truncate(mark.max(1));
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }
}

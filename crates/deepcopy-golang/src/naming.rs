use deepcopy_core::types::TypeKind;

use crate::traversal::{NodeId, Traversal};

/// Names derived for one traversal node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTriple {
    /// Where the copy is written, e.g. `oCopy.A[i0]`.
    pub dest: String,
    /// Expression holding the original value, e.g. `o.A` or a range variable `v0`.
    pub source: String,
    /// Flattened identifier for locals declared at this node, e.g. `oCopy_A0`.
    pub var: String,
}

impl PathTriple {
    pub fn root(receiver: &str) -> Self {
        let dest = format!("{}Copy", receiver);
        Self {
            var: dest.clone(),
            dest,
            source: receiver.to_string(),
        }
    }

    /// The triple of `node`, given that `self` belongs to its parent.
    ///
    /// Range loops bind `i<n>, v<n>` where `n` is the parent's loop depth, so below an
    /// iterable the source collapses to `v<n>` and the destination indexes with `i<n>`.
    /// Below a pointer only the local name changes; dereferencing is left to the caller.
    pub fn child(&self, traversal: &Traversal<'_>, node: NodeId) -> Self {
        let current = traversal.node(node);
        let Some(parent) = current.parent else {
            return self.clone();
        };

        let mut triple = self.clone();
        let parent_index = traversal.node(parent).index;
        match traversal.kind(parent) {
            TypeKind::Record { fields } => {
                if let Some(field) = fields.get(current.field_index) {
                    triple.dest.push('.');
                    triple.dest.push_str(&field.name);
                    triple.source.push('.');
                    triple.source.push_str(&field.name);
                    triple.var.push('_');
                    triple.var.push_str(&field.name);
                }
            }
            TypeKind::Map { .. } | TypeKind::Sequence { .. } | TypeKind::FixedArray { .. } => {
                triple.dest = format!("{}[i{}]", triple.dest, parent_index);
                triple.source = format!("v{}", parent_index);
                triple.var = format!("{}{}", triple.var, parent_index);
            }
            TypeKind::Pointer { .. } => {
                triple.var = format!("{}{}", triple.var, current.index);
            }
            TypeKind::Primitive { .. } | TypeKind::Channel { .. } => {}
        }
        triple
    }
}

/// Derives the [`PathTriple`] of `node` from the path between it and the root.
pub fn path_triple(traversal: &Traversal<'_>, node: NodeId, receiver: &str) -> PathTriple {
    match traversal.node(node).parent {
        None => PathTriple::root(receiver),
        Some(parent) => path_triple(traversal, parent, receiver).child(traversal, node),
    }
}

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Field, Method, Namespace, Primitive, TypeDescriptor, TypeId, TypeKind};
use crate::warn;

/// Owns every descriptor of one type graph.
///
/// Ids handed out by the arena are always valid for it; graphs loaded from elsewhere go
/// through [`TypeArena::validate`] first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeArena {
    types: Vec<TypeDescriptor>,
}

impl TypeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.types.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDescriptor)> {
        self.types
            .iter()
            .enumerate()
            .map(|(index, desc)| (TypeId(index as u32), desc))
    }

    pub fn add(&mut self, desc: TypeDescriptor) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(desc);
        id
    }

    pub fn primitive(&mut self, primitive: Primitive) -> TypeId {
        self.add(TypeDescriptor::unnamed(TypeKind::Primitive { primitive }))
    }

    pub fn string(&mut self) -> TypeId {
        self.primitive(Primitive::String)
    }

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.add(TypeDescriptor::unnamed(TypeKind::Pointer { elem }))
    }

    pub fn sequence(&mut self, elem: TypeId) -> TypeId {
        self.add(TypeDescriptor::unnamed(TypeKind::Sequence { elem }))
    }

    pub fn array(&mut self, elem: TypeId, len: u64) -> TypeId {
        self.add(TypeDescriptor::unnamed(TypeKind::FixedArray { elem, len }))
    }

    pub fn map(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.add(TypeDescriptor::unnamed(TypeKind::Map { key, value }))
    }

    pub fn channel(&mut self, elem: TypeId) -> TypeId {
        self.add(TypeDescriptor::unnamed(TypeKind::Channel {
            elem,
            dir: Default::default(),
        }))
    }

    /// An anonymous `struct { ... }` literal.
    pub fn record(&mut self, fields: Vec<Field>) -> TypeId {
        self.add(TypeDescriptor::unnamed(TypeKind::Record { fields }))
    }

    pub fn named(
        &mut self,
        namespace: impl Into<Namespace>,
        name: impl Into<String>,
        kind: TypeKind,
    ) -> TypeId {
        self.add(TypeDescriptor::named(namespace, name, kind))
    }

    /// Reserves an id for a named type whose shape refers back to itself. The type is an
    /// empty record until [`TypeArena::define`] fills it in.
    pub fn declare(&mut self, namespace: impl Into<Namespace>, name: impl Into<String>) -> TypeId {
        self.named(namespace, name, TypeKind::Record { fields: Vec::new() })
    }

    pub fn define(&mut self, id: TypeId, kind: TypeKind) {
        self.types[id.index()].kind = kind;
    }

    pub fn add_method(&mut self, id: TypeId, method: Method) {
        self.types[id.index()].methods.push(method);
    }

    /// Gives `id` a `func (T) <name>() T` method.
    pub fn add_copy_method(&mut self, id: TypeId, name: &str) {
        self.add_method(
            id,
            Method {
                name: name.to_string(),
                params: Vec::new(),
                results: vec![id],
            },
        );
    }

    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self[id].kind
    }

    /// Whether `id` exposes `func (T) <method>() T`. A method of that name with any
    /// other signature does not count.
    pub fn has_copy_method(&self, id: TypeId, method: &str) -> bool {
        let Some(found) = self[id].methods.iter().find(|m| m.name == method) else {
            return false;
        };
        let matches = found.params.is_empty() && found.results.as_slice() == [id];
        if !matches {
            warn!(
                "type {} has a {} method with a mismatched signature, ignoring it",
                id, method
            );
        }
        matches
    }

    /// The first named type reached by stripping unnamed pointer, sequence, array and
    /// map wrappers, or the innermost unnamed type when there is none.
    pub fn base_named(&self, mut id: TypeId) -> TypeId {
        loop {
            let desc = &self[id];
            if desc.is_named() {
                return id;
            }
            match &desc.kind {
                TypeKind::Pointer { elem }
                | TypeKind::FixedArray { elem, .. }
                | TypeKind::Sequence { elem } => id = *elem,
                TypeKind::Map { value, .. } => id = *value,
                _ => return id,
            }
        }
    }

    /// Namespace that owns `id`, looking through unnamed wrappers.
    pub fn namespace_of(&self, id: TypeId) -> &Namespace {
        &self[self.base_named(id)].namespace
    }

    pub fn validate(&self) -> Result<()> {
        for (id, desc) in self.iter() {
            let check = |child: TypeId| -> Result<()> {
                if self.get(child).is_none() {
                    return Err(Error::descriptor(format!(
                        "type {} refers to unknown type {}",
                        id, child
                    )));
                }
                Ok(())
            };
            match &desc.kind {
                TypeKind::Primitive { .. } => {}
                TypeKind::Record { fields } => {
                    for field in fields {
                        check(field.ty)?;
                    }
                }
                TypeKind::Map { key, value } => {
                    check(*key)?;
                    check(*value)?;
                }
                TypeKind::Pointer { elem }
                | TypeKind::FixedArray { elem, .. }
                | TypeKind::Sequence { elem }
                | TypeKind::Channel { elem, .. } => check(*elem)?,
            }
            for method in &desc.methods {
                for ty in method.params.iter().chain(&method.results) {
                    check(*ty)?;
                }
            }
        }
        Ok(())
    }

    pub fn check_id(&self, id: TypeId) -> Result<()> {
        match self.get(id) {
            Some(_) => Ok(()),
            None => Err(Error::descriptor(format!(
                "unknown type {} (arena holds {} types)",
                id,
                self.len()
            ))),
        }
    }
}

impl Index<TypeId> for TypeArena {
    type Output = TypeDescriptor;

    fn index(&self, id: TypeId) -> &Self::Output {
        &self.types[id.index()]
    }
}

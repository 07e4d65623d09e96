//! Type descriptors
//!
//! A descriptor is the structural shape of a Go type, independent of any value. Types
//! refer to each other by [`TypeId`] into a [`TypeArena`], which lets recursive and
//! mutually recursive types be described without ownership cycles.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

mod arena;
mod json;
mod tag;

pub use arena::*;
pub use json::*;
pub use tag::*;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
#[display("#{_0}")]
pub struct TypeId(pub u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Import path of the package a type is declared in. Empty for built-in types.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    From,
)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn builtin() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_builtin(&self) -> bool {
        self.0.is_empty()
    }

    /// A namespace is foreign when it is a real package other than `root`.
    pub fn is_foreign_to(&self, root: &Namespace) -> bool {
        !self.is_builtin() && self != root
    }
}

impl From<&str> for Namespace {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    #[display("bool")]
    Bool,
    #[display("int")]
    Int,
    #[display("int8")]
    Int8,
    #[display("int16")]
    Int16,
    #[display("int32")]
    Int32,
    #[display("int64")]
    Int64,
    #[display("uint")]
    Uint,
    #[display("uint8")]
    Uint8,
    #[display("uint16")]
    Uint16,
    #[display("uint32")]
    Uint32,
    #[display("uint64")]
    Uint64,
    #[display("uintptr")]
    Uintptr,
    #[display("float32")]
    Float32,
    #[display("float64")]
    Float64,
    #[display("complex64")]
    Complex64,
    #[display("complex128")]
    Complex128,
    #[display("string")]
    String,
    /// Function, interface and unsafe pointer types, spelled as written. They are
    /// copied by value and never descended into.
    #[display("{_0}")]
    Opaque(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    #[default]
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    Primitive {
        primitive: Primitive,
    },
    Record {
        #[serde(default)]
        fields: Vec<Field>,
    },
    Pointer {
        elem: TypeId,
    },
    FixedArray {
        elem: TypeId,
        len: u64,
    },
    Sequence {
        elem: TypeId,
    },
    Map {
        key: TypeId,
        value: TypeId,
    },
    Channel {
        elem: TypeId,
        #[serde(default)]
        dir: ChanDir,
    },
}

impl TypeKind {
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Primitive { .. } => "primitive",
            TypeKind::Record { .. } => "record",
            TypeKind::Pointer { .. } => "pointer",
            TypeKind::FixedArray { .. } => "fixed array",
            TypeKind::Sequence { .. } => "sequence",
            TypeKind::Map { .. } => "map",
            TypeKind::Channel { .. } => "channel",
        }
    }

    /// Map, Sequence and FixedArray: shapes the generated code ranges over.
    pub fn is_iterable(&self) -> bool {
        matches!(
            self,
            TypeKind::FixedArray { .. } | TypeKind::Sequence { .. } | TypeKind::Map { .. }
        )
    }

    /// Shapes whose copy has to write into the field itself (allocate, re-point or
    /// index into it) rather than ride along with the enclosing assignment.
    pub fn needs_write_access(&self) -> bool {
        matches!(
            self,
            TypeKind::Pointer { .. }
                | TypeKind::FixedArray { .. }
                | TypeKind::Sequence { .. }
                | TypeKind::Map { .. }
        )
    }

    /// The single type visited below this one, if any. For maps this is the value
    /// type; keys are copied with the map entry.
    pub fn elem(&self) -> Option<TypeId> {
        match self {
            TypeKind::Pointer { elem }
            | TypeKind::FixedArray { elem, .. }
            | TypeKind::Sequence { elem }
            | TypeKind::Channel { elem, .. } => Some(*elem),
            TypeKind::Map { value, .. } => Some(*value),
            TypeKind::Primitive { .. } | TypeKind::Record { .. } => None,
        }
    }

    pub fn fields(&self) -> &[Field] {
        match self {
            TypeKind::Record { fields } => fields,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
    /// Raw Go struct tag, e.g. `json:"a" deepcopy:"skip"`.
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub embedded: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            tag: String::new(),
            embedded: false,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Marks the field with `deepcopy:"skip"`.
    pub fn skipped(self) -> Self {
        self.with_tag(format!("{}:\"skip\"", crate::config::DEFAULT_TAG_KEY))
    }

    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }

    pub fn is_skipped(&self, tag_key: &str) -> bool {
        lookup_tag(&self.tag, tag_key).as_deref() == Some("skip")
    }
}

/// A method in the type's method set. `params` excludes the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub params: Vec<TypeId>,
    #[serde(default)]
    pub results: Vec<TypeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// `None` for type literals such as `[]string` or `struct{ A int }`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub namespace: Namespace,
    #[serde(flatten)]
    pub kind: TypeKind,
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl TypeDescriptor {
    pub fn unnamed(kind: TypeKind) -> Self {
        Self {
            name: None,
            namespace: Namespace::builtin(),
            kind,
            methods: Vec::new(),
        }
    }

    pub fn named(namespace: impl Into<Namespace>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: Some(name.into()),
            namespace: namespace.into(),
            kind,
            methods: Vec::new(),
        }
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    /// Unnamed types are always visible; named ones follow Go's capitalisation rule.
    pub fn is_exported(&self) -> bool {
        self.name.as_deref().map(is_exported).unwrap_or(true)
    }
}

/// Go's export rule: the identifier starts with an upper case letter.
pub fn is_exported(ident: &str) -> bool {
    ident.chars().next().is_some_and(char::is_uppercase)
}

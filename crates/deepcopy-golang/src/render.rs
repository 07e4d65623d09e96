//! Spelling types as Go source.

use itertools::Itertools;

use deepcopy_core::types::{ChanDir, Field, TypeArena, TypeId, TypeKind};

use crate::imports::ImportResolver;

/// Renders type names for emitted statements. Every foreign package a rendered name
/// mentions is recorded with the [`ImportResolver`].
pub struct TypeRenderer<'a, 'r> {
    arena: &'a TypeArena,
    imports: &'r mut ImportResolver,
}

impl<'a, 'r> TypeRenderer<'a, 'r> {
    pub fn new(arena: &'a TypeArena, imports: &'r mut ImportResolver) -> Self {
        Self { arena, imports }
    }

    pub fn render(&mut self, id: TypeId) -> String {
        let arena = self.arena;
        let desc = &arena[id];
        if let Some(name) = &desc.name {
            return match self.imports.qualify(&desc.namespace) {
                Some(alias) => format!("{}.{}", alias, name),
                None => name.clone(),
            };
        }
        render_literal(&desc.kind, &mut |ty| self.render(ty))
    }
}

/// Human-readable name for logs and errors: named types are qualified with their full
/// package path and nothing is recorded as an import.
pub fn display_name(arena: &TypeArena, id: TypeId) -> String {
    let desc = &arena[id];
    if let Some(name) = &desc.name {
        if desc.namespace.is_builtin() {
            return name.clone();
        }
        return format!("{}.{}", desc.namespace, name);
    }
    render_literal(&desc.kind, &mut |ty| display_name(arena, ty))
}

fn render_literal(
    kind: &TypeKind,
    render: &mut dyn FnMut(TypeId) -> String,
) -> String {
    match kind {
        TypeKind::Primitive { primitive } => primitive.to_string(),
        TypeKind::Pointer { elem } => format!("*{}", render(*elem)),
        TypeKind::Sequence { elem } => format!("[]{}", render(*elem)),
        TypeKind::FixedArray { elem, len } => format!("[{}]{}", len, render(*elem)),
        TypeKind::Map { key, value } => format!("map[{}]{}", render(*key), render(*value)),
        TypeKind::Channel { elem, dir } => match dir {
            ChanDir::Both => format!("chan {}", render(*elem)),
            ChanDir::Send => format!("chan<- {}", render(*elem)),
            ChanDir::Recv => format!("<-chan {}", render(*elem)),
        },
        TypeKind::Record { fields } if fields.is_empty() => "struct{}".to_string(),
        TypeKind::Record { fields } => {
            let body = fields
                .iter()
                .map(|field| render_field(field, render))
                .join("; ");
            format!("struct {{ {} }}", body)
        }
    }
}

fn render_field(
    field: &Field,
    render: &mut dyn FnMut(TypeId) -> String,
) -> String {
    let ty = render(field.ty);
    // an embedded field is spelled by its type alone, `T` or `*T`
    let mut out = if field.embedded {
        ty
    } else {
        format!("{} {}", field.name, ty)
    };
    if !field.tag.is_empty() {
        out.push(' ');
        out.push_str(&quote(&field.tag));
    }
    out
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

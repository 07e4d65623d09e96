//! Deep-copy method synthesis.
//!
//! The engine walks the root type depth first and writes, per node, the statements that
//! make the destination independent of the source: guarded allocations for maps and
//! slices, a fresh local for every pointer, range loops over every iterable. Values
//! that need no deep work ride along with the nearest enclosing struct assignment.

use std::collections::HashSet;

use deepcopy_core::error::{Error, Result, TypeErrorKind};
use deepcopy_core::types::{
    is_identifier, Field, Namespace, TypeArena, TypeDocument, TypeId, TypeKind,
};
use deepcopy_core::{bail_type, debug, trace, RootNilPolicy, SynthesisOptions};

use crate::emitter::GoEmitter;
use crate::imports::ImportResolver;
use crate::naming::{path_triple, PathTriple};
use crate::render::{display_name, TypeRenderer};
use crate::traversal::{NodeId, Traversal};

/// Output of one run: the import block and the method, ready to be concatenated and
/// handed to a formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub imports: String,
    pub body: String,
}

impl Synthesis {
    pub fn to_source(&self) -> String {
        if self.imports.is_empty() {
            return self.body.clone();
        }
        format!("{}\n{}", self.imports, self.body)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    options: SynthesisOptions,
}

impl Synthesizer {
    pub fn new(options: SynthesisOptions) -> Self {
        Self { options }
    }

    /// Generates `func (<receiver> T) Copy() T` for the type `root`.
    ///
    /// Types listed in `ignore` have their visibility errors suppressed: fields that
    /// would fail because of them are left to the shallow struct copy instead.
    pub fn synthesize(
        &self,
        receiver: &str,
        arena: &TypeArena,
        root: TypeId,
        ignore: &[TypeId],
    ) -> Result<Synthesis> {
        if !is_identifier(receiver) {
            return Err(Error::descriptor(format!(
                "receiver `{}` is not a Go identifier",
                receiver
            )));
        }
        arena.check_id(root)?;
        for id in ignore {
            arena.check_id(*id)?;
        }

        debug!(
            "synthesizing {} for {} with receiver {}",
            self.options.method_name,
            display_name(arena, root),
            receiver
        );
        let mut run = Run::new(&self.options, arena, receiver, root, ignore);
        run.function()?;
        let synthesis = run.finish();
        debug!(
            "synthesized {} ({} bytes, imports: {})",
            display_name(arena, root),
            synthesis.body.len(),
            if synthesis.imports.is_empty() { "none" } else { "some" }
        );
        Ok(synthesis)
    }

    pub fn synthesize_document(&self, document: &TypeDocument) -> Result<Synthesis> {
        self.synthesize(
            &document.receiver,
            &document.types,
            document.root,
            &document.ignore,
        )
    }
}

/// [`Synthesizer::synthesize`] with default options.
pub fn synthesize(
    receiver: &str,
    arena: &TypeArena,
    root: TypeId,
    ignore: &[TypeId],
) -> Result<Synthesis> {
    Synthesizer::default().synthesize(receiver, arena, root, ignore)
}

/// State of a single synthesis run. Nothing here outlives the call.
struct Run<'a> {
    options: &'a SynthesisOptions,
    arena: &'a TypeArena,
    receiver: &'a str,
    root_namespace: Namespace,
    ignored: HashSet<TypeId>,
    tree: Traversal<'a>,
    imports: ImportResolver,
    out: GoEmitter,
    active: HashSet<TypeId>,
}

impl<'a> Run<'a> {
    fn new(
        options: &'a SynthesisOptions,
        arena: &'a TypeArena,
        receiver: &'a str,
        root: TypeId,
        ignore: &[TypeId],
    ) -> Self {
        let root_namespace = arena.namespace_of(root).clone();
        let mut imports = ImportResolver::new(root_namespace.clone());
        imports.reserve(receiver);
        Self {
            options,
            arena,
            receiver,
            root_namespace,
            ignored: ignore.iter().copied().collect(),
            tree: Traversal::new(arena, root),
            imports,
            out: GoEmitter::new(),
            active: HashSet::new(),
        }
    }

    fn finish(self) -> Synthesis {
        Synthesis {
            imports: self.imports.render(),
            body: self.out.finish(),
        }
    }

    fn render(&mut self, id: TypeId) -> String {
        TypeRenderer::new(self.arena, &mut self.imports).render(id)
    }

    fn function(&mut self) -> Result<()> {
        let root = self.tree.root();
        let root_ty = self.tree.node(root).ty;
        let name = self.render(root_ty);
        self.out.open_block(&format!(
            "func ({} {}) {}() {}",
            self.receiver, name, self.options.method_name, name
        ));
        let paths = path_triple(&self.tree, root, self.receiver);
        self.generate(root, paths)?;
        self.out.push_blank_line();
        let reference = match self.arena.kind(root_ty) {
            TypeKind::Pointer { .. } => "&",
            _ => "",
        };
        self.out.push_line(&format!("return {}{}Copy", reference, self.receiver));
        self.out.close_block();
        debug_assert_eq!(self.out.depth(), 0, "unbalanced blocks");
        Ok(())
    }

    fn generate(&mut self, node: NodeId, paths: PathTriple) -> Result<()> {
        let options = self.options;
        let ty = self.tree.node(node).ty;
        trace!(
            "visit {} {} dest={} source={} var={}",
            self.arena.kind(ty).name(),
            display_name(self.arena, ty),
            paths.dest,
            paths.source,
            paths.var
        );

        let method = options.method_name.as_str();
        if !self.tree.is_root(node) && self.arena.has_copy_method(ty, method) {
            let receiver = if paths.source.starts_with('*') {
                format!("({})", paths.source)
            } else {
                paths.source.clone()
            };
            self.out.push_line(&format!("{} = {}.{}()", paths.dest, receiver, method));
            return Ok(());
        }

        // leaves cannot recurse, channels are rejected below
        if matches!(
            self.arena.kind(ty),
            TypeKind::Primitive { .. } | TypeKind::Channel { .. }
        ) {
            return self.generate_kind(node, ty, &paths);
        }
        if !self.active.insert(ty) {
            bail_type!(
                TypeErrorKind::CyclicType,
                "type {} contains itself at {}",
                display_name(self.arena, ty),
                paths.source
            );
        }
        let result = self.generate_kind(node, ty, &paths);
        self.active.remove(&ty);
        result
    }

    fn generate_kind(&mut self, node: NodeId, ty: TypeId, paths: &PathTriple) -> Result<()> {
        let arena = self.arena;
        let is_root = self.tree.is_root(node);
        let equals = if is_root { ":=" } else { "=" };
        match arena.kind(ty) {
            TypeKind::Channel { .. } => bail_type!(
                TypeErrorKind::UnsupportedType,
                "cannot make copy of channel type {} at {}",
                display_name(self.arena, ty),
                paths.source
            ),
            TypeKind::Record { fields } => {
                if !matches!(self.tree.parent_kind(node), Some(TypeKind::Pointer { .. })) {
                    self.out.push_line(&format!("{} {} {}", paths.dest, equals, paths.source));
                }
                for (index, field) in fields.iter().enumerate() {
                    if field.is_skipped(&self.options.tag_key) {
                        debug!("skipping {}.{}: tagged skip", paths.source, field.name);
                        continue;
                    }
                    let mark = self.tree.mark();
                    if let Some(child) = self.tree.field(node, index) {
                        let child_paths = paths.child(&self.tree, child);
                        if self.check_field(ty, field, &child_paths)? {
                            self.generate(child, child_paths)?;
                        }
                    }
                    self.tree.truncate(mark);
                }
                Ok(())
            }
            TypeKind::Pointer { elem } => {
                let elem_name = self.render(*elem);
                if is_root {
                    if self.options.root_nil == RootNilPolicy::Guard {
                        self.out.open_block(&format!("if {} == nil", paths.source));
                        self.out.push_line("return nil");
                        self.out.close_block();
                    }
                } else {
                    self.out.open_block(&format!("if {} != nil", paths.source));
                }
                self.out.push_line(&format!("var {} {}", paths.var, elem_name));
                self.out.push_line(&format!("{} = *{}", paths.var, paths.source));
                if !is_root {
                    self.out.push_line(&format!("{} = &{}", paths.dest, paths.var));
                }
                self.descend(node, paths)?;
                if !is_root {
                    self.out.close_block();
                }
                Ok(())
            }
            TypeKind::FixedArray { .. } => {
                if is_root {
                    let name = self.render(ty);
                    self.out.push_line(&format!("var {} {}", paths.dest, name));
                }
                self.range_loop(node, paths)
            }
            TypeKind::Sequence { .. } | TypeKind::Map { .. } => {
                let name = self.render(ty);
                if is_root {
                    self.out.push_line(&format!(
                        "{} := make({}, len({}))",
                        paths.dest, name, paths.source
                    ));
                } else {
                    self.out.open_block(&format!("if {} != nil", paths.source));
                    self.out.push_line(&format!(
                        "{} = make({}, len({}))",
                        paths.dest, name, paths.source
                    ));
                }
                self.range_loop(node, paths)?;
                if !is_root {
                    self.out.close_block();
                }
                Ok(())
            }
            TypeKind::Primitive { .. } => {
                if matches!(
                    self.tree.parent_kind(node),
                    Some(TypeKind::Record { .. } | TypeKind::Pointer { .. })
                ) {
                    return Ok(());
                }
                self.out.push_line(&format!("{} {} {}", paths.dest, equals, paths.source));
                Ok(())
            }
        }
    }

    fn range_loop(&mut self, node: NodeId, paths: &PathTriple) -> Result<()> {
        let depth = self.tree.node(node).index;
        self.out.open_block(&format!(
            "for i{}, v{} := range {}",
            depth, depth, paths.source
        ));
        self.descend(node, paths)?;
        self.out.close_block();
        Ok(())
    }

    /// Generates the single child of a pointer, array, slice or map node.
    fn descend(&mut self, node: NodeId, paths: &PathTriple) -> Result<()> {
        let mark = self.tree.mark();
        let result = match self.tree.next(node) {
            Some(child) => {
                let mut child_paths = paths.child(&self.tree, child);
                if matches!(self.tree.kind(node), TypeKind::Pointer { .. }) {
                    dereference(&mut child_paths, paths, self.tree.kind(child));
                }
                self.generate(child, child_paths)
            }
            None => Ok(()),
        };
        self.tree.truncate(mark);
        result
    }

    /// Whether `field` of the record `owner` can be copied from outside its package.
    /// Returns `Ok(false)` when the field has to be left out because of the ignore list.
    fn check_field(&self, owner: TypeId, field: &Field, paths: &PathTriple) -> Result<bool> {
        let ignored = self.ignored.contains(&owner) || self.ignored.contains(&field.ty);

        let base = self.arena.base_named(field.ty);
        let base_desc = &self.arena[base];
        if base_desc.is_named()
            && base_desc.namespace.is_foreign_to(&self.root_namespace)
            && !base_desc.is_exported()
        {
            if ignored {
                debug!(
                    "skipping field {} of {}: unexported type {} is ignored",
                    field.name,
                    display_name(self.arena, owner),
                    display_name(self.arena, base)
                );
                return Ok(false);
            }
            bail_type!(
                TypeErrorKind::UnexportedType,
                "cannot use type: {}",
                display_name(self.arena, field.ty)
            );
        }

        if self
            .arena
            .namespace_of(owner)
            .is_foreign_to(&self.root_namespace)
            && !field.is_exported()
            && self.arena.kind(field.ty).needs_write_access()
        {
            if ignored {
                debug!(
                    "skipping unsettable field {} of ignored type {}",
                    field.name,
                    display_name(self.arena, owner)
                );
                return Ok(false);
            }
            bail_type!(
                TypeErrorKind::UnsettableField,
                "cannot make copy of type '{}' with unexported field in another package: {}",
                display_name(self.arena, owner),
                paths.source
            );
        }
        Ok(true)
    }
}

/// Points a pointee's paths at the local holding `*source`.
///
/// The pointee is written through the pointer's local, which the destination already
/// refers to. Reads go through an explicit dereference, except where Go selects and
/// ranges through the pointer itself.
fn dereference(pointee: &mut PathTriple, pointer: &PathTriple, kind: &TypeKind) {
    pointee.dest = pointer.var.clone();
    pointee.source = match kind {
        TypeKind::Record { .. } | TypeKind::FixedArray { .. } => {
            if pointer.source.starts_with('*') {
                format!("({})", pointer.source)
            } else {
                pointer.source.clone()
            }
        }
        _ => format!("*{}", pointer.source),
    };
}

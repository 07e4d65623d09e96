//! Import bookkeeping for one synthesis run.

use std::collections::{BTreeMap, HashSet};

use deepcopy_core::types::Namespace;

/// Tracks the foreign packages a generated function refers to and the alias each one
/// is imported under.
///
/// A package is only recorded through [`ImportResolver::qualify`], which the type
/// renderer calls when it actually spells a type from it, so the import block never
/// lists a package the body does not use.
#[derive(Debug)]
pub struct ImportResolver {
    root: Namespace,
    aliases: BTreeMap<Namespace, String>,
    taken: HashSet<String>,
}

impl ImportResolver {
    pub fn new(root: Namespace) -> Self {
        Self {
            root,
            aliases: BTreeMap::new(),
            taken: HashSet::new(),
        }
    }

    /// Keeps `ident` from being handed out as an alias, e.g. the receiver name.
    pub fn reserve(&mut self, ident: &str) {
        self.taken.insert(ident.to_string());
    }

    /// Alias to prefix a type from `namespace` with, recording the import. `None` for
    /// built-in types and types of the root package.
    pub fn qualify(&mut self, namespace: &Namespace) -> Option<String> {
        if !namespace.is_foreign_to(&self.root) {
            return None;
        }
        if let Some(alias) = self.aliases.get(namespace) {
            return Some(alias.clone());
        }

        let base = package_alias(namespace.as_str());
        let mut alias = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&alias) {
            alias = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        self.taken.insert(alias.clone());
        self.aliases.insert(namespace.clone(), alias.clone());
        Some(alias)
    }

    pub fn alias(&self, namespace: &Namespace) -> Option<&str> {
        self.aliases.get(namespace).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// The `import ( ... )` block, sorted by package path, or nothing when no foreign
    /// package is used.
    pub fn render(&self) -> String {
        if self.aliases.is_empty() {
            return String::new();
        }
        let mut out = String::from("import (\n");
        for (namespace, alias) in &self.aliases {
            out.push_str(&format!("\t{} \"{}\"\n", alias, namespace));
        }
        out.push_str(")\n");
        out
    }
}

/// Turns a package path into an identifier, e.g. `github.com/a/go-b` becomes
/// `github_com_a_go_b`.
pub fn package_alias(path: &str) -> String {
    let alias: String = path
        .chars()
        .map(|c| match c {
            '/' | '-' | '.' => '_',
            other => other,
        })
        .collect();
    if alias.starts_with(|c: char| c.is_ascii_digit()) {
        format!("pkg_{}", alias)
    } else {
        alias
    }
}

//! Dependency resolution and interface method collection
//!
//! Both read the finished syntax tree; neither mutates it.

use std::collections::HashSet;

use tracing::debug;

use super::syntax::{ClassDef, MethodDef, SyntaxTree};

/// Names a class depends on, grouped by how it depends on them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    pub bases: Vec<String>,
    pub interfaces: Vec<String>,
    /// Related entities and entities used as member types; may repeat
    pub references: Vec<String>,
}

impl Dependencies {
    /// Deduplicated union of every dependency in first-seen order
    pub fn imports(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.bases
            .iter()
            .chain(&self.interfaces)
            .chain(&self.references)
            .map(String::as_str)
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

/// Resolve the dependencies of the entity stored under `id`
pub fn resolve_dependencies(tree: &SyntaxTree, id: &str) -> Dependencies {
    let Some(class) = tree.get(id) else {
        return Dependencies::default();
    };
    let names = |ids: &[String]| -> Vec<String> {
        ids.iter()
            .filter_map(|id| tree.name_of(id))
            .map(str::to_string)
            .collect()
    };

    let mut deps = Dependencies {
        bases: names(&class.relationships.extends),
        interfaces: names(&class.relationships.implements),
        references: Vec::new(),
    };

    for other in class.relationships.referenced_ids() {
        if let Some(name) = tree.name_of(other) {
            if name != class.name {
                deps.references.push(name.to_string());
            }
        }
    }

    let inherited = collect_interface_methods(tree, &class.relationships.implements);
    let member_types = class
        .property_list()
        .map(|p| p.ty.as_str())
        .chain(class.method_list().chain(inherited).flat_map(method_types));

    for ty in member_types {
        if ty == class.name {
            continue;
        }
        if let Some((_, entity)) = tree.find_by_name(ty) {
            deps.references.push(entity.name.clone());
        }
    }

    deps
}

fn method_types(method: &MethodDef) -> impl Iterator<Item = &str> {
    std::iter::once(method.return_type.as_str())
        .chain(method.parameters.iter().map(|p| p.ty.as_str()))
}

/// Methods owed through an `implements` list, transitively
///
/// Each interface contributes its methods once, in depth-first order, and
/// cyclic `implements` chains terminate.
pub fn collect_interface_methods<'t>(
    tree: &'t SyntaxTree,
    implements: &[String],
) -> Vec<&'t MethodDef> {
    let mut visited = HashSet::new();
    let mut methods = Vec::new();
    for id in implements {
        visit_interface(tree, id, &mut visited, &mut methods);
    }
    methods
}

fn visit_interface<'t>(
    tree: &'t SyntaxTree,
    id: &str,
    visited: &mut HashSet<String>,
    methods: &mut Vec<&'t MethodDef>,
) {
    if !visited.insert(id.to_string()) {
        debug!(interface = id, "Interface already visited");
        return;
    }
    let Some(interface) = tree.get(id) else {
        return;
    };
    methods.extend(interface.method_list());
    for parent in &interface.relationships.implements {
        visit_interface(tree, parent, visited, methods);
    }
}

/// Inherited methods a class owes but does not declare, matched by name
pub fn owed_methods<'t>(tree: &'t SyntaxTree, class: &ClassDef) -> Vec<&'t MethodDef> {
    let mut seen = HashSet::new();
    collect_interface_methods(tree, &class.relationships.implements)
        .into_iter()
        .filter(|m| !class.declares_method(&m.name))
        .filter(|m| seen.insert(m.name.clone()))
        .collect()
}

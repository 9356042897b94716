//! Output backends
//!
//! Six object-oriented emitters and the relational emitter, all implementing
//! [`Generator`](crate::core::Generator). The [`orchestrator`] owns the closed
//! name registry and runs them.

pub mod cpp;
pub mod csharp;
pub mod java;
pub mod orchestrator;
pub mod php;
pub mod python;
pub mod sql;
pub mod typescript;

pub use cpp::CppGenerator;
pub use csharp::CSharpGenerator;
pub use java::JavaGenerator;
pub use orchestrator::{available_targets, backend_for, Orchestrator};
pub use php::PhpGenerator;
pub use python::PythonGenerator;
pub use sql::SqlGenerator;
pub use typescript::TypeScriptGenerator;

use indexmap::IndexSet;

use crate::core::{ClassContext, ClassKind};
use crate::model::owed_methods;

/// Logical types used by an entity's members; enum constants have none
pub(crate) fn used_types<'c>(ctx: &'c ClassContext<'_>) -> IndexSet<&'c str> {
    let mut types: IndexSet<&str> = IndexSet::new();
    if ctx.kind() != ClassKind::Enum {
        types.extend(ctx.properties.iter().map(|p| p.ty.as_str()));
    }

    let mut methods: Vec<_> = ctx.class.method_list().collect();
    if ctx.kind().is_class_like() {
        methods.extend(owed_methods(ctx.tree, ctx.class));
    }
    for method in methods {
        types.insert(method.return_type.as_str());
        types.extend(method.parameters.iter().map(|p| p.ty.as_str()));
    }
    types
}

/// Whether equality or string members will be emitted for this entity
pub(crate) fn emits_value_members(ctx: &ClassContext<'_>, enabled: bool) -> bool {
    enabled && ctx.kind().is_class_like() && !ctx.instance_properties().is_empty()
}

/// Replace `"text"` quoting with `'text'`
pub(crate) fn single_quoted(value: &str) -> String {
    match value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => format!("'{}'", inner.replace('\'', "''")),
        None => value.to_string(),
    }
}

//! Generator contract shared by every output backend
//!
//! A backend supplies the language-specific hooks; [`Generator::render_class`]
//! fixes the order of the sections and applies the shared policy:
//!
//! 1. header (package, imports, declaration line)
//! 2. property declarations, or enum constants
//! 3. constructors, accessors, equality and string methods (classes only)
//! 4. declared methods, then stubs for inherited interface methods
//! 5. footer
//!
//! [`Generator::generate`] writes one file per accepted entity.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, span, trace, Level};

use super::config::GeneratorConfig;
use super::error::GenerationError;
use super::types::{Access, ClassKind};
use crate::model::{
    owed_methods, resolve_dependencies, ClassDef, Dependencies, MethodDef, PropertyDef, SyntaxTree,
};

/// How a method is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodBody {
    /// Signature only, inside an interface
    Declaration,
    /// Abstract method of an abstract class
    Abstract,
    /// Declared method with a default body
    Implemented,
    /// Inherited interface method the class does not declare
    Stub,
}

impl MethodBody {
    pub fn has_body(self) -> bool {
        matches!(self, MethodBody::Implemented | MethodBody::Stub)
    }
}

/// Rough category of a logical type, used to pick default values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Void,
    Bool,
    Integer,
    Float,
    Text,
    Other,
}

impl TypeCategory {
    pub fn of(logical: &str) -> Self {
        match logical.trim().to_lowercase().as_str() {
            "void" => TypeCategory::Void,
            "bool" | "boolean" => TypeCategory::Bool,
            "int" | "int8" | "int16" | "int32" | "int64" | "uint8" | "uint16" | "uint32"
            | "uint64" | "long" | "short" | "byte" => TypeCategory::Integer,
            "float" | "double" | "decimal" | "float32" | "float64" => TypeCategory::Float,
            "string" | "wstring" | "text" | "char" => TypeCategory::Text,
            _ => TypeCategory::Other,
        }
    }
}

/// Everything a hook may look at while rendering one entity
#[derive(Debug)]
pub struct ClassContext<'a> {
    pub tree: &'a SyntaxTree,
    pub id: &'a str,
    pub class: &'a ClassDef,
    pub config: &'a GeneratorConfig,
    /// Backend name, used to look up per-target options
    pub target: &'a str,
    pub dependencies: Dependencies,
    /// Properties with `encapsulate_all_props` applied, in declaration order
    pub properties: Vec<PropertyDef>,
}

impl<'a> ClassContext<'a> {
    pub fn new(
        tree: &'a SyntaxTree,
        id: &'a str,
        class: &'a ClassDef,
        config: &'a GeneratorConfig,
        target: &'a str,
    ) -> Self {
        let properties = class
            .property_list()
            .map(|p| {
                let mut p = p.clone();
                if config.encapsulate_all_props {
                    p.access = Access::Private;
                }
                p
            })
            .collect();

        Self {
            tree,
            id,
            class,
            config,
            target,
            dependencies: resolve_dependencies(tree, id),
            properties,
        }
    }

    pub fn name(&self) -> &str {
        &self.class.name
    }

    pub fn kind(&self) -> ClassKind {
        self.class.kind
    }

    /// Properties that belong to instances
    pub fn instance_properties(&self) -> Vec<&PropertyDef> {
        self.properties.iter().filter(|p| !p.is_static()).collect()
    }

    pub fn package(&self) -> Option<&str> {
        self.config.package()
    }

    /// Base class names; enums never inherit
    pub fn bases(&self) -> &[String] {
        if self.kind() == ClassKind::Enum {
            &[]
        } else {
            &self.dependencies.bases
        }
    }

    /// Implemented interface names; enums never implement
    pub fn interfaces(&self) -> &[String] {
        if self.kind() == ClassKind::Enum {
            &[]
        } else {
            &self.dependencies.interfaces
        }
    }

    /// Other entities this one needs to import, in first-seen order
    pub fn entity_imports(&self) -> Vec<&str> {
        let mut imports = self.dependencies.imports();
        if self.kind() == ClassKind::Enum {
            imports.retain(|name| {
                !self.dependencies.bases.iter().any(|b| b == name)
                    && !self.dependencies.interfaces.iter().any(|i| i == name)
            });
        }
        imports
    }

    /// Whether interface methods will be stubbed into this class
    pub fn owes_stubs(&self) -> bool {
        self.kind().is_class_like() && !owed_methods(self.tree, self.class).is_empty()
    }

    /// Configured imports for this backend
    pub fn configured_imports(&self) -> Vec<(&str, Option<&[String]>)> {
        self.config.imports_for(self.target)
    }
}

/// One backend: a set of language hooks plus the shared rendering order
pub trait Generator: Send + Sync {
    /// Registry name, e.g. `java`
    fn name(&self) -> &'static str;

    /// File extension without the dot
    fn extension(&self) -> &'static str;

    /// Lowercase logical type to target type
    fn type_table(&self) -> &'static [(&'static str, &'static str)];

    /// Map a logical type, falling back to the input verbatim
    fn map_type(&self, logical: &str) -> String {
        let key = logical.trim().to_lowercase();
        self.type_table()
            .iter()
            .find(|(from, _)| *from == key)
            .map(|(_, to)| to.to_string())
            .unwrap_or_else(|| logical.trim().to_string())
    }

    /// Value returned by a generated method body
    fn default_value(&self, logical: &str) -> String;

    /// Whether this backend emits a file for the entity
    fn accepts(&self, _class: &ClassDef) -> bool {
        true
    }

    /// Languages with one constructor per class emit only the full-argument one
    fn single_constructor(&self) -> bool {
        false
    }

    fn file_name(&self, class: &ClassDef) -> String {
        format!("{}.{}", class.name, self.extension())
    }

    fn header(&self, ctx: &ClassContext<'_>) -> String;

    fn property(&self, ctx: &ClassContext<'_>, property: &PropertyDef) -> String;

    /// One enum member; `index` is its position among the constants
    fn enum_constant(&self, ctx: &ClassContext<'_>, property: &PropertyDef, index: usize)
        -> String;

    // Member hooks emit nothing unless overridden.

    fn default_constructor(&self, _ctx: &ClassContext<'_>) -> String {
        String::new()
    }

    fn full_arg_constructor(&self, _ctx: &ClassContext<'_>, _properties: &[&PropertyDef]) -> String {
        String::new()
    }

    fn getter(&self, _ctx: &ClassContext<'_>, _property: &PropertyDef) -> String {
        String::new()
    }

    fn setter(&self, _ctx: &ClassContext<'_>, _property: &PropertyDef) -> String {
        String::new()
    }

    fn equality(&self, _ctx: &ClassContext<'_>, _properties: &[&PropertyDef]) -> String {
        String::new()
    }

    fn string_representation(
        &self,
        _ctx: &ClassContext<'_>,
        _properties: &[&PropertyDef],
    ) -> String {
        String::new()
    }

    fn method(&self, _ctx: &ClassContext<'_>, _method: &MethodDef, _body: MethodBody) -> String {
        String::new()
    }

    fn footer(&self, ctx: &ClassContext<'_>) -> String;

    /// Render one entity in the fixed section order
    fn render_class(&self, ctx: &ClassContext<'_>) -> String {
        let kind = ctx.kind();
        let mut out = self.header(ctx);

        if kind == ClassKind::Enum {
            for (index, property) in ctx.properties.iter().enumerate() {
                out.push_str(&self.enum_constant(ctx, property, index));
            }
        } else {
            for property in &ctx.properties {
                out.push_str(&self.property(ctx, property));
            }
        }
        out.push('\n');

        if kind.is_class_like() {
            out.push_str(&self.class_members(ctx));
        }

        for method in ctx.class.method_list() {
            out.push_str(&self.method(ctx, method, body_for(kind, method)));
        }

        if kind.is_class_like() {
            for method in owed_methods(ctx.tree, ctx.class) {
                trace!(class = ctx.name(), method = %method.name, "Synthesizing stub");
                out.push_str(&self.method(ctx, method, MethodBody::Stub));
            }
        }

        out.push_str(&self.footer(ctx));
        out
    }

    /// Constructors, accessors, equality and string methods of a class
    fn class_members(&self, ctx: &ClassContext<'_>) -> String {
        let options = ctx.config.generate;
        let instance = ctx.instance_properties();
        let mut out = String::new();

        let full_arg = options.full_arg_ctor && !instance.is_empty();
        if options.default_ctor && !(full_arg && self.single_constructor()) {
            out.push_str(&self.default_constructor(ctx));
        }
        if full_arg {
            out.push_str(&self.full_arg_constructor(ctx, &instance));
        }

        for property in instance.iter().filter(|p| p.access == Access::Private) {
            out.push_str(&self.getter(ctx, property));
            if !property.constraints.is_final {
                out.push_str(&self.setter(ctx, property));
            }
        }

        if !instance.is_empty() {
            if options.equal_hashcode {
                out.push_str(&self.equality(ctx, &instance));
            }
            if options.to_string {
                out.push_str(&self.string_representation(ctx, &instance));
            }
        }
        out
    }

    /// Render every accepted entity as `(file name, contents)`
    fn render(&self, tree: &SyntaxTree, config: &GeneratorConfig) -> Result<Vec<(String, String)>> {
        Ok(tree
            .iter()
            .filter(|(_, class)| self.accepts(class))
            .map(|(id, class)| {
                let ctx = ClassContext::new(tree, id, class, config, self.name());
                (self.file_name(class), self.render_class(&ctx))
            })
            .collect())
    }

    /// Render and write every file into `out_dir`, creating it if needed
    fn generate(
        &self,
        tree: &SyntaxTree,
        config: &GeneratorConfig,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let generate_span = span!(Level::INFO, "generate", backend = self.name());
        let _enter = generate_span.enter();

        let files = self.render(tree, config)?;
        write_files(out_dir, files)
            .with_context(|| format!("Failed to write {} output", self.name()))
    }
}

/// Write rendered files into a directory
pub fn write_files(out_dir: &Path, files: Vec<(String, String)>) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir).map_err(|e| GenerationError::io(out_dir, e))?;

    let mut written = Vec::with_capacity(files.len());
    for (file_name, content) in files {
        let path = out_dir.join(&file_name);
        std::fs::write(&path, content).map_err(|e| GenerationError::io(&path, e))?;
        debug!(path = %path.display(), "Wrote file");
        written.push(path);
    }
    info!(files = written.len(), dir = %out_dir.display(), "Output written");
    Ok(written)
}

fn body_for(kind: ClassKind, method: &MethodDef) -> MethodBody {
    match kind {
        ClassKind::Interface => MethodBody::Declaration,
        ClassKind::AbstractClass
            if !(method.constraints.is_static || method.constraints.is_final) =>
        {
            MethodBody::Abstract
        }
        _ => MethodBody::Implemented,
    }
}

/// `name` with its first letter upper-cased
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Indent every non-empty line of `text`
pub fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                "\n".to_string()
            } else {
                format!("{}{}\n", prefix, line)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GenerateOptions, RelationshipKind};
    use crate::model::ConstraintSet;

    /// Records which hooks ran, one line each
    struct TraceGenerator;

    impl Generator for TraceGenerator {
        fn name(&self) -> &'static str {
            "trace"
        }
        fn extension(&self) -> &'static str {
            "txt"
        }
        fn type_table(&self) -> &'static [(&'static str, &'static str)] {
            &[("int32", "i32")]
        }
        fn default_value(&self, _logical: &str) -> String {
            "0".into()
        }
        fn header(&self, ctx: &ClassContext<'_>) -> String {
            format!("header {}\n", ctx.name())
        }
        fn property(&self, _ctx: &ClassContext<'_>, p: &PropertyDef) -> String {
            format!("property {} {}\n", p.name, p.access)
        }
        fn enum_constant(&self, _ctx: &ClassContext<'_>, p: &PropertyDef, i: usize) -> String {
            format!("constant {} {}\n", p.name, i)
        }
        fn default_constructor(&self, _ctx: &ClassContext<'_>) -> String {
            "ctor\n".into()
        }
        fn full_arg_constructor(&self, _ctx: &ClassContext<'_>, ps: &[&PropertyDef]) -> String {
            format!("ctor {}\n", ps.len())
        }
        fn getter(&self, _ctx: &ClassContext<'_>, p: &PropertyDef) -> String {
            format!("get {}\n", p.name)
        }
        fn setter(&self, _ctx: &ClassContext<'_>, p: &PropertyDef) -> String {
            format!("set {}\n", p.name)
        }
        fn equality(&self, _ctx: &ClassContext<'_>, _ps: &[&PropertyDef]) -> String {
            "equals\n".into()
        }
        fn string_representation(&self, _ctx: &ClassContext<'_>, _ps: &[&PropertyDef]) -> String {
            "to_string\n".into()
        }
        fn method(&self, _ctx: &ClassContext<'_>, m: &MethodDef, body: MethodBody) -> String {
            format!("method {} {:?}\n", m.name, body)
        }
        fn footer(&self, _ctx: &ClassContext<'_>) -> String {
            "footer\n".into()
        }
    }

    fn render_one(tree: &SyntaxTree, id: &str, config: &GeneratorConfig) -> String {
        let class = tree.get(id).unwrap();
        let ctx = ClassContext::new(tree, id, class, config, "trace");
        TraceGenerator.render_class(&ctx)
    }

    fn all_options() -> GeneratorConfig {
        GeneratorConfig::new().with_generate(GenerateOptions {
            default_ctor: true,
            full_arg_ctor: true,
            equal_hashcode: true,
            to_string: true,
        })
    }

    #[test]
    fn test_section_order_for_class() {
        let mut tree = SyntaxTree::new();
        tree.insert(
            "p",
            ClassDef::new("Person", ClassKind::Class)
                .with_property(PropertyDef::new("name", "string"))
                .with_property(PropertyDef::new("age", "int32").with_access(Access::Public))
                .with_method(MethodDef::new("greet")),
        );

        let out = render_one(&tree, "p", &all_options());
        assert_eq!(
            out,
            "header Person\nproperty name private\nproperty age public\n\n\
             ctor\nctor 2\nget name\nset name\nequals\nto_string\n\
             method greet Implemented\nfooter\n"
        );
    }

    #[test]
    fn test_enum_skips_class_sections() {
        let mut tree = SyntaxTree::new();
        tree.insert(
            "c",
            ClassDef::new("Color", ClassKind::Enum)
                .with_property(PropertyDef::new("RED", "unspecified"))
                .with_property(PropertyDef::new("GREEN", "unspecified")),
        );
        let out = render_one(&tree, "c", &all_options());
        assert_eq!(
            out,
            "header Color\nconstant RED 0\nconstant GREEN 1\n\nfooter\n"
        );
    }

    #[test]
    fn test_encapsulate_all_and_final_and_static() {
        let mut final_flag = ConstraintSet::new();
        final_flag.is_final = true;
        let mut static_flag = ConstraintSet::new();
        static_flag.is_static = true;

        let mut tree = SyntaxTree::new();
        tree.insert(
            "a",
            ClassDef::new("Account", ClassKind::Class)
                .with_property(
                    PropertyDef::new("id", "uuid")
                        .with_access(Access::Public)
                        .with_constraints(final_flag),
                )
                .with_property(PropertyDef::new("count", "int32").with_constraints(static_flag)),
        );

        let mut config = GeneratorConfig::new();
        config.encapsulate_all_props = true;
        config.generate.default_ctor = false;
        let out = render_one(&tree, "a", &config);
        assert!(out.contains("property id private"));
        assert!(out.contains("ctor 1\n"));
        assert!(out.contains("get id\n"));
        assert!(!out.contains("set id"));
        assert!(!out.contains("get count"));
    }

    #[test]
    fn test_abstract_and_interface_bodies() {
        let mut static_flag = ConstraintSet::new();
        static_flag.is_static = true;

        let mut tree = SyntaxTree::new();
        tree.insert(
            "i",
            ClassDef::new("Named", ClassKind::Interface)
                .with_method(MethodDef::new("getName").with_return_type("string")),
        );
        tree.insert(
            "s",
            ClassDef::new("Shape", ClassKind::AbstractClass)
                .with_method(MethodDef::new("area").with_return_type("double"))
                .with_method(MethodDef::new("count").with_constraints(static_flag)),
        );
        tree.link(RelationshipKind::Implements, "s", "i");

        let interface = render_one(&tree, "i", &GeneratorConfig::new());
        assert!(interface.contains("method getName Declaration"));

        let shape = render_one(&tree, "s", &GeneratorConfig::new());
        assert!(shape.contains("method area Abstract"));
        assert!(shape.contains("method count Implemented"));
        assert!(shape.contains("method getName Stub"));
    }

    #[test]
    fn test_map_type_falls_back_verbatim() {
        assert_eq!(TraceGenerator.map_type("Int32"), "i32");
        assert_eq!(TraceGenerator.map_type(" Money "), "Money");
    }

    #[test]
    fn test_type_category_and_helpers() {
        assert_eq!(TypeCategory::of("uint16"), TypeCategory::Integer);
        assert_eq!(TypeCategory::of("Boolean"), TypeCategory::Bool);
        assert_eq!(TypeCategory::of("Person"), TypeCategory::Other);
        assert_eq!(capitalize("name"), "Name");
        assert_eq!(indent("a\n\nb", "  "), "  a\n\n  b\n");
    }

    #[test]
    fn test_generate_writes_one_file_per_entity() {
        let mut tree = SyntaxTree::new();
        tree.insert("a", ClassDef::new("A", ClassKind::Class));
        tree.insert("b", ClassDef::new("B", ClassKind::Interface));

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");
        let paths = TraceGenerator
            .generate(&tree, &GeneratorConfig::new(), &out)
            .unwrap();
        assert_eq!(paths, vec![out.join("A.txt"), out.join("B.txt")]);
        assert!(std::fs::read_to_string(&paths[0]).unwrap().starts_with("header A"));
    }
}

//! Python backend
//!
//! Private and protected attributes are stored with a leading underscore and
//! exposed through `@property` accessors. Entities used only in annotations
//! are imported under `TYPE_CHECKING` so bidirectional associations do not
//! produce import cycles.

use indexmap::{IndexMap, IndexSet};

use super::used_types;
use crate::core::{Access, ClassContext, ClassKind, Generator, MethodBody, TypeCategory};
use crate::model::{owed_methods, MethodDef, PropertyDef};

const TYPES: &[(&str, &str)] = &[
    ("string", "str"),
    ("wstring", "str"),
    ("text", "str"),
    ("char", "str"),
    ("bool", "bool"),
    ("boolean", "bool"),
    ("int8", "int"),
    ("int16", "int"),
    ("int32", "int"),
    ("int64", "int"),
    ("uint8", "int"),
    ("uint16", "int"),
    ("uint32", "int"),
    ("uint64", "int"),
    ("int", "int"),
    ("long", "int"),
    ("short", "int"),
    ("byte", "int"),
    ("float", "float"),
    ("float32", "float"),
    ("double", "float"),
    ("float64", "float"),
    ("decimal", "Decimal"),
    ("date", "date"),
    ("time", "time"),
    ("datetime", "datetime"),
    ("uuid", "UUID"),
    ("bytes", "bytes"),
    ("void", "None"),
    ("unspecified", "Any"),
];

/// Mapped type to the module it is imported from
const STD_IMPORTS: &[(&str, &str)] = &[
    ("Decimal", "decimal"),
    ("date", "datetime"),
    ("time", "datetime"),
    ("datetime", "datetime"),
    ("UUID", "uuid"),
    ("Any", "typing"),
];

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, Default)]
pub struct PythonGenerator;

impl PythonGenerator {
    pub fn new() -> Self {
        Self
    }

    fn parameters(&self, method: &MethodDef) -> String {
        let mut params = Vec::new();
        if !method.constraints.is_static {
            params.push("self".to_string());
        }
        params.extend(
            method
                .parameters
                .iter()
                .map(|p| format!("{}: {}", p.name, self.map_type(&p.ty))),
        );
        params.join(", ")
    }

    fn std_imports(&self, ctx: &ClassContext<'_>) -> IndexMap<&'static str, IndexSet<&'static str>> {
        let mut modules: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
        let mut add = |module: &'static str, name: &'static str| {
            modules.entry(module).or_default().insert(name);
        };

        match ctx.kind() {
            ClassKind::Interface | ClassKind::AbstractClass => {
                add("abc", "ABC");
                add("abc", "abstractmethod");
            }
            ClassKind::Enum => {
                add("enum", "Enum");
                if ctx.properties.iter().any(|p| p.default_value.is_none()) {
                    add("enum", "auto");
                }
            }
            ClassKind::Class => {}
        }
        for ty in used_types(ctx) {
            let mapped = self.map_type(ty);
            if let Some((name, module)) = STD_IMPORTS.iter().find(|(name, _)| *name == mapped) {
                add(module, name);
            }
        }
        if ctx.kind() != ClassKind::Enum && ctx.properties.iter().any(|p| p.is_static()) {
            add("typing", "ClassVar");
        }
        if !self.annotation_only_entities(ctx).is_empty() {
            add("typing", "TYPE_CHECKING");
        }
        modules
    }

    fn module_path(&self, ctx: &ClassContext<'_>, entity: &str) -> String {
        match ctx.package() {
            Some(package) => format!("{}.{}", package, entity),
            None => entity.to_string(),
        }
    }

    /// Referenced entities that are not base classes
    fn annotation_only_entities<'c>(&self, ctx: &'c ClassContext<'_>) -> Vec<&'c str> {
        let parents: Vec<&str> = ctx
            .bases()
            .iter()
            .chain(ctx.interfaces())
            .map(String::as_str)
            .collect();
        ctx.entity_imports()
            .into_iter()
            .filter(|name| !parents.contains(name))
            .collect()
    }

    fn has_body(&self, ctx: &ClassContext<'_>) -> bool {
        if !ctx.properties.is_empty() || !ctx.class.methods.is_empty() {
            return true;
        }
        if !ctx.kind().is_class_like() {
            return false;
        }
        let options = ctx.config.generate;
        options.default_ctor
            || (options.full_arg_ctor && !ctx.instance_properties().is_empty())
            || !owed_methods(ctx.tree, ctx.class).is_empty()
    }

    fn super_call(&self, ctx: &ClassContext<'_>) -> String {
        if ctx.bases().is_empty() {
            String::new()
        } else {
            format!("{0}{0}super().__init__()\n", INDENT)
        }
    }
}

fn attribute(property: &PropertyDef) -> String {
    match property.access {
        Access::Public => property.name.clone(),
        Access::Protected | Access::Private => format!("_{}", property.name),
    }
}

fn tuple(items: &[String]) -> String {
    if items.len() == 1 {
        format!("({},)", items[0])
    } else {
        format!("({})", items.join(", "))
    }
}

impl Generator for PythonGenerator {
    fn name(&self) -> &'static str {
        "python"
    }

    fn extension(&self) -> &'static str {
        "py"
    }

    fn type_table(&self) -> &'static [(&'static str, &'static str)] {
        TYPES
    }

    fn default_value(&self, logical: &str) -> String {
        if logical.trim().eq_ignore_ascii_case("decimal") {
            return "Decimal(0)".to_string();
        }
        match TypeCategory::of(logical) {
            TypeCategory::Bool => "False",
            TypeCategory::Integer => "0",
            TypeCategory::Float => "0.0",
            TypeCategory::Text => "\"\"",
            TypeCategory::Void | TypeCategory::Other => "None",
        }
        .to_string()
    }

    fn single_constructor(&self) -> bool {
        true
    }

    fn header(&self, ctx: &ClassContext<'_>) -> String {
        let mut out = String::from("from __future__ import annotations\n\n");

        let std_imports = self.std_imports(ctx);
        for (module, names) in &std_imports {
            let names: Vec<&str> = names.iter().copied().collect();
            out.push_str(&format!("from {} import {}\n", module, names.join(", ")));
        }

        let mut local = String::new();
        for (module, symbols) in ctx.configured_imports() {
            match symbols {
                Some(symbols) => {
                    local.push_str(&format!("from {} import {}\n", module, symbols.join(", ")))
                }
                None => local.push_str(&format!("import {}\n", module)),
            }
        }
        for parent in ctx.bases().iter().chain(ctx.interfaces()) {
            local.push_str(&format!(
                "from {} import {}\n",
                self.module_path(ctx, parent),
                parent
            ));
        }
        let deferred = self.annotation_only_entities(ctx);
        if !deferred.is_empty() {
            if !local.is_empty() {
                local.push('\n');
            }
            local.push_str("if TYPE_CHECKING:\n");
            for entity in deferred {
                local.push_str(&format!(
                    "{}from {} import {}\n",
                    INDENT,
                    self.module_path(ctx, entity),
                    entity
                ));
            }
        }
        if !local.is_empty() {
            if !std_imports.is_empty() {
                out.push('\n');
            }
            out.push_str(&local);
        }
        out.push_str("\n\n");

        let mut parents: Vec<&str> = ctx
            .bases()
            .iter()
            .chain(ctx.interfaces())
            .map(String::as_str)
            .collect();
        match ctx.kind() {
            ClassKind::Enum => parents.push("Enum"),
            ClassKind::Interface | ClassKind::AbstractClass if parents.is_empty() => {
                parents.push("ABC")
            }
            _ => {}
        }
        if parents.is_empty() {
            out.push_str(&format!("class {}:\n", ctx.name()));
        } else {
            out.push_str(&format!("class {}({}):\n", ctx.name(), parents.join(", ")));
        }
        out
    }

    fn property(&self, _ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        let ty = self.map_type(&property.ty);
        if property.is_static() {
            let value = property.default_value.as_deref().unwrap_or("None");
            return format!("{}{}: ClassVar[{}] = {}\n", INDENT, attribute(property), ty, value);
        }
        match &property.default_value {
            Some(value) => format!("{}{}: {} = {}\n", INDENT, attribute(property), ty, value),
            None => format!("{}{}: {}\n", INDENT, attribute(property), ty),
        }
    }

    fn enum_constant(
        &self,
        _ctx: &ClassContext<'_>,
        property: &PropertyDef,
        _index: usize,
    ) -> String {
        let value = property.default_value.as_deref().unwrap_or("auto()");
        format!("{}{} = {}\n", INDENT, property.name, value)
    }

    fn default_constructor(&self, ctx: &ClassContext<'_>) -> String {
        let mut body = self.super_call(ctx);
        for property in ctx.instance_properties() {
            let value = property.default_value.as_deref().unwrap_or("None");
            body.push_str(&format!("{0}{0}self.{1} = {2}\n", INDENT, attribute(property), value));
        }
        if body.is_empty() {
            body = format!("{0}{0}pass\n", INDENT);
        }
        format!("{}def __init__(self) -> None:\n{}\n", INDENT, body)
    }

    fn full_arg_constructor(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let mut params = vec!["self".to_string()];
        params.extend(
            properties
                .iter()
                .map(|p| format!("{}: {}", p.name, self.map_type(&p.ty))),
        );
        let mut body = self.super_call(ctx);
        for p in properties {
            body.push_str(&format!("{0}{0}self.{1} = {2}\n", INDENT, attribute(p), p.name));
        }
        format!(
            "{}def __init__({}) -> None:\n{}\n",
            INDENT,
            params.join(", "),
            body
        )
    }

    fn getter(&self, _ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        format!(
            "{0}@property\n{0}def {1}(self) -> {2}:\n{0}{0}return self.{3}\n\n",
            INDENT,
            property.name,
            self.map_type(&property.ty),
            attribute(property)
        )
    }

    fn setter(&self, _ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        format!(
            "{0}@{1}.setter\n{0}def {1}(self, value: {2}) -> None:\n{0}{0}self.{3} = value\n\n",
            INDENT,
            property.name,
            self.map_type(&property.ty),
            attribute(property)
        )
    }

    fn equality(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let mine: Vec<String> = properties
            .iter()
            .map(|p| format!("self.{}", attribute(p)))
            .collect();
        let theirs: Vec<String> = properties
            .iter()
            .map(|p| format!("other.{}", attribute(p)))
            .collect();
        format!(
            "{0}def __eq__(self, other: object) -> bool:\n\
             {0}{0}if not isinstance(other, {1}):\n\
             {0}{0}{0}return NotImplemented\n\
             {0}{0}return {2} == {3}\n\n\
             {0}def __hash__(self) -> int:\n\
             {0}{0}return hash({2})\n\n",
            INDENT,
            ctx.name(),
            tuple(&mine),
            tuple(&theirs)
        )
    }

    fn string_representation(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let fields: Vec<String> = properties
            .iter()
            .map(|p| format!("{}={{self.{}!r}}", p.name, attribute(p)))
            .collect();
        format!(
            "{0}def __repr__(self) -> str:\n{0}{0}return f\"{1}({2})\"\n\n",
            INDENT,
            ctx.name(),
            fields.join(", ")
        )
    }

    fn method(&self, _ctx: &ClassContext<'_>, method: &MethodDef, body: MethodBody) -> String {
        let mut out = String::new();
        if method.constraints.is_static {
            out.push_str(&format!("{}@staticmethod\n", INDENT));
        }
        if !body.has_body() {
            out.push_str(&format!("{}@abstractmethod\n", INDENT));
        }
        out.push_str(&format!(
            "{}def {}({}) -> {}:\n",
            INDENT,
            method.name,
            self.parameters(method),
            self.map_type(&method.return_type)
        ));
        let statement = if !body.has_body() {
            "...".to_string()
        } else if body == MethodBody::Stub {
            "raise NotImplementedError".to_string()
        } else if method.returns_void() {
            "pass".to_string()
        } else {
            format!("return {}", self.default_value(&method.return_type))
        };
        out + &format!("{0}{0}{1}\n\n", INDENT, statement)
    }

    fn footer(&self, ctx: &ClassContext<'_>) -> String {
        if self.has_body(ctx) {
            String::new()
        } else {
            format!("{}pass\n", INDENT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::emits_value_members;
    use crate::core::{GeneratorConfig, RelationshipKind};
    use crate::model::{ClassDef, ConstraintSet, SyntaxTree};

    fn render(tree: &SyntaxTree, id: &str, config: &GeneratorConfig) -> String {
        let class = tree.get(id).unwrap();
        PythonGenerator.render_class(&ClassContext::new(tree, id, class, config, "python"))
    }

    #[test]
    fn test_single_constructor_and_properties() {
        let mut tree = SyntaxTree::new();
        tree.insert(
            "p",
            ClassDef::new("Person", ClassKind::Class)
                .with_property(PropertyDef::new("name", "string"))
                .with_property(PropertyDef::new("born", "date").with_access(Access::Public)),
        );
        let out = render(&tree, "p", &GeneratorConfig::new());

        assert!(out.starts_with("from __future__ import annotations\n\nfrom datetime import date\n\n\nclass Person:\n"));
        assert!(out.contains("    _name: str\n    born: date\n"));
        assert!(!out.contains("def __init__(self) -> None"));
        assert!(out.contains(
            "    def __init__(self, name: str, born: date) -> None:\n        self._name = name\n        self.born = born\n"
        ));
        assert!(out.contains("    @property\n    def name(self) -> str:\n        return self._name\n"));
        assert!(out.contains("    @name.setter\n    def name(self, value: str) -> None:\n"));
    }

    #[test]
    fn test_interface_and_references() {
        let mut tree = SyntaxTree::new();
        tree.insert(
            "n",
            ClassDef::new("Named", ClassKind::Interface).with_method(
                MethodDef::new("label")
                    .with_parameter("owner", "Person")
                    .with_return_type("string"),
            ),
        );
        tree.insert("p", ClassDef::new("Person", ClassKind::Class));
        tree.link(RelationshipKind::Implements, "p", "n");

        let named = render(&tree, "n", &GeneratorConfig::new().with_package("app"));
        assert!(named.contains("from abc import ABC, abstractmethod\nfrom typing import TYPE_CHECKING\n"));
        assert!(named.contains("if TYPE_CHECKING:\n    from app.Person import Person\n"));
        assert!(named.contains("class Named(ABC):\n"));
        assert!(named.contains(
            "    @abstractmethod\n    def label(self, owner: Person) -> str:\n        ...\n"
        ));

        let person = render(&tree, "p", &GeneratorConfig::new().with_package("app"));
        assert!(person.contains("from app.Named import Named\n"));
        assert!(person.contains("class Person(Named):\n"));
        assert!(person.contains(
            "    def label(self, owner: Person) -> str:\n        raise NotImplementedError\n"
        ));
    }

    #[test]
    fn test_enum_and_empty_body() {
        let mut tree = SyntaxTree::new();
        tree.insert(
            "e",
            ClassDef::new("Color", ClassKind::Enum)
                .with_property(PropertyDef::new("RED", "unspecified"))
                .with_property(PropertyDef::new("BLUE", "unspecified").with_default("7")),
        );
        tree.insert("m", ClassDef::new("Marker", ClassKind::Interface));

        let color = render(&tree, "e", &GeneratorConfig::new());
        assert!(color.contains("from enum import Enum, auto\n"));
        assert!(color.contains("class Color(Enum):\n    RED = auto()\n    BLUE = 7\n"));

        let marker = render(&tree, "m", &GeneratorConfig::new());
        assert!(marker.ends_with("class Marker(ABC):\n\n    pass\n"));
    }

    #[test]
    fn test_equality_repr_and_static() {
        let mut static_flag = ConstraintSet::new();
        static_flag.is_static = true;

        let mut tree = SyntaxTree::new();
        tree.insert(
            "c",
            ClassDef::new("Counter", ClassKind::Class)
                .with_property(PropertyDef::new("value", "int32"))
                .with_property(
                    PropertyDef::new("instances", "int32")
                        .with_default("0")
                        .with_constraints(static_flag),
                ),
        );
        let mut config = GeneratorConfig::new();
        config.generate.equal_hashcode = true;
        config.generate.to_string = true;
        let class = tree.get("c").unwrap();
        let ctx = ClassContext::new(&tree, "c", class, &config, "python");
        assert!(emits_value_members(&ctx, config.generate.equal_hashcode));

        let out = PythonGenerator.render_class(&ctx);
        assert!(out.contains("from typing import ClassVar\n"));
        assert!(out.contains("    _instances: ClassVar[int] = 0\n"));
        assert!(out.contains("        return (self._value,) == (other._value,)\n"));
        assert!(out.contains("        return hash((self._value,))\n"));
        assert!(out.contains("        return f\"Counter(value={self._value!r})\"\n"));
    }
}

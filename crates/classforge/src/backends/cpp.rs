//! C++ backend
//!
//! Emits header-only classes (`.h`) with inline member definitions. Every
//! member carries its own access label.

use indexmap::IndexSet;

use super::{emits_value_members, used_types};
use crate::core::generator::capitalize;
use crate::core::{Access, ClassContext, ClassKind, Generator, MethodBody, TypeCategory};
use crate::model::{MethodDef, PropertyDef};

const TYPES: &[(&str, &str)] = &[
    ("string", "std::string"),
    ("text", "std::string"),
    ("wstring", "std::wstring"),
    ("char", "char"),
    ("bool", "bool"),
    ("boolean", "bool"),
    ("int8", "std::int8_t"),
    ("byte", "std::int8_t"),
    ("int16", "std::int16_t"),
    ("short", "std::int16_t"),
    ("int32", "std::int32_t"),
    ("int", "std::int32_t"),
    ("int64", "std::int64_t"),
    ("long", "std::int64_t"),
    ("uint8", "std::uint8_t"),
    ("uint16", "std::uint16_t"),
    ("uint32", "std::uint32_t"),
    ("uint64", "std::uint64_t"),
    ("float", "float"),
    ("float32", "float"),
    ("double", "double"),
    ("float64", "double"),
    ("decimal", "double"),
    ("date", "std::chrono::year_month_day"),
    ("time", "std::chrono::seconds"),
    ("datetime", "std::chrono::system_clock::time_point"),
    ("uuid", "std::string"),
    ("bytes", "std::vector<std::uint8_t>"),
    ("void", "void"),
    ("unspecified", "std::any"),
];

/// Standard header needed by a mapped type, matched by substring
const STD_HEADERS: &[(&str, &str)] = &[
    ("std::string", "string"),
    ("std::wstring", "string"),
    ("std::int", "cstdint"),
    ("std::uint", "cstdint"),
    ("std::chrono", "chrono"),
    ("std::vector", "vector"),
    ("std::any", "any"),
];

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, Default)]
pub struct CppGenerator;

impl CppGenerator {
    pub fn new() -> Self {
        Self
    }

    fn parameters(&self, method: &MethodDef) -> String {
        method
            .parameters
            .iter()
            .map(|p| format!("{} {}", self.map_type(&p.ty), p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn includes(&self, ctx: &ClassContext<'_>) -> IndexSet<String> {
        let mut includes = IndexSet::new();
        for ty in used_types(ctx) {
            let mapped = self.map_type(ty);
            for (fragment, header) in STD_HEADERS {
                if mapped.contains(fragment) {
                    includes.insert(format!("<{}>", header));
                }
            }
        }
        if emits_value_members(ctx, ctx.config.generate.to_string) {
            includes.insert("<sstream>".to_string());
            includes.insert("<string>".to_string());
        }
        if ctx.owes_stubs() {
            includes.insert("<stdexcept>".to_string());
        }
        for (module, _) in ctx.configured_imports() {
            includes.insert(format!("<{}>", module));
        }
        for entity in ctx.entity_imports() {
            includes.insert(format!("\"{}.h\"", entity));
        }
        includes
    }
}

fn label(access: Access) -> String {
    format!("{}:\n", access.keyword())
}

impl Generator for CppGenerator {
    fn name(&self) -> &'static str {
        "cpp"
    }

    fn extension(&self) -> &'static str {
        "h"
    }

    fn type_table(&self) -> &'static [(&'static str, &'static str)] {
        TYPES
    }

    fn default_value(&self, logical: &str) -> String {
        match TypeCategory::of(logical) {
            TypeCategory::Bool => "false",
            TypeCategory::Integer => "0",
            TypeCategory::Float => "0.0",
            _ => "{}",
        }
        .to_string()
    }

    fn header(&self, ctx: &ClassContext<'_>) -> String {
        let mut out = String::from("#pragma once\n\n");
        let includes = self.includes(ctx);
        for include in &includes {
            out.push_str(&format!("#include {}\n", include));
        }
        if !includes.is_empty() {
            out.push('\n');
        }

        if let Some(package) = ctx.package() {
            out.push_str(&format!("namespace {} {{\n\n", package.replace('.', "::")));
        }

        let name = ctx.name();
        if ctx.kind() == ClassKind::Enum {
            return out + &format!("enum class {} {{\n", name);
        }

        let parents: Vec<String> = ctx
            .bases()
            .iter()
            .chain(ctx.interfaces())
            .map(|parent| format!("public {}", parent))
            .collect();
        out.push_str(&format!("class {}", name));
        if !parents.is_empty() {
            out.push_str(&format!(" : {}", parents.join(", ")));
        }
        out.push_str(" {\n");

        if ctx.kind() == ClassKind::Interface {
            out.push_str(&format!("public:\n{}virtual ~{}() = default;\n\n", INDENT, name));
        }
        out
    }

    fn property(&self, ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        let mut line = String::from(INDENT);
        if property.constraints.is_static {
            line.push_str("inline static ");
        }
        if property.constraints.is_final && property.default_value.is_some() {
            line.push_str("const ");
        }
        line.push_str(&format!("{} {}", self.map_type(&property.ty), property.name));
        if let Some(value) = &property.default_value {
            line.push_str(&format!(" = {}", value));
        }
        let access = if ctx.kind() == ClassKind::Interface {
            Access::Public
        } else {
            property.access
        };
        format!("{}{};\n", label(access), line)
    }

    fn enum_constant(
        &self,
        _ctx: &ClassContext<'_>,
        property: &PropertyDef,
        _index: usize,
    ) -> String {
        match &property.default_value {
            Some(value) => format!("{}{} = {},\n", INDENT, property.name, value),
            None => format!("{}{},\n", INDENT, property.name),
        }
    }

    fn default_constructor(&self, ctx: &ClassContext<'_>) -> String {
        format!("public:\n{}{}() = default;\n\n", INDENT, ctx.name())
    }

    fn full_arg_constructor(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let params: Vec<String> = properties
            .iter()
            .map(|p| format!("{} {}", self.map_type(&p.ty), p.name))
            .collect();
        let inits: Vec<String> = properties
            .iter()
            .map(|p| format!("{0}({0})", p.name))
            .collect();
        format!(
            "public:\n{0}{1}({2})\n{0}{0}: {3} {{}}\n\n",
            INDENT,
            ctx.name(),
            params.join(", "),
            inits.join(", ")
        )
    }

    fn getter(&self, _ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        format!(
            "public:\n{0}{1} get{2}() const {{ return {3}; }}\n\n",
            INDENT,
            self.map_type(&property.ty),
            capitalize(&property.name),
            property.name
        )
    }

    fn setter(&self, _ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        format!(
            "public:\n{0}void set{1}(const {2}& value) {{ {3} = value; }}\n\n",
            INDENT,
            capitalize(&property.name),
            self.map_type(&property.ty),
            property.name
        )
    }

    fn equality(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let comparisons: Vec<String> = properties
            .iter()
            .map(|p| format!("{0} == other.{0}", p.name))
            .collect();
        let separator = format!("\n{0}{0}{0}&& ", INDENT);
        format!(
            "public:\n{0}bool operator==(const {1}& other) const {{\n{0}{0}return {2};\n{0}}}\n\n\
             {0}bool operator!=(const {1}& other) const {{ return !(*this == other); }}\n\n",
            INDENT,
            ctx.name(),
            comparisons.join(separator.as_str())
        )
    }

    fn string_representation(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let mut out = format!(
            "public:\n{0}std::string toString() const {{\n{0}{0}std::ostringstream out;\n{0}{0}out << \"{1}{{\"",
            INDENT,
            ctx.name()
        );
        for (i, p) in properties.iter().enumerate() {
            let separator = if i == 0 { "" } else { ", " };
            out.push_str(&format!(" << \"{}{}=\" << {}", separator, p.name, p.name));
        }
        out + &format!(" << \"}}\";\n{0}{0}return out.str();\n{0}}}\n\n", INDENT)
    }

    fn method(&self, ctx: &ClassContext<'_>, method: &MethodDef, body: MethodBody) -> String {
        if ctx.kind() == ClassKind::Enum {
            return String::new();
        }
        let signature = format!(
            "{} {}({})",
            self.map_type(&method.return_type),
            method.name,
            self.parameters(method)
        );
        let block = if method.returns_void() {
            "{}".to_string()
        } else {
            format!("{{ return {}; }}", self.default_value(&method.return_type))
        };

        match body {
            MethodBody::Declaration | MethodBody::Abstract => format!(
                "{}{}virtual {} = 0;\n\n",
                label(if body == MethodBody::Declaration {
                    Access::Public
                } else {
                    method.access
                }),
                INDENT,
                signature
            ),
            MethodBody::Implemented => {
                let prefix = if method.constraints.is_static {
                    "static "
                } else if method.constraints.is_virtual {
                    "virtual "
                } else {
                    ""
                };
                let suffix = if method.constraints.is_final && !method.constraints.is_static {
                    " final"
                } else {
                    ""
                };
                format!(
                    "{}{}{}{}{} {}\n\n",
                    label(method.access),
                    INDENT,
                    prefix,
                    signature,
                    suffix,
                    block
                )
            }
            MethodBody::Stub => format!(
                "{}{}{} override {{ throw std::logic_error(\"Not implemented\"); }}\n\n",
                label(Access::Public),
                INDENT,
                signature
            ),
        }
    }

    fn footer(&self, ctx: &ClassContext<'_>) -> String {
        let mut out = String::from("};\n");
        if let Some(package) = ctx.package() {
            out.push_str(&format!("\n}}  // namespace {}\n", package.replace('.', "::")));
        }
        out
    }
}

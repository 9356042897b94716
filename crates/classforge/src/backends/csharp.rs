//! C# backend
//!
//! Accessors are emitted as C# properties over the private fields, so the
//! setter hook folds into the getter.

use crate::core::generator::capitalize;
use crate::core::{ClassContext, ClassKind, Generator, MethodBody};
use crate::model::{MethodDef, PropertyDef};

const TYPES: &[(&str, &str)] = &[
    ("string", "string"),
    ("wstring", "string"),
    ("text", "string"),
    ("char", "char"),
    ("bool", "bool"),
    ("boolean", "bool"),
    ("int8", "sbyte"),
    ("int16", "short"),
    ("short", "short"),
    ("int32", "int"),
    ("int", "int"),
    ("int64", "long"),
    ("long", "long"),
    ("uint8", "byte"),
    ("byte", "byte"),
    ("uint16", "ushort"),
    ("uint32", "uint"),
    ("uint64", "ulong"),
    ("float", "float"),
    ("float32", "float"),
    ("double", "double"),
    ("float64", "double"),
    ("decimal", "decimal"),
    ("date", "DateOnly"),
    ("time", "TimeOnly"),
    ("datetime", "DateTime"),
    ("uuid", "Guid"),
    ("bytes", "byte[]"),
    ("void", "void"),
    ("unspecified", "object"),
];

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpGenerator;

impl CSharpGenerator {
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

    fn block(&self, method: &MethodDef) -> String {
        let mut out = format!("{}{{\n", INDENT);
        if !method.returns_void() {
            out.push_str(&format!(
                "{0}{0}return {1};\n",
                INDENT,
                self.default_value(&method.return_type)
            ));
        }
        out + &format!("{}}}\n\n", INDENT)
    }
}

impl Generator for CSharpGenerator {
    fn name(&self) -> &'static str {
        "csharp"
    }

    fn extension(&self) -> &'static str {
        "cs"
    }

    fn type_table(&self) -> &'static [(&'static str, &'static str)] {
        TYPES
    }

    fn default_value(&self, _logical: &str) -> String {
        "default".to_string()
    }

    fn header(&self, ctx: &ClassContext<'_>) -> String {
        let mut out = String::from("using System;\n");
        let mut seen = vec!["System"];
        for (module, _) in ctx.configured_imports() {
            if !seen.contains(&module) {
                out.push_str(&format!("using {};\n", module));
                seen.push(module);
            }
        }
        out.push('\n');

        if let Some(package) = ctx.package() {
            out.push_str(&format!("namespace {};\n\n", package));
        }

        let parents: Vec<&str> = ctx
            .bases()
            .iter()
            .take(if ctx.kind() == ClassKind::Interface { usize::MAX } else { 1 })
            .chain(ctx.interfaces())
            .map(String::as_str)
            .collect();
        let keyword = match ctx.kind() {
            ClassKind::Class => "class",
            ClassKind::AbstractClass => "abstract class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
        };
        out.push_str(&format!("public {} {}", keyword, ctx.name()));
        if !parents.is_empty() {
            out.push_str(&format!(" : {}", parents.join(", ")));
        }
        out + "\n{\n"
    }

    fn property(&self, ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        let ty = self.map_type(&property.ty);
        if ctx.kind() == ClassKind::Interface {
            return format!("{}{} {} {{ get; set; }}\n", INDENT, ty, capitalize(&property.name));
        }

        let mut words = vec![property.access.keyword()];
        if property.constraints.is_static {
            words.push("static");
        }
        if property.constraints.is_final {
            words.push("readonly");
        }
        let mut line = format!("{}{} {} {}", INDENT, words.join(" "), ty, property.name);
        if let Some(value) = &property.default_value {
            line.push_str(&format!(" = {}", value));
        }
        line + ";\n"
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
        format!("{0}public {1}()\n{0}{{\n{0}}}\n\n", INDENT, ctx.name())
    }

    fn full_arg_constructor(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let params: Vec<String> = properties
            .iter()
            .map(|p| format!("{} {}", self.map_type(&p.ty), p.name))
            .collect();
        let mut out = format!(
            "{0}public {1}({2})\n{0}{{\n",
            INDENT,
            ctx.name(),
            params.join(", ")
        );
        for p in properties {
            out.push_str(&format!("{0}{0}this.{1} = {1};\n", INDENT, p.name));
        }
        out + &format!("{}}}\n\n", INDENT)
    }

    fn getter(&self, _ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        let ty = self.map_type(&property.ty);
        let name = capitalize(&property.name);
        if property.constraints.is_final {
            return format!("{}public {} {} => this.{};\n\n", INDENT, ty, name, property.name);
        }
        format!(
            "{0}public {1} {2}\n{0}{{\n{0}{0}get => this.{3};\n{0}{0}set => this.{3} = value;\n{0}}}\n\n",
            INDENT, ty, name, property.name
        )
    }

    fn equality(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let mut out = format!(
            "{0}public override bool Equals(object? obj)\n{0}{{\n{0}{0}return obj is {1} other",
            INDENT,
            ctx.name()
        );
        for p in properties {
            out.push_str(&format!(
                "\n{0}{0}{0}&& Equals(this.{1}, other.{1})",
                INDENT, p.name
            ));
        }
        out.push_str(&format!(";\n{}}}\n\n", INDENT));

        out.push_str(&format!(
            "{0}public override int GetHashCode()\n{0}{{\n{0}{0}var hash = new HashCode();\n",
            INDENT
        ));
        for p in properties {
            out.push_str(&format!("{0}{0}hash.Add(this.{1});\n", INDENT, p.name));
        }
        out + &format!("{0}{0}return hash.ToHashCode();\n{0}}}\n\n", INDENT)
    }

    fn string_representation(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let fields: Vec<String> = properties
            .iter()
            .map(|p| format!("{0}={{this.{0}}}", p.name))
            .collect();
        format!(
            "{0}public override string ToString()\n{0}{{\n{0}{0}return $\"{1}({2})\";\n{0}}}\n\n",
            INDENT,
            ctx.name(),
            fields.join(", ")
        )
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
        match body {
            MethodBody::Declaration => format!("{}{};\n\n", INDENT, signature),
            MethodBody::Abstract => format!(
                "{}{} abstract {};\n\n",
                INDENT,
                method.access.overridable().keyword(),
                signature
            ),
            MethodBody::Implemented => {
                let mut words = vec![method.access.keyword()];
                if method.constraints.is_static {
                    words.push("static");
                } else if method.constraints.is_virtual {
                    words.push("virtual");
                }
                format!("{}{} {}\n{}", INDENT, words.join(" "), signature, self.block(method))
            }
            MethodBody::Stub => format!(
                "{0}public {1}\n{0}{{\n{0}{0}throw new NotImplementedException();\n{0}}}\n\n",
                INDENT, signature
            ),
        }
    }

    fn footer(&self, _ctx: &ClassContext<'_>) -> String {
        "}\n".to_string()
    }
}

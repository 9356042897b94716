//! Java backend

use indexmap::IndexSet;

use super::{emits_value_members, used_types};
use crate::core::generator::capitalize;
use crate::core::{Access, ClassContext, ClassKind, Generator, MethodBody};
use crate::model::{ConstraintSet, MethodDef, PropertyDef};

const TYPES: &[(&str, &str)] = &[
    ("string", "String"),
    ("wstring", "String"),
    ("text", "String"),
    ("char", "char"),
    ("bool", "boolean"),
    ("boolean", "boolean"),
    ("int8", "byte"),
    ("byte", "byte"),
    ("int16", "short"),
    ("short", "short"),
    ("int32", "int"),
    ("int", "int"),
    ("int64", "long"),
    ("long", "long"),
    ("uint8", "short"),
    ("uint16", "int"),
    ("uint32", "long"),
    ("uint64", "long"),
    ("float", "float"),
    ("float32", "float"),
    ("double", "double"),
    ("float64", "double"),
    ("decimal", "BigDecimal"),
    ("date", "LocalDate"),
    ("time", "LocalTime"),
    ("datetime", "LocalDateTime"),
    ("uuid", "UUID"),
    ("bytes", "byte[]"),
    ("void", "void"),
    ("unspecified", "Object"),
];

/// Mapped types that live outside `java.lang`
const STD_IMPORTS: &[(&str, &str)] = &[
    ("BigDecimal", "java.math.BigDecimal"),
    ("LocalDate", "java.time.LocalDate"),
    ("LocalTime", "java.time.LocalTime"),
    ("LocalDateTime", "java.time.LocalDateTime"),
    ("UUID", "java.util.UUID"),
];

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, Default)]
pub struct JavaGenerator;

impl JavaGenerator {
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

    fn body(&self, method: &MethodDef) -> String {
        if method.returns_void() {
            String::new()
        } else {
            format!("{0}{0}return {1};\n", INDENT, self.default_value(&method.return_type))
        }
    }

    fn declaration(&self, ctx: &ClassContext<'_>) -> String {
        let name = ctx.name();
        match ctx.kind() {
            ClassKind::Enum => format!("public enum {} {{\n", name),
            ClassKind::Interface => {
                let parents: Vec<&str> = ctx
                    .bases()
                    .iter()
                    .chain(ctx.interfaces())
                    .map(String::as_str)
                    .collect();
                let mut line = format!("public interface {}", name);
                if !parents.is_empty() {
                    line.push_str(&format!(" extends {}", parents.join(", ")));
                }
                line + " {\n"
            }
            kind => {
                let mut line = if kind == ClassKind::AbstractClass {
                    format!("public abstract class {}", name)
                } else {
                    format!("public class {}", name)
                };
                // Single inheritance: only the first base is kept.
                if let Some(base) = ctx.bases().first() {
                    line.push_str(&format!(" extends {}", base));
                }
                if !ctx.interfaces().is_empty() {
                    line.push_str(&format!(" implements {}", ctx.interfaces().join(", ")));
                }
                line + " {\n"
            }
        }
    }
}

fn modifiers(access: Access, constraints: &ConstraintSet) -> String {
    let mut words = vec![access.keyword()];
    if constraints.is_static {
        words.push("static");
    }
    if constraints.is_final {
        words.push("final");
    }
    words.join(" ")
}

impl Generator for JavaGenerator {
    fn name(&self) -> &'static str {
        "java"
    }

    fn extension(&self) -> &'static str {
        "java"
    }

    fn type_table(&self) -> &'static [(&'static str, &'static str)] {
        TYPES
    }

    fn default_value(&self, logical: &str) -> String {
        match logical.trim().to_lowercase().as_str() {
            "bool" | "boolean" => "false",
            "char" => "'\\0'",
            "int8" | "byte" | "int16" | "short" | "int32" | "int" | "uint8" | "uint16" => "0",
            "int64" | "long" | "uint32" | "uint64" => "0L",
            "float" | "float32" => "0.0f",
            "double" | "float64" => "0.0",
            "decimal" => "BigDecimal.ZERO",
            _ => "null",
        }
        .to_string()
    }

    fn header(&self, ctx: &ClassContext<'_>) -> String {
        let mut out = String::new();
        if let Some(package) = ctx.package() {
            out.push_str(&format!("package {};\n\n", package));
        }

        let mut imports: IndexSet<String> = IndexSet::new();
        for (module, symbols) in ctx.configured_imports() {
            match symbols {
                Some(symbols) => {
                    imports.extend(symbols.iter().map(|s| format!("{}.{}", module, s)));
                }
                None => {
                    imports.insert(format!("{}.*", module));
                }
            }
        }
        for ty in used_types(ctx) {
            let mapped = self.map_type(ty);
            if let Some((_, path)) = STD_IMPORTS.iter().find(|(name, _)| *name == mapped) {
                imports.insert(path.to_string());
            }
        }
        if emits_value_members(ctx, ctx.config.generate.equal_hashcode) {
            imports.insert("java.util.Objects".to_string());
        }

        for import in &imports {
            out.push_str(&format!("import {};\n", import));
        }
        if !imports.is_empty() {
            out.push('\n');
        }

        out.push_str(&self.declaration(ctx));
        out
    }

    fn property(&self, ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        let ty = self.map_type(&property.ty);
        if ctx.kind() == ClassKind::Interface {
            // Interface fields are implicit constants and need a value.
            let value = property
                .default_value
                .clone()
                .unwrap_or_else(|| self.default_value(&property.ty));
            return format!("{}{} {} = {};\n", INDENT, ty, property.name, value);
        }

        let mut constraints = property.constraints.clone();
        // Only initialized static fields can be final; instance fields are
        // assigned by the full-argument constructor.
        constraints.is_final &= property.is_static() && property.default_value.is_some();
        let mut line = format!(
            "{}{} {} {}",
            INDENT,
            modifiers(property.access, &constraints),
            ty,
            property.name
        );
        if let Some(value) = &property.default_value {
            line.push_str(&format!(" = {}", value));
        }
        line + ";\n"
    }

    fn enum_constant(
        &self,
        ctx: &ClassContext<'_>,
        property: &PropertyDef,
        index: usize,
    ) -> String {
        let separator = if index + 1 == ctx.properties.len() { ';' } else { ',' };
        match &property.default_value {
            Some(value) => format!("{}{}{} // = {}\n", INDENT, property.name, separator, value),
            None => format!("{}{}{}\n", INDENT, property.name, separator),
        }
    }

    fn default_constructor(&self, ctx: &ClassContext<'_>) -> String {
        format!("{0}public {1}() {{\n{0}}}\n\n", INDENT, ctx.name())
    }

    fn full_arg_constructor(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let params: Vec<String> = properties
            .iter()
            .map(|p| format!("{} {}", self.map_type(&p.ty), p.name))
            .collect();
        let mut out = format!("{}public {}({}) {{\n", INDENT, ctx.name(), params.join(", "));
        for p in properties {
            out.push_str(&format!("{0}{0}this.{1} = {1};\n", INDENT, p.name));
        }
        out + &format!("{}}}\n\n", INDENT)
    }

    fn getter(&self, _ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        format!(
            "{0}public {1} get{2}() {{\n{0}{0}return this.{3};\n{0}}}\n\n",
            INDENT,
            self.map_type(&property.ty),
            capitalize(&property.name),
            property.name
        )
    }

    fn setter(&self, _ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        format!(
            "{0}public void set{1}({2} {3}) {{\n{0}{0}this.{3} = {3};\n{0}}}\n\n",
            INDENT,
            capitalize(&property.name),
            self.map_type(&property.ty),
            property.name
        )
    }

    fn equality(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let comparisons: Vec<String> = properties
            .iter()
            .map(|p| format!("Objects.equals({0}, other.{0})", p.name))
            .collect();
        let names: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();

        let mut out = format!("{}@Override\n", INDENT);
        out.push_str(&format!("{}public boolean equals(Object o) {{\n", INDENT));
        out.push_str(&format!("{0}{0}if (this == o) {{\n{0}{0}{0}return true;\n{0}{0}}}\n", INDENT));
        out.push_str(&format!(
            "{0}{0}if (o == null || getClass() != o.getClass()) {{\n{0}{0}{0}return false;\n{0}{0}}}\n",
            INDENT
        ));
        out.push_str(&format!("{0}{0}{1} other = ({1}) o;\n", INDENT, ctx.name()));
        let separator = format!("\n{0}{0}{0}&& ", INDENT);
        out.push_str(&format!(
            "{0}{0}return {1};\n{0}}}\n\n",
            INDENT,
            comparisons.join(separator.as_str())
        ));
        out.push_str(&format!(
            "{0}@Override\n{0}public int hashCode() {{\n{0}{0}return Objects.hash({1});\n{0}}}\n\n",
            INDENT,
            names.join(", ")
        ));
        out
    }

    fn string_representation(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let fields: Vec<String> = properties
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let separator = if i == 0 { "" } else { ", " };
                format!("{0}{0}{0}\"{1}{2}=\" + {2} +\n", INDENT, separator, p.name)
            })
            .collect();
        format!(
            "{0}@Override\n{0}public String toString() {{\n{0}{0}return \"{1}{{\" +\n{2}{0}{0}{0}\"}}\";\n{0}}}\n\n",
            INDENT,
            ctx.name(),
            fields.concat()
        )
    }

    fn method(&self, _ctx: &ClassContext<'_>, method: &MethodDef, body: MethodBody) -> String {
        let signature = format!(
            "{} {}({})",
            self.map_type(&method.return_type),
            method.name,
            self.parameters(method)
        );
        match body {
            MethodBody::Declaration if method.constraints.is_static => format!(
                "{0}static {1} {{\n{2}{0}}}\n\n",
                INDENT,
                signature,
                self.body(method)
            ),
            MethodBody::Declaration => format!("{}{};\n\n", INDENT, signature),
            MethodBody::Abstract => format!(
                "{}{} abstract {};\n\n",
                INDENT,
                method.access.overridable().keyword(),
                signature
            ),
            MethodBody::Implemented => format!(
                "{0}{1} {2} {{\n{3}{0}}}\n\n",
                INDENT,
                modifiers(method.access, &method.constraints),
                signature,
                self.body(method)
            ),
            MethodBody::Stub => format!(
                "{0}@Override\n{0}public {1} {{\n{0}{0}throw new UnsupportedOperationException(\"Not implemented\");\n{0}}}\n\n",
                INDENT,
                signature
            ),
        }
    }

    fn footer(&self, _ctx: &ClassContext<'_>) -> String {
        "}\n".to_string()
    }
}

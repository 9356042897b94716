//! TypeScript backend
//!
//! Private instance fields are stored as `_name` behind `get`/`set`
//! accessors. Enums carry constants only.

use crate::core::{Access, ClassContext, ClassKind, Generator, MethodBody, TypeCategory};
use crate::model::{MethodDef, PropertyDef};

const TYPES: &[(&str, &str)] = &[
    ("string", "string"),
    ("wstring", "string"),
    ("text", "string"),
    ("char", "string"),
    ("uuid", "string"),
    ("bool", "boolean"),
    ("boolean", "boolean"),
    ("int8", "number"),
    ("int16", "number"),
    ("int32", "number"),
    ("int64", "number"),
    ("uint8", "number"),
    ("uint16", "number"),
    ("uint32", "number"),
    ("uint64", "number"),
    ("int", "number"),
    ("long", "number"),
    ("short", "number"),
    ("byte", "number"),
    ("float", "number"),
    ("float32", "number"),
    ("double", "number"),
    ("float64", "number"),
    ("decimal", "number"),
    ("date", "Date"),
    ("time", "Date"),
    ("datetime", "Date"),
    ("bytes", "Uint8Array"),
    ("void", "void"),
    ("unspecified", "unknown"),
];

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptGenerator;

impl TypeScriptGenerator {
    pub fn new() -> Self {
        Self
    }

    fn signature(&self, method: &MethodDef) -> String {
        let params: Vec<String> = method
            .parameters
            .iter()
            .map(|p| format!("{}: {}", p.name, self.map_type(&p.ty)))
            .collect();
        format!(
            "{}({}): {}",
            method.name,
            params.join(", "),
            self.map_type(&method.return_type)
        )
    }

    fn block(&self, method: &MethodDef) -> String {
        let mut out = String::from(" {\n");
        if !method.returns_void() {
            out.push_str(&format!(
                "{0}{0}return {1};\n",
                INDENT,
                self.default_value(&method.return_type)
            ));
        }
        out + &format!("{}}}\n\n", INDENT)
    }

    fn stub_block(&self) -> String {
        format!(
            " {{\n{0}{0}throw new Error(\"Not implemented\");\n{0}}}\n\n",
            INDENT
        )
    }

    fn super_call(&self, ctx: &ClassContext<'_>) -> String {
        if ctx.bases().is_empty() {
            String::new()
        } else {
            format!("{0}{0}super();\n", INDENT)
        }
    }
}

/// Backing field name: private instance state hides behind accessors
fn field(property: &PropertyDef) -> String {
    if property.access == Access::Private && !property.is_static() {
        format!("_{}", property.name)
    } else {
        property.name.clone()
    }
}

impl Generator for TypeScriptGenerator {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn extension(&self) -> &'static str {
        "ts"
    }

    fn type_table(&self) -> &'static [(&'static str, &'static str)] {
        TYPES
    }

    fn default_value(&self, logical: &str) -> String {
        match TypeCategory::of(logical) {
            TypeCategory::Bool => "false",
            TypeCategory::Integer | TypeCategory::Float => "0",
            TypeCategory::Text => "\"\"",
            TypeCategory::Void | TypeCategory::Other => "undefined as never",
        }
        .to_string()
    }

    fn single_constructor(&self) -> bool {
        true
    }

    fn header(&self, ctx: &ClassContext<'_>) -> String {
        let mut out = String::new();
        for (module, symbols) in ctx.configured_imports() {
            match symbols {
                Some(symbols) => out.push_str(&format!(
                    "import {{ {} }} from \"{}\";\n",
                    symbols.join(", "),
                    module
                )),
                None => out.push_str(&format!("import \"{}\";\n", module)),
            }
        }
        for entity in ctx.entity_imports() {
            out.push_str(&format!("import {{ {0} }} from \"./{0}\";\n", entity));
        }
        if !out.is_empty() {
            out.push('\n');
        }

        let name = ctx.name();
        match ctx.kind() {
            ClassKind::Enum => out.push_str(&format!("export enum {} {{\n", name)),
            ClassKind::Interface => {
                let parents: Vec<&str> = ctx
                    .bases()
                    .iter()
                    .chain(ctx.interfaces())
                    .map(String::as_str)
                    .collect();
                out.push_str(&format!("export interface {}", name));
                if !parents.is_empty() {
                    out.push_str(&format!(" extends {}", parents.join(", ")));
                }
                out.push_str(" {\n");
            }
            kind => {
                let keyword = if kind == ClassKind::AbstractClass {
                    "abstract class"
                } else {
                    "class"
                };
                out.push_str(&format!("export {} {}", keyword, name));
                if let Some(base) = ctx.bases().first() {
                    out.push_str(&format!(" extends {}", base));
                }
                if !ctx.interfaces().is_empty() {
                    out.push_str(&format!(" implements {}", ctx.interfaces().join(", ")));
                }
                out.push_str(" {\n");
            }
        }
        out
    }

    fn property(&self, ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        let ty = self.map_type(&property.ty);
        let readonly = if property.constraints.is_final { "readonly " } else { "" };
        if ctx.kind() == ClassKind::Interface {
            return format!("{}{}{}: {};\n", INDENT, readonly, property.name, ty);
        }

        let mut words = vec![property.access.keyword()];
        if property.is_static() {
            words.push("static");
        }
        let mut line = format!(
            "{}{} {}{}: {}",
            INDENT,
            words.join(" "),
            readonly,
            field(property),
            ty
        );
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
        format!("{0}constructor() {{\n{1}{0}}}\n\n", INDENT, self.super_call(ctx))
    }

    fn full_arg_constructor(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let params: Vec<String> = properties
            .iter()
            .map(|p| format!("{}: {}", p.name, self.map_type(&p.ty)))
            .collect();
        let mut out = format!(
            "{}constructor({}) {{\n{}",
            INDENT,
            params.join(", "),
            self.super_call(ctx)
        );
        for p in properties {
            out.push_str(&format!("{0}{0}this.{1} = {2};\n", INDENT, field(p), p.name));
        }
        out + &format!("{}}}\n\n", INDENT)
    }

    fn getter(&self, _ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        format!(
            "{0}get {1}(): {2} {{\n{0}{0}return this.{3};\n{0}}}\n\n",
            INDENT,
            property.name,
            self.map_type(&property.ty),
            field(property)
        )
    }

    fn setter(&self, _ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        format!(
            "{0}set {1}(value: {2}) {{\n{0}{0}this.{3} = value;\n{0}}}\n\n",
            INDENT,
            property.name,
            self.map_type(&property.ty),
            field(property)
        )
    }

    fn equality(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let comparisons: Vec<String> = properties
            .iter()
            .map(|p| format!("this.{0} === other.{0}", field(p)))
            .collect();
        let separator = format!("\n{0}{0}{0}&& ", INDENT);
        format!(
            "{0}equals(other: {1}): boolean {{\n{0}{0}return {2};\n{0}}}\n\n",
            INDENT,
            ctx.name(),
            comparisons.join(separator.as_str())
        )
    }

    fn string_representation(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let fields: Vec<String> = properties
            .iter()
            .map(|p| format!("{}=${{this.{}}}", p.name, field(p)))
            .collect();
        format!(
            "{0}toString(): string {{\n{0}{0}return `{1}({2})`;\n{0}}}\n\n",
            INDENT,
            ctx.name(),
            fields.join(", ")
        )
    }

    fn method(&self, ctx: &ClassContext<'_>, method: &MethodDef, body: MethodBody) -> String {
        if ctx.kind() == ClassKind::Enum {
            return String::new();
        }
        let signature = self.signature(method);
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
                }
                format!(
                    "{}{} {}{}",
                    INDENT,
                    words.join(" "),
                    signature,
                    self.block(method)
                )
            }
            MethodBody::Stub => format!("{}public {}{}", INDENT, signature, self.stub_block()),
        }
    }

    fn footer(&self, _ctx: &ClassContext<'_>) -> String {
        "}\n".to_string()
    }
}

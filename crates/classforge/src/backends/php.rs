//! PHP 8.1 backend

use indexmap::IndexSet;

use crate::core::generator::capitalize;
use crate::core::{ClassContext, ClassKind, Generator, MethodBody, TypeCategory};
use crate::model::{MethodDef, PropertyDef};

const TYPES: &[(&str, &str)] = &[
    ("string", "string"),
    ("wstring", "string"),
    ("text", "string"),
    ("char", "string"),
    ("uuid", "string"),
    ("bytes", "string"),
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
    ("decimal", "float"),
    ("date", "\\DateTimeImmutable"),
    ("time", "\\DateTimeImmutable"),
    ("datetime", "\\DateTimeImmutable"),
    ("void", "void"),
    ("unspecified", "mixed"),
];

const INDENT: &str = "    ";

/// Backing type of an enum, decided from its constant values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backing {
    Pure,
    Int,
    Text,
}

impl Backing {
    fn of(properties: &[PropertyDef]) -> Self {
        let values: Vec<&str> = properties
            .iter()
            .filter_map(|p| p.default_value.as_deref())
            .collect();
        if values.is_empty() {
            Backing::Pure
        } else if values.iter().all(|v| v.trim().parse::<i64>().is_ok()) {
            Backing::Int
        } else {
            Backing::Text
        }
    }
}

/// Value of an unvalued case in an int-backed enum: one past the previous case
fn implicit_int(properties: &[PropertyDef], index: usize) -> i64 {
    let mut next = 0;
    for property in properties.iter().take(index + 1) {
        let value = property
            .default_value
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(next);
        next = value + 1;
    }
    next - 1
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PhpGenerator;

impl PhpGenerator {
    pub fn new() -> Self {
        Self
    }

    fn signature(&self, method: &MethodDef) -> String {
        let params: Vec<String> = method
            .parameters
            .iter()
            .map(|p| format!("{} ${}", self.map_type(&p.ty), p.name))
            .collect();
        format!(
            "function {}({}): {}",
            method.name,
            params.join(", "),
            self.map_type(&method.return_type)
        )
    }

    fn block(&self, method: &MethodDef) -> String {
        let mut out = format!("\n{}{{\n", INDENT);
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
            "\n{0}{{\n{0}{0}throw new \\LogicException('Not implemented');\n{0}}}\n\n",
            INDENT
        )
    }

    fn parent_call(&self, ctx: &ClassContext<'_>) -> String {
        if ctx.bases().is_empty() {
            String::new()
        } else {
            format!("{0}{0}parent::__construct();\n", INDENT)
        }
    }
}

impl Generator for PhpGenerator {
    fn name(&self) -> &'static str {
        "php"
    }

    fn extension(&self) -> &'static str {
        "php"
    }

    fn type_table(&self) -> &'static [(&'static str, &'static str)] {
        TYPES
    }

    fn default_value(&self, logical: &str) -> String {
        match TypeCategory::of(logical) {
            TypeCategory::Bool => "false",
            TypeCategory::Integer => "0",
            TypeCategory::Float => "0.0",
            TypeCategory::Text => "''",
            TypeCategory::Void | TypeCategory::Other => "null",
        }
        .to_string()
    }

    fn single_constructor(&self) -> bool {
        true
    }

    fn header(&self, ctx: &ClassContext<'_>) -> String {
        let mut out = String::from("<?php\n\ndeclare(strict_types=1);\n\n");
        if let Some(package) = ctx.package() {
            out.push_str(&format!("namespace {};\n\n", package.replace('.', "\\")));
        }

        let mut uses: IndexSet<String> = IndexSet::new();
        for (module, symbols) in ctx.configured_imports() {
            let module = module.replace('.', "\\");
            match symbols {
                Some(symbols) => {
                    uses.extend(symbols.iter().map(|s| format!("{}\\{}", module, s)))
                }
                None => {
                    uses.insert(module);
                }
            }
        }
        for import in &uses {
            out.push_str(&format!("use {};\n", import));
        }
        if !uses.is_empty() {
            out.push('\n');
        }

        let name = ctx.name();
        match ctx.kind() {
            ClassKind::Enum => match Backing::of(&ctx.properties) {
                Backing::Pure => out.push_str(&format!("enum {}\n", name)),
                Backing::Int => out.push_str(&format!("enum {}: int\n", name)),
                Backing::Text => out.push_str(&format!("enum {}: string\n", name)),
            },
            ClassKind::Interface => {
                let parents: Vec<&str> = ctx
                    .bases()
                    .iter()
                    .chain(ctx.interfaces())
                    .map(String::as_str)
                    .collect();
                out.push_str(&format!("interface {}", name));
                if !parents.is_empty() {
                    out.push_str(&format!(" extends {}", parents.join(", ")));
                }
                out.push('\n');
            }
            kind => {
                if kind == ClassKind::AbstractClass {
                    out.push_str("abstract ");
                }
                out.push_str(&format!("class {}", name));
                if let Some(base) = ctx.bases().first() {
                    out.push_str(&format!(" extends {}", base));
                }
                if !ctx.interfaces().is_empty() {
                    out.push_str(&format!(" implements {}", ctx.interfaces().join(", ")));
                }
                out.push('\n');
            }
        }
        out + "{\n"
    }

    fn property(&self, ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        if ctx.kind() == ClassKind::Interface {
            // Interfaces only hold constants.
            return match &property.default_value {
                Some(value) => format!("{}public const {} = {};\n", INDENT, property.name, value),
                None => String::new(),
            };
        }

        let mut words = vec![property.access.keyword()];
        if property.is_static() {
            words.push("static");
        } else if property.constraints.is_final {
            words.push("readonly");
        }
        let mut line = format!(
            "{}{} {} ${}",
            INDENT,
            words.join(" "),
            self.map_type(&property.ty),
            property.name
        );
        if let Some(value) = &property.default_value {
            line.push_str(&format!(" = {}", value));
        }
        line + ";\n"
    }

    fn enum_constant(&self, ctx: &ClassContext<'_>, property: &PropertyDef, index: usize) -> String {
        let value = match (Backing::of(&ctx.properties), &property.default_value) {
            (Backing::Pure, _) => None,
            (_, Some(value)) => Some(value.clone()),
            (Backing::Int, None) => Some(implicit_int(&ctx.properties, index).to_string()),
            (Backing::Text, None) => Some(format!("'{}'", property.name)),
        };
        match value {
            Some(value) => format!("{}case {} = {};\n", INDENT, property.name, value),
            None => format!("{}case {};\n", INDENT, property.name),
        }
    }

    fn default_constructor(&self, ctx: &ClassContext<'_>) -> String {
        format!(
            "{0}public function __construct()\n{0}{{\n{1}{0}}}\n\n",
            INDENT,
            self.parent_call(ctx)
        )
    }

    fn full_arg_constructor(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let params: Vec<String> = properties
            .iter()
            .map(|p| format!("{} ${}", self.map_type(&p.ty), p.name))
            .collect();
        let mut out = format!(
            "{0}public function __construct({1})\n{0}{{\n{2}",
            INDENT,
            params.join(", "),
            self.parent_call(ctx)
        );
        for p in properties {
            out.push_str(&format!("{0}{0}$this->{1} = ${1};\n", INDENT, p.name));
        }
        out + &format!("{}}}\n\n", INDENT)
    }

    fn getter(&self, _ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        format!(
            "{0}public function get{1}(): {2}\n{0}{{\n{0}{0}return $this->{3};\n{0}}}\n\n",
            INDENT,
            capitalize(&property.name),
            self.map_type(&property.ty),
            property.name
        )
    }

    fn setter(&self, _ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        format!(
            "{0}public function set{1}({2} ${3}): void\n{0}{{\n{0}{0}$this->{3} = ${3};\n{0}}}\n\n",
            INDENT,
            capitalize(&property.name),
            self.map_type(&property.ty),
            property.name
        )
    }

    fn equality(&self, _ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let comparisons: Vec<String> = properties
            .iter()
            .map(|p| format!("$this->{0} === $other->{0}", p.name))
            .collect();
        let separator = format!("\n{0}{0}{0}&& ", INDENT);
        format!(
            "{0}public function equals(self $other): bool\n{0}{{\n{0}{0}return {1};\n{0}}}\n\n",
            INDENT,
            comparisons.join(separator.as_str())
        )
    }

    fn string_representation(&self, ctx: &ClassContext<'_>, properties: &[&PropertyDef]) -> String {
        let placeholders: Vec<String> = properties.iter().map(|p| format!("{}=%s", p.name)).collect();
        let arguments: Vec<String> = properties
            .iter()
            .map(|p| format!("var_export($this->{}, true)", p.name))
            .collect();
        format!(
            "{0}public function __toString(): string\n{0}{{\n{0}{0}return sprintf('{1}({2})', {3});\n{0}}}\n\n",
            INDENT,
            ctx.name(),
            placeholders.join(", "),
            arguments.join(", ")
        )
    }

    fn method(&self, _ctx: &ClassContext<'_>, method: &MethodDef, body: MethodBody) -> String {
        let signature = self.signature(method);
        match body {
            MethodBody::Declaration => {
                let modifier = if method.constraints.is_static { "public static" } else { "public" };
                format!("{}{} {};\n\n", INDENT, modifier, signature)
            }
            MethodBody::Abstract => format!(
                "{}abstract {} {};\n\n",
                INDENT,
                method.access.overridable().keyword(),
                signature
            ),
            MethodBody::Implemented => {
                let mut words = Vec::new();
                if method.constraints.is_final {
                    words.push("final");
                }
                words.push(method.access.keyword());
                if method.constraints.is_static {
                    words.push("static");
                }
                format!("{}{} {}{}", INDENT, words.join(" "), signature, self.block(method))
            }
            MethodBody::Stub => format!("{}public {}{}", INDENT, signature, self.stub_block()),
        }
    }

    fn footer(&self, _ctx: &ClassContext<'_>) -> String {
        "}\n".to_string()
    }
}

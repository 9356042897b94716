//! Relational backend
//!
//! Emits one `CREATE TABLE` per class through a [`SqlDialect`]. With
//! `single_script` every table lands in one file, ordered so foreign key
//! targets are created before the tables referencing them.

pub mod dialect;

pub use dialect::{dialect_for, SqlDialect, DIALECT_NAMES};

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use tracing::{debug, warn};

use super::single_quoted;
use crate::core::{
    ClassContext, ClassKind, Generator, GeneratorConfig, GenerationError, DEFAULT_SCRIPT_NAME,
};
use crate::model::{ClassDef, ConstraintSet, PropertyDef, SyntaxTree};

/// Column referenced by a foreign key when the target declares no `pk`
const FALLBACK_KEY: &str = "id";
/// Type of a reference column whose target has no key property
const FALLBACK_KEY_TYPE: &str = "int64";

const INDENT: &str = "    ";

#[derive(Debug)]
pub struct SqlGenerator {
    dialect: Box<dyn SqlDialect>,
}

impl Default for SqlGenerator {
    fn default() -> Self {
        Self::new(Box::new(dialect::Ansi))
    }
}

impl SqlGenerator {
    pub fn new(dialect: Box<dyn SqlDialect>) -> Self {
        Self { dialect }
    }

    /// Generator for a named dialect
    pub fn for_dialect(name: &str) -> Result<Self, GenerationError> {
        Ok(Self::new(dialect_for(name)?))
    }

    pub fn dialect(&self) -> &dyn SqlDialect {
        self.dialect.as_ref()
    }

    fn quote(&self, identifier: &str) -> String {
        self.dialect.quote_identifier(identifier)
    }

    fn column_type(&self, tree: &SyntaxTree, property: &PropertyDef) -> String {
        match tree.find_by_name(&property.ty) {
            // A reference column takes the type of the referenced key.
            Some((_, target)) => match primary_key(target) {
                Some(key) => {
                    let mut constraints = key.constraints.clone();
                    constraints.identity = false;
                    constraints.generated = false;
                    self.dialect.map_type(&key.ty, &constraints)
                }
                None => self.dialect.map_type(FALLBACK_KEY_TYPE, &ConstraintSet::new()),
            },
            None => self.dialect.map_type(&property.ty, &property.constraints),
        }
    }

    /// `(column, referenced table, referenced column)` for each foreign key
    fn foreign_keys<'t>(&self, ctx: &ClassContext<'t>) -> Vec<(String, String, String)> {
        let mut keys = Vec::new();
        for property in columns(ctx) {
            if !property.constraints.fk {
                continue;
            }
            let target_name = match &property.constraints.fk_target {
                Some(target) => target.clone(),
                None if ctx.tree.find_by_name(&property.ty).is_some() => property.ty.clone(),
                None => {
                    warn!(
                        table = ctx.name(),
                        column = %property.name,
                        "Foreign key without a target table, constraint skipped"
                    );
                    continue;
                }
            };
            let (table, column) = match ctx.tree.find_by_name(&target_name) {
                Some((_, target)) => (
                    target.name.clone(),
                    primary_key(target)
                        .map(|k| k.name.clone())
                        .unwrap_or_else(|| FALLBACK_KEY.to_string()),
                ),
                None => (target_name, FALLBACK_KEY.to_string()),
            };
            keys.push((property.name.clone(), table, column));
        }
        keys
    }

    fn table_constraints(&self, ctx: &ClassContext<'_>) -> Vec<String> {
        let mut lines = Vec::new();

        let primary: Vec<String> = columns(ctx)
            .filter(|p| p.constraints.pk)
            .map(|p| self.quote(&p.name))
            .collect();
        if !primary.is_empty() {
            lines.push(format!("{}PRIMARY KEY ({})", INDENT, primary.join(", ")));
        }

        for (index, (column, table, referenced)) in self.foreign_keys(ctx).into_iter().enumerate() {
            lines.push(format!(
                "{}CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
                INDENT,
                self.dialect.fk_name(ctx.name(), &table, index + 1),
                self.quote(&column),
                self.quote(&table),
                self.quote(&referenced)
            ));
        }
        lines
    }

    fn render_table(&self, tree: &SyntaxTree, id: &str, class: &ClassDef, config: &GeneratorConfig) -> String {
        let ctx = ClassContext::new(tree, id, class, config, self.name());
        self.render_class(&ctx)
    }
}

/// Instance properties, which become columns
fn columns<'c>(ctx: &'c ClassContext<'_>) -> impl Iterator<Item = &'c PropertyDef> {
    ctx.properties.iter().filter(|p| !p.is_static())
}

/// The class's single `pk` property, else its `id` property
fn primary_key(class: &ClassDef) -> Option<&PropertyDef> {
    let keys: Vec<&PropertyDef> = class.property_list().filter(|p| p.constraints.pk).collect();
    match keys.as_slice() {
        [key] => Some(key),
        _ => class.property_list().find(|p| p.name == FALLBACK_KEY),
    }
}

/// Table order for a single script: every table after the tables it references.
/// Tables caught in a reference cycle follow all others, in tree order.
fn creation_order(tree: &SyntaxTree, tables: &[(&str, &ClassDef)]) -> Vec<usize> {
    let index_of: HashMap<&str, usize> = tables
        .iter()
        .enumerate()
        .map(|(index, (_, class))| (class.name.as_str(), index))
        .collect();

    let mut parents: Vec<HashSet<usize>> = vec![HashSet::new(); tables.len()];
    for (index, (_, class)) in tables.iter().enumerate() {
        for property in class.property_list().filter(|p| p.constraints.fk) {
            let target = property.constraints.fk_target.as_deref().unwrap_or(&property.ty);
            let target = tree.find_by_name(target).map(|(_, c)| c.name.as_str()).unwrap_or(target);
            if let Some(&parent) = index_of.get(target) {
                if parent != index {
                    parents[index].insert(parent);
                }
            }
        }
    }

    let mut levels: Vec<Option<usize>> = vec![None; tables.len()];
    let mut changed = true;
    while changed {
        changed = false;
        for index in 0..tables.len() {
            if levels[index].is_some() {
                continue;
            }
            let parent_levels: Vec<usize> =
                parents[index].iter().filter_map(|&p| levels[p]).collect();
            if parent_levels.len() == parents[index].len() {
                levels[index] = Some(parent_levels.iter().max().map_or(0, |l| l + 1));
                changed = true;
            }
        }
    }

    let max_level = levels.iter().flatten().copied().max().unwrap_or(0);
    let mut order: Vec<usize> = (0..tables.len()).collect();
    order.sort_by_key(|&index| (levels[index].unwrap_or(max_level + 1), index));
    order
}

impl Generator for SqlGenerator {
    fn name(&self) -> &'static str {
        "sql"
    }

    fn extension(&self) -> &'static str {
        "sql"
    }

    fn type_table(&self) -> &'static [(&'static str, &'static str)] {
        self.dialect.type_table()
    }

    fn map_type(&self, logical: &str) -> String {
        self.dialect.map_type(logical, &ConstraintSet::new())
    }

    fn default_value(&self, _logical: &str) -> String {
        "NULL".to_string()
    }

    fn accepts(&self, class: &ClassDef) -> bool {
        class.kind == ClassKind::Class
    }

    fn header(&self, ctx: &ClassContext<'_>) -> String {
        format!("CREATE TABLE {} (\n", self.quote(ctx.name()))
    }

    /// One column definition, without separator
    fn property(&self, ctx: &ClassContext<'_>, property: &PropertyDef) -> String {
        let constraints = &property.constraints;
        let mut words = vec![
            self.quote(&property.name),
            self.column_type(ctx.tree, property),
        ];
        if constraints.is_auto_valued() && !self.dialect.identity_spec().is_empty() {
            words.push(self.dialect.identity_spec().to_string());
        }
        if constraints.required || constraints.pk {
            words.push("NOT NULL".to_string());
        }
        if let Some(value) = &property.default_value {
            if !constraints.is_auto_valued() {
                words.push(format!("DEFAULT {}", single_quoted(value)));
            }
        }
        if constraints.unique && !constraints.pk {
            words.push("UNIQUE".to_string());
        }
        format!("{}{}", INDENT, words.join(" "))
    }

    fn enum_constant(
        &self,
        _ctx: &ClassContext<'_>,
        _property: &PropertyDef,
        _index: usize,
    ) -> String {
        String::new()
    }

    fn footer(&self, _ctx: &ClassContext<'_>) -> String {
        ");\n".to_string()
    }

    fn render_class(&self, ctx: &ClassContext<'_>) -> String {
        let mut items: Vec<String> = columns(ctx).map(|p| self.property(ctx, p)).collect();
        items.extend(self.table_constraints(ctx));
        debug!(table = ctx.name(), items = items.len(), "Rendering table");

        let mut out = self.header(ctx);
        out.push_str(&items.join(",\n"));
        if !items.is_empty() {
            out.push('\n');
        }
        out + &self.footer(ctx)
    }

    fn render(&self, tree: &SyntaxTree, config: &GeneratorConfig) -> Result<Vec<(String, String)>> {
        let tables: Vec<(&str, &ClassDef)> =
            tree.iter().filter(|(_, class)| self.accepts(class)).collect();

        let target = config.target(self.name());
        if !target.is_some_and(|t| t.single_script) {
            return Ok(tables
                .iter()
                .map(|(id, class)| (self.file_name(class), self.render_table(tree, id, class, config)))
                .collect());
        }

        let file_name = target
            .and_then(|t| t.filename.clone())
            .unwrap_or_else(|| DEFAULT_SCRIPT_NAME.to_string());
        let script = creation_order(tree, &tables)
            .into_iter()
            .map(|index| {
                let (id, class) = tables[index];
                self.render_table(tree, id, class, config)
            })
            .collect::<Vec<_>>()
            .join("\n");
        debug!(tables = tables.len(), file = %file_name, "Rendered single script");
        Ok(vec![(file_name, script)])
    }
}

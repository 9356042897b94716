//! Tree builder
//!
//! Turns the style tree into a [`SyntaxTree`] in two passes: containers and
//! their member lines first, relationship edges second. Edges are resolved
//! only once every entity exists, so every id recorded in a relationship bag
//! is a key of the tree.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::{debug, info, span, trace, warn, Level};

use super::relationship;
use super::signature::{self, Member, MemberKind};
use crate::core::ClassKind;
use crate::model::{ClassDef, MemberId, StyleCell, StyleTree, SyntaxTree};

/// Shapes that open a new class box
pub const CONTAINER_SHAPES: [&str; 3] = ["swimlane", "umlClass", "rectangle"];
/// Shapes that separate the property region from the method region
pub const DIVIDER_SHAPES: [&str; 2] = ["line", "divider"];

/// Counts gathered while building, reported by `validate`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub classes: usize,
    pub properties: usize,
    pub methods: usize,
    /// Edges recorded in the tree
    pub edges_linked: usize,
    /// Edges whose style matched no relationship kind
    pub edges_ignored: usize,
    /// Edges naming a cell that is not an entity
    pub edges_skipped: usize,
}

/// Where the next member line of a class box goes
#[derive(Debug, Default)]
struct Cursor {
    properties_done: bool,
    next_id: MemberId,
}

/// Builds syntax trees from style trees
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the syntax tree for one diagram
    pub fn build(&self, style: &StyleTree) -> Result<SyntaxTree> {
        self.build_with_summary(style).map(|(tree, _)| tree)
    }

    /// Build the syntax tree and report what was collected
    pub fn build_with_summary(&self, style: &StyleTree) -> Result<(SyntaxTree, BuildSummary)> {
        let build_span = span!(
            Level::INFO,
            "build_syntax_tree",
            cells = style.cells.len(),
            edges = style.relationships.len()
        );
        let _enter = build_span.enter();

        let mut tree = SyntaxTree::new();
        let mut summary = BuildSummary::default();

        self.collect_entities(style, &mut tree, &mut summary)?;
        self.resolve_edges(style, &mut tree, &mut summary);

        info!(
            classes = summary.classes,
            edges = summary.edges_linked,
            ignored = summary.edges_ignored,
            skipped = summary.edges_skipped,
            "Syntax tree built"
        );
        Ok((tree, summary))
    }

    fn collect_entities(
        &self,
        style: &StyleTree,
        tree: &mut SyntaxTree,
        summary: &mut BuildSummary,
    ) -> Result<()> {
        let pass_span = span!(Level::DEBUG, "collect_entities");
        let _enter = pass_span.enter();

        let mut cursors: HashMap<&str, Cursor> = HashMap::new();

        for cell in style.cells.values() {
            if is_edge_cell(style, cell) {
                trace!(cell = %cell.id, "Skipping edge cell");
                continue;
            }

            let parent = cell.parent_id.as_deref().unwrap_or_default();

            if parent == style.root_id && cell.shape().is_some_and(is_container_shape) {
                let class = entity_from_cell(cell);
                debug!(cell = %cell.id, name = %class.name, kind = %class.kind, "Found entity");
                tree.insert(cell.id.clone(), class);
                cursors.insert(cell.id.as_str(), Cursor::default());
                summary.classes += 1;
                continue;
            }

            let (Some(class), Some(cursor)) = (tree.get_mut(parent), cursors.get_mut(parent))
            else {
                debug!(cell = %cell.id, parent, "Skipping cell outside any class box");
                continue;
            };

            if cell.shape().is_some_and(is_divider_shape) {
                cursor.properties_done = true;
                cursor.next_id = 0;
                continue;
            }

            let kind = if cursor.properties_done {
                MemberKind::Method
            } else {
                MemberKind::Property
            };

            for line in cell.text_lines() {
                let member = signature::parse_member(&line, kind).with_context(|| {
                    format!("Failed to parse member of cell '{}' in '{}'", cell.id, parent)
                })?;
                match member {
                    Member::Property(property) => {
                        class.properties.insert(cursor.next_id, property);
                        summary.properties += 1;
                    }
                    Member::Method(method) => {
                        class.methods.insert(cursor.next_id, method);
                        summary.methods += 1;
                    }
                }
                cursor.next_id += 1;
            }
        }

        Ok(())
    }

    fn resolve_edges(&self, style: &StyleTree, tree: &mut SyntaxTree, summary: &mut BuildSummary) {
        let pass_span = span!(Level::DEBUG, "resolve_edges");
        let _enter = pass_span.enter();

        for (label, edge) in &style.relationships {
            let Some(kind) = relationship::classify_style(&edge.style) else {
                trace!(edge = %label, "Edge style carries no relationship");
                summary.edges_ignored += 1;
                continue;
            };

            if tree.link(kind, &edge.source_id, &edge.target_id) {
                debug!(edge = %label, %kind, source = %edge.source_id, target = %edge.target_id, "Linked");
                summary.edges_linked += 1;
            } else {
                warn!(
                    edge = %label,
                    source = %edge.source_id,
                    target = %edge.target_id,
                    "Skipping edge with unknown endpoint"
                );
                summary.edges_skipped += 1;
            }
        }
    }
}

fn is_container_shape(shape: &str) -> bool {
    CONTAINER_SHAPES.contains(&shape)
}

fn is_divider_shape(shape: &str) -> bool {
    DIVIDER_SHAPES.contains(&shape)
}

/// Connector cells and the labels hanging off them are not class content
fn is_edge_cell(style: &StyleTree, cell: &StyleCell) -> bool {
    cell.style.contains_key("endArrow")
        || cell
            .parent_id
            .as_deref()
            .is_some_and(|parent| style.relationships.contains_key(parent))
}

/// Resolve name, kind and stereotype from a container cell
fn entity_from_cell(cell: &StyleCell) -> ClassDef {
    let mut stereotype = None;
    let mut name = None;

    for line in cell.text_lines() {
        let mut rest = line.as_str();
        if stereotype.is_none() {
            if let Some((tag, tail)) = split_stereotype(rest) {
                stereotype = Some(tag.to_string());
                rest = tail;
            }
        }
        if !rest.is_empty() {
            name = Some(rest.to_string());
            break;
        }
    }

    let (kind, stereotype) = match stereotype.as_deref().map(str::to_lowercase).as_deref() {
        Some("interface") => (ClassKind::Interface, None),
        Some("enum") | Some("enumeration") => (ClassKind::Enum, None),
        Some("abstract") => (ClassKind::AbstractClass, None),
        _ if cell.is_italic() => (ClassKind::AbstractClass, stereotype),
        _ => (ClassKind::Class, stereotype),
    };

    let mut class = ClassDef::new(name.unwrap_or_else(|| cell.id.clone()), kind);
    class.stereotype = stereotype;
    class
}

/// `<<tag>> rest` into `(tag, rest)`
fn split_stereotype(line: &str) -> Option<(&str, &str)> {
    let inner = line.trim().strip_prefix("<<")?;
    let (tag, rest) = inner.split_once(">>")?;
    Some((tag.trim(), rest.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Access, Direction, GenerationError};
    use crate::model::{RelationshipEdge, StyleCell};

    fn class_box(id: &str, label: &str) -> StyleCell {
        StyleCell::new(id, "1")
            .with_style("shape", "swimlane")
            .with_value(label)
    }

    fn member(id: &str, parent: &str, text: &str) -> StyleCell {
        StyleCell::new(id, parent).with_value(text)
    }

    fn divider(id: &str, parent: &str) -> StyleCell {
        StyleCell::new(id, parent).with_style("shape", "line")
    }

    #[test]
    fn test_members_split_by_divider() {
        let mut style = StyleTree::new("1");
        style.add_cell(class_box("p", "Person"));
        style.add_cell(member("p1", "p", "+name: string\n-age: int32"));
        style.add_cell(divider("p2", "p"));
        style.add_cell(member("p3", "p", "+greet(): string"));

        let tree = TreeBuilder::new().build(&style).unwrap();
        let person = tree.get("p").unwrap();
        assert_eq!(person.name, "Person");
        assert_eq!(person.kind, ClassKind::Class);

        let props: Vec<_> = person.properties.iter().map(|(id, p)| (*id, p.name.as_str())).collect();
        assert_eq!(props, vec![(0, "name"), (1, "age")]);
        assert_eq!(person.properties[&0].access, Access::Public);

        let methods: Vec<_> = person.methods.iter().map(|(id, m)| (*id, m.name.as_str())).collect();
        assert_eq!(methods, vec![(0, "greet")]);
    }

    #[test]
    fn test_stereotypes_resolve_kind() {
        let mut style = StyleTree::new("1");
        style.add_cell(class_box("i", "<<interface>>\nNamed"));
        style.add_cell(class_box("e", "<<enumeration>> Color"));
        style.add_cell(class_box("a", "<<abstract>>\nShape"));
        style.add_cell(class_box("c", "<<entity>>\nOrder"));
        style.add_cell(class_box("x", "<<entity>>\nBase").with_style("fontStyle", "2"));

        let tree = TreeBuilder::new().build(&style).unwrap();
        assert_eq!(tree.get("i").unwrap().kind, ClassKind::Interface);
        assert_eq!(tree.get("i").unwrap().name, "Named");
        assert_eq!(tree.get("e").unwrap().kind, ClassKind::Enum);
        assert_eq!(tree.get("e").unwrap().name, "Color");
        assert_eq!(tree.get("a").unwrap().kind, ClassKind::AbstractClass);

        let order = tree.get("c").unwrap();
        assert_eq!(order.kind, ClassKind::Class);
        assert_eq!(order.stereotype.as_deref(), Some("entity"));

        let base = tree.get("x").unwrap();
        assert_eq!(base.kind, ClassKind::AbstractClass);
        assert_eq!(base.stereotype.as_deref(), Some("entity"));
    }

    #[test]
    fn test_unnamed_container_uses_cell_id() {
        let mut style = StyleTree::new("1");
        style.add_cell(StyleCell::new("box7", "1").with_style("shape", "umlClass"));
        let tree = TreeBuilder::new().build(&style).unwrap();
        assert_eq!(tree.get("box7").unwrap().name, "box7");
    }

    #[test]
    fn test_edge_cells_are_not_members() {
        let mut style = StyleTree::new("1");
        style.add_cell(class_box("a", "A"));
        style.add_cell(member("arrow", "a", "+oops(").with_style("endArrow", "block"));
        style.add_cell(member("label", "e1", "1..*"));
        style.add_relationship("e1", RelationshipEdge::new("a", "a"));

        let tree = TreeBuilder::new().build(&style).unwrap();
        assert!(tree.get("a").unwrap().properties.is_empty());
    }

    #[test]
    fn test_edges_resolve_after_entities() {
        let mut style = StyleTree::new("1");
        style.add_relationship(
            "e1",
            RelationshipEdge::new("a", "b").with_style("endArrow", "diamondthin"),
        );
        style.add_relationship(
            "e2",
            RelationshipEdge::new("a", "ghost").with_style("endArrow", "none"),
        );
        style.add_relationship(
            "e3",
            RelationshipEdge::new("a", "b").with_style("endArrow", "classic"),
        );
        style.add_cell(class_box("a", "A"));
        style.add_cell(class_box("b", "B"));

        let (tree, summary) = TreeBuilder::new().build_with_summary(&style).unwrap();
        assert_eq!(summary.classes, 2);
        assert_eq!(summary.edges_linked, 1);
        assert_eq!(summary.edges_skipped, 1);
        assert_eq!(summary.edges_ignored, 1);
        assert_eq!(
            tree.get("b").unwrap().relationships.composition,
            vec![(Direction::From, "a".to_string())]
        );
    }

    #[test]
    fn test_malformed_member_aborts_with_context() {
        let mut style = StyleTree::new("1");
        style.add_cell(class_box("a", "A"));
        style.add_cell(divider("d", "a"));
        style.add_cell(member("m", "a", "+broken)"));

        let err = TreeBuilder::new().build(&style).unwrap_err();
        assert!(err.to_string().contains("cell 'm'"));
        assert!(matches!(
            err.downcast_ref::<GenerationError>(),
            Some(GenerationError::MalformedSignature { .. })
        ));
    }
}

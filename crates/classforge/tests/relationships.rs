//! Tests for edge classification and where relationships land in the tree

use classforge::parser::{BuildSummary, TreeBuilder};
use classforge::prelude::*;
use classforge::Direction;

fn two_boxes(edge: RelationshipEdge) -> (SyntaxTree, BuildSummary) {
    let mut style = StyleTree::new("0");
    for (id, name) in [("a", "A"), ("b", "B")] {
        style.add_cell(
            StyleCell::new(id, "0")
                .with_style("shape", "swimlane")
                .with_value(name),
        );
    }
    style.add_relationship("edge", edge);
    TreeBuilder::new().build_with_summary(&style).unwrap()
}

fn edge(styles: &[(&str, &str)]) -> RelationshipEdge {
    styles
        .iter()
        .fold(RelationshipEdge::new("a", "b"), |edge, (key, value)| {
            edge.with_style(*key, *value)
        })
}

#[test]
fn test_extends_lands_on_source_only() {
    let (tree, _) = two_boxes(edge(&[("endArrow", "block"), ("endFill", "0")]));
    assert_eq!(tree.get("a").unwrap().relationships.extends, vec!["b".to_string()]);
    assert!(tree.get("b").unwrap().relationships.is_empty());
}

#[test]
fn test_implements_needs_dash() {
    let (tree, _) = two_boxes(edge(&[
        ("endArrow", "block"),
        ("endFill", "0"),
        ("dashed", "1"),
    ]));
    let a = &tree.get("a").unwrap().relationships;
    assert_eq!(a.implements, vec!["b".to_string()]);
    assert!(a.extends.is_empty());
    assert!(tree.get("b").unwrap().relationships.is_empty());
}

#[test]
fn test_filled_block_is_association() {
    let (tree, _) = two_boxes(edge(&[("endArrow", "block")]));
    assert_eq!(
        tree.get("a").unwrap().relationships.association,
        vec![(Direction::To, "b".to_string())]
    );
    assert_eq!(
        tree.get("b").unwrap().relationships.association,
        vec![(Direction::From, "a".to_string())]
    );
}

#[test]
fn test_plain_line_is_association() {
    let (tree, _) = two_boxes(edge(&[("endArrow", "none")]));
    assert_eq!(
        tree.get("a").unwrap().relationships.links(RelationshipKind::Association),
        &[(Direction::To, "b".to_string())]
    );
}

#[test]
fn test_diamond_at_target() {
    let (tree, _) = two_boxes(edge(&[("endArrow", "diamondthin")]));
    assert_eq!(
        tree.get("b").unwrap().relationships.composition,
        vec![(Direction::From, "a".to_string())]
    );

    let (tree, _) = two_boxes(edge(&[("endArrow", "diamondthin"), ("endFill", "0")]));
    assert_eq!(
        tree.get("a").unwrap().relationships.aggregation,
        vec![(Direction::To, "b".to_string())]
    );
    assert!(tree.get("a").unwrap().relationships.composition.is_empty());
}

#[test]
fn test_diamond_at_source() {
    let (tree, _) = two_boxes(edge(&[
        ("endArrow", "open"),
        ("startArrow", "diamondthin"),
        ("startFill", "1"),
    ]));
    assert_eq!(tree.get("a").unwrap().relationships.composition.len(), 1);

    let (tree, _) = two_boxes(edge(&[
        ("endArrow", "open"),
        ("startArrow", "diamondthin"),
        ("startFill", "0"),
    ]));
    assert_eq!(tree.get("b").unwrap().relationships.aggregation.len(), 1);
}

#[test]
fn test_unrecognized_styles_are_ignored() {
    for styles in [
        vec![("endArrow", "classic")],
        vec![("endArrow", "open")],
        vec![("dashed", "1")],
    ] {
        let (tree, summary) = two_boxes(edge(&styles));
        assert_eq!(summary.edges_ignored, 1, "{:?}", styles);
        assert_eq!(summary.edges_linked, 0);
        assert!(tree.iter().all(|(_, class)| class.relationships.is_empty()));
    }
}

#[test]
fn test_edge_to_unknown_cell_is_skipped() {
    let mut style = StyleTree::new("0");
    style.add_cell(
        StyleCell::new("a", "0")
            .with_style("shape", "swimlane")
            .with_value("A"),
    );
    style.add_relationship(
        "e",
        RelationshipEdge::new("a", "ghost").with_style("endArrow", "none"),
    );
    let (tree, summary) = TreeBuilder::new().build_with_summary(&style).unwrap();
    assert_eq!(summary.edges_skipped, 1);
    assert!(tree.get("a").unwrap().relationships.is_empty());
}

//! Relationship classifier
//!
//! Recovers the UML meaning of a connector from its draw.io arrow styling.
//! Connectors that match no rule are ignored rather than reported.

use crate::core::RelationshipKind;
use crate::model::StyleMap;

/// Arrow-related style attributes of one edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeStyle<'a> {
    pub start_arrow: Option<&'a str>,
    pub end_arrow: Option<&'a str>,
    pub start_fill: bool,
    pub end_fill: bool,
    pub dashed: bool,
}

impl<'a> EdgeStyle<'a> {
    /// Read the arrow attributes out of a style map
    ///
    /// Missing fill keys count as filled, matching draw.io's defaults.
    pub fn from_style(style: &'a StyleMap) -> Self {
        let get = |key: &str| style.get(key).map(|v| v.trim());
        Self {
            start_arrow: get("startArrow"),
            end_arrow: get("endArrow"),
            start_fill: get("startFill").map_or(true, is_truthy),
            end_fill: get("endFill").map_or(true, is_truthy),
            dashed: get("dashed").is_some_and(is_truthy),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "1" | "true")
}

/// Classify an edge style, or `None` when it carries no relationship
pub fn classify(style: &EdgeStyle<'_>) -> Option<RelationshipKind> {
    match style.end_arrow? {
        "none" => Some(RelationshipKind::Association),
        "block" => Some(if style.end_fill {
            RelationshipKind::Association
        } else if style.dashed {
            RelationshipKind::Implements
        } else {
            RelationshipKind::Extends
        }),
        "diamondthin" => Some(if style.end_fill {
            RelationshipKind::Composition
        } else {
            RelationshipKind::Aggregation
        }),
        "open" => match style.start_arrow {
            Some("diamondthin") if style.start_fill => Some(RelationshipKind::Composition),
            Some("diamondthin") => Some(RelationshipKind::Aggregation),
            _ => None,
        },
        _ => None,
    }
}

/// Classify straight from a style map
pub fn classify_style(style: &StyleMap) -> Option<RelationshipKind> {
    classify(&EdgeStyle::from_style(style))
}

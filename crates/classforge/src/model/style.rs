//! Style tree: the loosely structured input delivered by the diagram decoder
//!
//! Cells keep their decoder order, which drives the order classes and members
//! appear in the syntax tree.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

/// Style attributes of a cell or edge
pub type StyleMap = BTreeMap<String, String>;

/// A cell value: plain text or a nested sequence of values
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Nested(Vec<CellValue>),
}

impl CellValue {
    fn collect_lines(&self, lines: &mut Vec<String>) {
        match self {
            CellValue::Text(text) => lines.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
            ),
            CellValue::Nested(values) => {
                for value in values {
                    value.collect_lines(lines);
                }
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::Text(text.to_string())
    }
}

/// One visual node of the diagram
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StyleCell {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub style: StyleMap,
    #[serde(default)]
    pub values: Vec<CellValue>,
}

impl StyleCell {
    pub fn new(id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: Some(parent_id.into()),
            style: StyleMap::new(),
            values: Vec::new(),
        }
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<CellValue>) -> Self {
        self.values.push(value.into());
        self
    }

    pub fn style_value(&self, key: &str) -> Option<&str> {
        self.style.get(key).map(String::as_str)
    }

    pub fn shape(&self) -> Option<&str> {
        self.style_value("shape")
    }

    /// Non-blank text lines, flattened depth-first
    pub fn text_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for value in &self.values {
            value.collect_lines(&mut lines);
        }
        lines
    }

    /// draw.io encodes italic as bit 2 of `fontStyle`
    pub fn is_italic(&self) -> bool {
        self.style_value("fontStyle")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .is_some_and(|bits| bits & 2 != 0)
    }
}

/// One visual connector between two cells
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelationshipEdge {
    pub source_id: String,
    pub target_id: String,
    #[serde(default)]
    pub style: StyleMap,
}

impl RelationshipEdge {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            style: StyleMap::new(),
        }
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }
}

/// Complete input for one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StyleTree {
    pub root_id: String,
    #[serde(default)]
    pub cells: IndexMap<String, StyleCell>,
    /// Relationship-label id to edge
    #[serde(default)]
    pub relationships: IndexMap<String, RelationshipEdge>,
}

impl StyleTree {
    pub fn new(root_id: impl Into<String>) -> Self {
        Self {
            root_id: root_id.into(),
            ..Self::default()
        }
    }

    pub fn add_cell(&mut self, cell: StyleCell) {
        self.cells.insert(cell.id.clone(), cell);
    }

    pub fn add_relationship(&mut self, label_id: impl Into<String>, edge: RelationshipEdge) {
        self.relationships.insert(label_id.into(), edge);
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Invalid style tree")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read style tree '{}'", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse style tree '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lines_flatten_nested_values() {
        let cell = StyleCell {
            id: "c".into(),
            parent_id: Some("1".into()),
            style: StyleMap::new(),
            values: vec![
                CellValue::Text("+name: string\n\n-age: int".into()),
                CellValue::Nested(vec![CellValue::Text("  #id: uuid  ".into())]),
            ],
        };
        assert_eq!(cell.text_lines(), vec!["+name: string", "-age: int", "#id: uuid"]);
    }

    #[test]
    fn test_italic_bit() {
        let plain = StyleCell::new("a", "1").with_style("fontStyle", "1");
        let italic = StyleCell::new("b", "1").with_style("fontStyle", "3");
        assert!(!plain.is_italic());
        assert!(italic.is_italic());
        assert!(!StyleCell::new("c", "1").is_italic());
    }

    #[test]
    fn test_deserialize_style_tree() {
        let json = r#"{
            "root_id": "1",
            "cells": {
                "p": { "id": "p", "parent_id": "1", "style": { "shape": "swimlane" },
                       "values": ["Person", ["nested"]] }
            },
            "relationships": {
                "e1": { "source_id": "p", "target_id": "q", "style": { "endArrow": "block" } }
            }
        }"#;
        let tree = StyleTree::from_json_str(json).unwrap();
        assert_eq!(tree.root_id, "1");
        let cell = &tree.cells["p"];
        assert_eq!(cell.shape(), Some("swimlane"));
        assert_eq!(cell.text_lines(), vec!["Person", "nested"]);
        assert_eq!(tree.relationships["e1"].target_id, "q");
    }
}

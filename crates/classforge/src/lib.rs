//! Classforge - turn class-diagram style trees into source skeletons
//!
//! A library for reading the cells and edges of a class diagram, resolving them
//! into a typed syntax tree, and emitting class skeletons for Java, C#, C++,
//! Python, TypeScript and PHP, or `CREATE TABLE` scripts for seven SQL dialects.
//!
//! # Quick Start
//!
//! ```rust
//! use classforge::prelude::*;
//!
//! let mut style = StyleTree::new("root");
//! style.add_cell(StyleCell::new("person", "root").with_style("shape", "swimlane").with_value("Person"));
//! style.add_cell(StyleCell::new("name", "person").with_value("+name: string"));
//!
//! let tree = classforge::build_syntax_tree(&style).unwrap();
//! assert_eq!(tree.len(), 1);
//!
//! let files = classforge::render(&tree, "java", &GeneratorConfig::new()).unwrap();
//! assert_eq!(files[0].0, "Person.java");
//! assert!(files[0].1.contains("public String name;"));
//! ```
//!
//! # Advanced Usage
//!
//! [`Orchestrator`](backends::Orchestrator) runs several targets at once and
//! writes the files:
//!
//! ```rust,no_run
//! use classforge::prelude::*;
//!
//! let style = StyleTree::from_json_file("diagram.json").unwrap();
//! let config = GeneratorConfig::from_json_file("classforge.json").unwrap();
//! let report = Orchestrator::new(config)
//!     .run(&style, &["java", "sql"], std::path::Path::new("out"))
//!     .unwrap();
//! println!("{} files written", report.file_count());
//! ```

pub mod backends;
pub mod core;
pub mod model;
pub mod parser;

pub use core::*;

use std::path::{Path, PathBuf};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backends::{
        available_targets, backend_for, CSharpGenerator, CppGenerator, JavaGenerator,
        Orchestrator, PhpGenerator, PythonGenerator, SqlGenerator, TypeScriptGenerator,
    };
    pub use crate::core::{
        Access, ClassKind, GenerateOptions, GenerationError, Generator, GeneratorConfig,
        RelationshipKind, TargetConfig,
    };
    pub use crate::model::{
        ClassDef, MethodDef, PropertyDef, RelationshipEdge, StyleCell, StyleTree, SyntaxTree,
    };
    pub use crate::parser::TreeBuilder;
}

/// Build the syntax tree for a style tree
///
/// # Example
/// ```rust
/// use classforge::model::{StyleCell, StyleTree};
///
/// let mut style = StyleTree::new("root");
/// style.add_cell(StyleCell::new("a", "root").with_style("shape", "umlClass").with_value("<<interface>> Named"));
/// let tree = classforge::build_syntax_tree(&style).unwrap();
/// assert_eq!(tree.get("a").unwrap().kind, classforge::ClassKind::Interface);
/// ```
pub fn build_syntax_tree(style: &model::StyleTree) -> anyhow::Result<model::SyntaxTree> {
    parser::TreeBuilder::new().build(style)
}

/// Render every file of one target without touching the filesystem
pub fn render(
    tree: &model::SyntaxTree,
    target: &str,
    config: &GeneratorConfig,
) -> anyhow::Result<Vec<(String, String)>> {
    backends::backend_for(target, config)?.render(tree, config)
}

/// Build the syntax tree and write one target's files into `out_dir`
pub fn generate(
    style: &model::StyleTree,
    target: &str,
    config: &GeneratorConfig,
    out_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    let backend = backends::backend_for(target, config)?;
    let tree = build_syntax_tree(style)?;
    backend.generate(&tree, config, out_dir)
}

//! Backend registry and run orchestration
//!
//! The orchestrator drives one run: select backends → build the syntax tree →
//! emit every target. Target and dialect names are checked before any work,
//! so a typo never leaves a half-written output directory behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, error, info, span, Level};

use super::sql::SqlGenerator;
use super::{
    CSharpGenerator, CppGenerator, JavaGenerator, PhpGenerator, PythonGenerator,
    TypeScriptGenerator,
};
use crate::core::{GenerationError, Generator, GeneratorConfig};
use crate::model::{StyleTree, SyntaxTree};
use crate::parser::TreeBuilder;

/// Registry names of every backend
pub const TARGET_NAMES: &[&str] = &["java", "csharp", "cpp", "python", "typescript", "php", "sql"];

pub fn available_targets() -> &'static [&'static str] {
    TARGET_NAMES
}

/// Instantiate a backend by name; the SQL backend reads its dialect from `config`
pub fn backend_for(
    name: &str,
    config: &GeneratorConfig,
) -> Result<Box<dyn Generator>, GenerationError> {
    let backend: Box<dyn Generator> = match name.trim().to_lowercase().as_str() {
        "java" => Box::new(JavaGenerator::new()),
        "csharp" | "c#" | "cs" => Box::new(CSharpGenerator::new()),
        "cpp" | "c++" => Box::new(CppGenerator::new()),
        "python" | "py" => Box::new(PythonGenerator::new()),
        "typescript" | "ts" => Box::new(TypeScriptGenerator::new()),
        "php" => Box::new(PhpGenerator::new()),
        "sql" => Box::new(SqlGenerator::for_dialect(config.dialect_name("sql"))?),
        _ => return Err(GenerationError::unsupported_target(name)),
    };
    Ok(backend)
}

/// Files written by one run, grouped by backend name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub classes: usize,
    pub files: IndexMap<String, Vec<PathBuf>>,
}

impl GenerationReport {
    pub fn file_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }
}

/// Runs the whole pipeline for a set of targets
#[derive(Debug, Default)]
pub struct Orchestrator {
    config: GeneratorConfig,
    builder: TreeBuilder,
}

impl Orchestrator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            builder: TreeBuilder::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Resolve every requested target, failing on the first unknown name.
    /// Repeated names are collapsed.
    pub fn select<S: AsRef<str>>(&self, targets: &[S]) -> Result<Vec<Box<dyn Generator>>> {
        let mut seen = IndexSet::new();
        let mut backends = Vec::new();
        for target in targets {
            let backend = backend_for(target.as_ref(), &self.config)?;
            if seen.insert(backend.name()) {
                backends.push(backend);
            }
        }
        debug!(count = backends.len(), "Backends selected");
        Ok(backends)
    }

    pub fn build(&self, style: &StyleTree) -> Result<SyntaxTree> {
        self.builder.build(style)
    }

    /// Emit an already built tree. With several targets each one writes into
    /// `out_dir/<target>`; a single target writes into `out_dir` directly.
    pub fn generate<S: AsRef<str>>(
        &self,
        tree: &SyntaxTree,
        targets: &[S],
        out_dir: &Path,
    ) -> Result<GenerationReport> {
        let backends = self.select(targets)?;
        self.emit(tree, &backends, out_dir)
    }

    /// Full run from a style tree
    pub fn run<S: AsRef<str>>(
        &self,
        style: &StyleTree,
        targets: &[S],
        out_dir: &Path,
    ) -> Result<GenerationReport> {
        let run_span = span!(Level::INFO, "run", targets = targets.len(), out = %out_dir.display());
        let _enter = run_span.enter();

        let backends = self.select(targets)?;
        let tree = self.build(style).context("Failed to build syntax tree")?;
        self.emit(&tree, &backends, out_dir)
    }

    fn emit(
        &self,
        tree: &SyntaxTree,
        backends: &[Box<dyn Generator>],
        out_dir: &Path,
    ) -> Result<GenerationReport> {
        let nested = backends.len() > 1;
        let mut report = GenerationReport {
            classes: tree.len(),
            files: IndexMap::new(),
        };

        for backend in backends {
            let dir = if nested {
                out_dir.join(backend.name())
            } else {
                out_dir.to_path_buf()
            };
            match backend.generate(tree, &self.config, &dir) {
                Ok(written) => {
                    report.files.insert(backend.name().to_string(), written);
                }
                Err(e) => {
                    error!(backend = backend.name(), error = %e, "Generation failed, run abandoned");
                    return Err(e.context(format!("Target '{}' failed", backend.name())));
                }
            }
        }

        info!(
            classes = report.classes,
            files = report.file_count(),
            "Generation completed"
        );
        Ok(report)
    }
}

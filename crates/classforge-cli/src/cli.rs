//! Command-line interface for the classforge utility
//!
//! Reads a style tree exported from a class diagram and writes source skeletons
//! or SQL schemas for one or more targets.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use classforge::backends::sql::DIALECT_NAMES;
use classforge::backends::{available_targets, Orchestrator};
use classforge::core::logging::init_logging;
use classforge::model::StyleTree;
use classforge::parser::TreeBuilder;
use classforge::GeneratorConfig;

/// Classforge - turn class-diagram style trees into source skeletons
#[derive(Parser)]
#[command(name = "classforge")]
#[command(about = "Generate class skeletons and SQL schemas from class-diagram style trees")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate files for one or more targets
    Generate {
        /// Style tree JSON file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Generator configuration JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target backend; repeat or separate with commas for several
        #[arg(short, long = "target", required = true, value_delimiter = ',')]
        targets: Vec<String>,

        /// Output directory
        #[arg(short, long, default_value = "generated")]
        output: PathBuf,
    },

    /// Build the syntax tree and print it as JSON
    Inspect {
        /// Style tree JSON file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the JSON (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a style tree builds, and report what it contains
    Validate {
        /// Style tree JSON file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show supported targets and SQL dialects
    Targets {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Main CLI application
#[derive(Debug, Default)]
pub struct ClassforgeApp {
    builder: TreeBuilder,
}

impl ClassforgeApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // An explicit flag wins; otherwise the environment decides, then --verbose.
        let level = cli.log_level.map(|l| l.as_str()).or_else(|| {
            let from_env = std::env::var("CLASSFORGE_LOG_LEVEL").is_ok()
                || std::env::var("RUST_LOG").is_ok();
            (cli.verbose && !from_env).then_some("info")
        });
        if let Err(e) = init_logging(level, cli.log_format.map(|f| f.as_str())) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Classforge v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Generate {
                input,
                config,
                targets,
                output,
            } => self.generate_command(&input, config.as_deref(), &targets, &output, cli.verbose),
            Commands::Inspect { input, output } => self.inspect_command(&input, output),
            Commands::Validate { input } => self.validate_command(&input, cli.verbose),
            Commands::Targets { json } => self.targets_command(json),
        }
    }

    /// Handle the generate command
    fn generate_command(
        &self,
        input: &Path,
        config: Option<&Path>,
        targets: &[String],
        output: &Path,
        verbose: bool,
    ) -> Result<()> {
        let config = match config {
            Some(path) => GeneratorConfig::from_json_file(path)?,
            None => GeneratorConfig::new(),
        };
        let style = self.read_style_tree(input)?;

        let orchestrator = Orchestrator::new(config);
        let report = orchestrator.run(&style, targets, output)?;

        for (target, files) in &report.files {
            if verbose {
                for file in files {
                    eprintln!("  {}", file.display());
                }
            }
            println!("{}: {} file(s)", target, files.len());
        }
        info!(
            classes = report.classes,
            files = report.file_count(),
            out = %output.display(),
            "Done"
        );
        Ok(())
    }

    /// Handle the inspect command
    fn inspect_command(&self, input: &Path, output: Option<PathBuf>) -> Result<()> {
        let style = self.read_style_tree(input)?;
        let tree = self.builder.build(&style)?;
        self.write_output(output, &tree.to_json()?)
    }

    /// Handle the validate command
    fn validate_command(&self, input: &Path, verbose: bool) -> Result<()> {
        let style = self.read_style_tree(input)?;
        if verbose {
            eprintln!(
                "Read {} cells and {} relationship edges",
                style.cells.len(),
                style.relationships.len()
            );
        }

        match self.builder.build_with_summary(&style) {
            Ok((_, summary)) => {
                println!(
                    "✓ Valid diagram: {} classes, {} properties, {} methods",
                    summary.classes, summary.properties, summary.methods
                );
                println!(
                    "  edges: {} linked, {} ignored, {} skipped",
                    summary.edges_linked, summary.edges_ignored, summary.edges_skipped
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid diagram: {:#}", e);
                Err(e)
            }
        }
    }

    /// Handle the targets command
    fn targets_command(&self, json: bool) -> Result<()> {
        if json {
            let listing = serde_json::json!({
                "targets": available_targets(),
                "dialects": DIALECT_NAMES,
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("Targets:");
            for target in available_targets() {
                println!("  {}", target);
            }
            println!();
            println!("SQL dialects (targets.sql.dialect):");
            for dialect in DIALECT_NAMES {
                println!("  {}", dialect);
            }
        }
        Ok(())
    }

    /// Read and parse a style tree from a file or stdin
    pub fn read_style_tree(&self, input: &Path) -> Result<StyleTree> {
        if input.to_string_lossy() == "-" {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            debug!(bytes = content.len(), "Read style tree from stdin");
            StyleTree::from_json_str(&content)
        } else {
            StyleTree::from_json_file(input)
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content)
                    .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const STYLE_TREE: &str = r#"{
        "root_id": "root",
        "cells": {
            "p": { "id": "p", "parent_id": "root", "style": { "shape": "swimlane" }, "values": ["Person"] },
            "p1": { "id": "p1", "parent_id": "p", "values": ["+name: string"] }
        }
    }"#;

    #[test]
    fn test_cli_parsing_generate_command() {
        let args = vec![
            "classforge",
            "generate",
            "--input",
            "diagram.json",
            "--target",
            "java,sql",
            "-t",
            "python",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Generate {
                input,
                config,
                targets,
                output,
            } => {
                assert_eq!(input.to_string_lossy(), "diagram.json");
                assert!(config.is_none());
                assert_eq!(targets, vec!["java", "sql", "python"]);
                assert_eq!(output.to_string_lossy(), "generated");
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_generate_requires_a_target() {
        let args = vec!["classforge", "generate", "--input", "diagram.json"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parsing_targets_and_global_flags() {
        let args = vec!["classforge", "targets", "--json", "--log-level", "debug", "-v"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert_eq!(cli.log_format, None);
        match cli.command {
            Commands::Targets { json } => assert!(json),
            _ => panic!("Expected Targets command"),
        }
    }

    #[test]
    fn test_cli_parsing_inspect_command() {
        let args = vec!["classforge", "inspect", "-i", "-", "-o", "tree.json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Inspect { input, output } => {
                assert_eq!(input.to_string_lossy(), "-");
                assert_eq!(output.unwrap().to_string_lossy(), "tree.json");
            }
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_read_style_tree_from_file() {
        let app = ClassforgeApp::new();
        let dir = tempdir().unwrap();
        let path = dir.path().join("diagram.json");
        fs::write(&path, STYLE_TREE).unwrap();

        let style = app.read_style_tree(&path).unwrap();
        assert_eq!(style.cells.len(), 2);
    }

    #[test]
    fn test_generate_command_writes_files() {
        let app = ClassforgeApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("diagram.json");
        fs::write(&input, STYLE_TREE).unwrap();
        let out = dir.path().join("out");

        app.generate_command(&input, None, &["java".to_string(), "sql".to_string()], &out, false)
            .unwrap();

        assert!(out.join("java").join("Person.java").exists());
        assert!(out.join("sql").join("Person.sql").exists());
    }

    #[test]
    fn test_generate_command_rejects_unknown_target() {
        let app = ClassforgeApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("diagram.json");
        fs::write(&input, STYLE_TREE).unwrap();
        let out = dir.path().join("out");

        let result = app.generate_command(&input, None, &["cobol".to_string()], &out, false);
        assert!(result.is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_inspect_and_validate_commands() {
        let app = ClassforgeApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("diagram.json");
        fs::write(&input, STYLE_TREE).unwrap();
        let output = dir.path().join("tree.json");

        app.inspect_command(&input, Some(output.clone())).unwrap();
        let json = fs::read_to_string(&output).unwrap();
        assert!(json.contains("\"Person\""));

        assert!(app.validate_command(&input, false).is_ok());
    }

    #[test]
    fn test_targets_command() {
        let app = ClassforgeApp::new();
        assert!(app.targets_command(true).is_ok());
        assert!(app.targets_command(false).is_ok());
    }
}

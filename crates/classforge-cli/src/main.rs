//! Classforge CLI - generate class skeletons and SQL schemas from class diagrams

mod cli;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();
    let app = cli::ClassforgeApp::new();

    if let Err(e) = app.run(cli_args) {
        tracing::error!(error = %e, "Run failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

//! Core abstractions shared by the parser and the backends
//!
//! Error types, configuration, logging setup and the [`Generator`] contract
//! every backend implements.

pub mod chumsky_utils;
mod config;
mod error;
pub mod generator;
pub mod logging;
mod types;

pub use config::*;
pub use error::*;
pub use generator::{ClassContext, Generator, MethodBody, TypeCategory};
pub use logging::*;
pub use types::*;

//! Codemap - function-level call graphs for Go projects
//!
//! Two-pass static extractor: Pass 1 indexes every top-level function and
//! method declaration across the main module and any requested dependencies
//! from the module cache; Pass 2 resolves call expressions syntactically
//! against that index. The result is a JSON artifact consumed by a
//! browser-based visualizer, which the crate can also serve.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod gomod;
pub mod parser;
pub mod serve;

// Re-export main types
pub use analysis::{
    AnalysisReport, AnalysisTarget, Analyzer, CallSite, CodeMap, Definition, Mapping,
};
pub use config::Config;
pub use error::{Error, Result};
pub use gomod::Manifest;

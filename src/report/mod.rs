//! Report assembly and rendering.
//!
//! This module assembles the immutable analysis result and derives the
//! two export views (Markdown document and JSON record) from it.

pub mod generator;

pub use generator::{
    assemble, generate_json_report, generate_markdown_report, AssemblyError,
};

//! Renderer module: trait-based format dispatch.

pub mod dump;
pub mod json;

use crate::model::Reference;
use anyhow::{anyhow, Result};

/// Trait for rendering the organized reference into a specific output format.
pub trait Renderer {
    fn render(&self, reference: &Reference) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "json" => Ok(Box::new(json::JsonRenderer)),
        "dump" | "text" => Ok(Box::new(dump::DumpRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use json or dump", format)),
    }
}

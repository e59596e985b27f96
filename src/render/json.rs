//! JSON renderer: the organized reference, serialized for the templating step.
//!
//! Records carry a `"kind"` discriminator; children keep their source order.

use crate::model::Reference;
use crate::render::Renderer;
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, reference: &Reference) -> Result<String> {
        let mut out =
            serde_json::to_string_pretty(reference).context("failed to serialize reference")?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

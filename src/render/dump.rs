//! Debug dump: indented listing of the reference for manual inspection.

use crate::model::*;
use crate::render::Renderer;
use anyhow::Result;

pub struct DumpRenderer;

impl Renderer for DumpRenderer {
    fn render(&self, reference: &Reference) -> Result<String> {
        Ok(dump(reference))
    }

    fn file_extension(&self) -> &str {
        "txt"
    }
}

/// Render the three collections, one record per line as `name (Kind)`.
pub fn dump(reference: &Reference) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("Blocks".to_string());
    for (category, blocks) in &reference.blocks {
        lines.push(format!("\t{}", category));
        for block in blocks {
            lines.push(format!("\t\t{} (BlockDoc)", block.name));
            push_records(&mut lines, &block.children, 3, 0);
        }
    }

    lines.push("Modules".to_string());
    for module in reference.modules.values() {
        lines.push(format!("\t{} (ModuleDoc)", module.name));
        push_fields(&mut lines, &module.fields, 2);
        push_records(&mut lines, &module.children, 2, 1);
    }

    lines.push("Datatypes".to_string());
    for datatype in reference.datatypes.values() {
        lines.push(format!("\t{} (DatatypeDoc)", datatype.name));
        push_records(&mut lines, &datatype.children, 2, 0);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Push `docs` at `indent` tabs, descending `depth` further levels.
fn push_records(lines: &mut Vec<String>, docs: &[Doc], indent: usize, depth: usize) {
    let tabs = "\t".repeat(indent);
    for doc in docs {
        lines.push(format!("{}{} ({})", tabs, doc.name(), doc.kind()));
        if depth > 0 {
            if let Some(children) = doc.children() {
                push_records(lines, children, indent + 1, depth - 1);
            }
        }
    }
}

fn push_fields(lines: &mut Vec<String>, fields: &[Field], indent: usize) {
    let tabs = "\t".repeat(indent);
    for field in fields {
        lines.push(format!("{}{} (Field)", tabs, field.name));
    }
}

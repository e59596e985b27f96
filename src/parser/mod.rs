//! Parser module: comment scanning, docstring parsing and tag decoding.

pub mod comment;
pub mod decode;
pub mod docstring;

use crate::error::DocError;
use crate::model::Entry;

/// Extract the decoded documentation records of one source file, in file order.
///
/// Errors carry the file path and the line of the offending comment block.
pub fn parse_file(path: &str, content: &str) -> Result<Vec<Entry>, DocError> {
    let mut entries = Vec::new();

    for block in comment::scan(content) {
        let docstring = docstring::parse(&block);
        match decode::decode(&docstring, path).map_err(|e| e.at(path, block.line))? {
            Some(entry) => entries.push(entry),
            None => tracing::trace!("{}:{}: skipping @internal docstring", path, block.line),
        }
    }

    Ok(entries)
}

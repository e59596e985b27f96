//! Comment block scanner: extracts `---` delimited doc comments from Lua source.
//!
//! A block opens on a line that is exactly `---` (after trimming) and collects
//! every following `--` line, with the marker and one optional space removed.
//! The first line that is not a `--` line closes the block.

use regex::Regex;
use std::sync::LazyLock;

static RE_CONTINUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^--[ ]?").unwrap());

const MARKER: &str = "---";

/// Raw lines of one documentation comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    /// 1-based line number of the opening `---`
    pub line: usize,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Searching,
    InComment,
}

/// Scan a source file for documentation comment blocks, in file order.
pub fn scan(input: &str) -> Vec<CommentBlock> {
    let mut state = State::Searching;
    let mut blocks = Vec::new();
    let mut current = CommentBlock {
        line: 0,
        lines: Vec::new(),
    };

    for (index, raw) in input.lines().enumerate() {
        let line = raw.trim();

        match state {
            State::Searching => {
                if line == MARKER {
                    current.line = index + 1;
                    state = State::InComment;
                }
            }
            State::InComment => {
                if let Some(m) = RE_CONTINUATION.find(line) {
                    current.lines.push(line[m.end()..].to_string());
                } else {
                    flush(&mut current, &mut blocks);
                    state = State::Searching;
                }
            }
        }
    }

    // A block running to EOF has no closing line; keep it anyway.
    if state == State::InComment {
        flush(&mut current, &mut blocks);
    }

    blocks
}

fn flush(current: &mut CommentBlock, blocks: &mut Vec<CommentBlock>) {
    if !current.lines.is_empty() {
        blocks.push(CommentBlock {
            line: current.line,
            lines: std::mem::take(&mut current.lines),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_single_block() {
        let input = "---\n-- @block Foo\n-- Does a thing.\nlocal Foo = block.factory(\"Foo\")\n";
        let blocks = scan(input);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].line, 1);
        assert_eq!(blocks[0].lines, vec!["@block Foo", "Does a thing."]);
    }

    #[test]
    fn scan_strips_one_space_only() {
        let input = "---\n--   indented\n--\n--no space\nx = 1\n";
        let blocks = scan(input);
        assert_eq!(blocks[0].lines, vec!["  indented", "", "no space"]);
    }

    #[test]
    fn scan_marker_without_continuation_yields_nothing() {
        let input = "---\nlocal x = 1\n---\n\n";
        assert!(scan(input).is_empty());
    }

    #[test]
    fn scan_ignores_plain_comments() {
        let input = "-- regular comment\n-- @block NotDoc\nlocal x = 1\n";
        assert!(scan(input).is_empty());
    }

    #[test]
    fn scan_multiple_blocks_in_order() {
        let input = "\
---
-- First.
function a() end

  ---
  -- Second, indented.
  function b() end
";
        let blocks = scan(input);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines, vec!["First."]);
        assert_eq!(blocks[1].line, 5);
        assert_eq!(blocks[1].lines, vec!["Second, indented."]);
    }

    #[test]
    fn scan_flushes_block_at_eof() {
        let input = "---\n-- @module radio\n-- @tfield string version Version";
        let blocks = scan(input);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines.len(), 2);
    }

    #[test]
    fn scan_marker_with_trailing_text_is_not_a_marker() {
        let input = "--- not a marker\n-- text\nx = 1\n";
        assert!(scan(input).is_empty());
    }
}

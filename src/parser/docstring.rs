//! Docstring parser: splits a comment block into description and `@tag` groups.

use super::comment::CommentBlock;
use regex::Regex;
use std::sync::LazyLock;

static RE_TAG_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@[a-z]").unwrap());

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@(\S+)\s*(.*)$").unwrap());

static RE_KEY_BASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]+").unwrap());

/// One `@key value` annotation. The value may span several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Key as written, e.g. `tparam[opt=5]`
    pub key: String,
    pub value: String,
}

impl Tag {
    /// Leading lowercase name of the key (`tparam[opt=5]` → `tparam`).
    pub fn base(&self) -> &str {
        RE_KEY_BASE.find(&self.key).map_or("", |m| m.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Docstring {
    /// Line of the comment block this came from
    pub line: usize,
    pub description: String,
    /// Tags in declaration order
    pub tags: Vec<Tag>,
}

impl Docstring {
    /// Value of the first tag whose key is exactly `key`.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    /// Tags whose base name is one of `bases`, in declaration order.
    pub fn lookup_multiple<'a>(&'a self, bases: &'a [&'a str]) -> impl Iterator<Item = &'a Tag> {
        self.tags.iter().filter(move |t| bases.contains(&t.base()))
    }

    pub fn has(&self, base: &str) -> bool {
        self.tags.iter().any(|t| t.base() == base)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Description,
    Tag,
}

/// Parse one comment block into a docstring.
pub fn parse(block: &CommentBlock) -> Docstring {
    let mut state = State::Description;
    let mut description: Vec<&str> = Vec::new();
    let mut tags: Vec<(String, Vec<&str>)> = Vec::new();

    for line in &block.lines {
        let is_tag = RE_TAG_START.is_match(line);

        if state == State::Description {
            if !is_tag {
                description.push(line);
                continue;
            }
            state = State::Tag;
        }

        if is_tag {
            if let Some(caps) = RE_TAG.captures(line) {
                let mut body = Vec::new();
                let inline = caps.get(2).map_or("", |m| m.as_str());
                if !inline.is_empty() {
                    body.push(inline);
                }
                tags.push((caps[1].to_string(), body));
            }
        } else if let Some((_, body)) = tags.last_mut() {
            body.push(line);
        }
    }

    trim_trailing_blank(&mut description);

    Docstring {
        line: block.line,
        description: description.join("\n"),
        tags: tags
            .into_iter()
            .map(|(key, mut body)| {
                trim_trailing_blank(&mut body);
                Tag {
                    key,
                    value: body.join("\n"),
                }
            })
            .collect(),
    }
}

fn trim_trailing_blank(lines: &mut Vec<&str>) {
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
}

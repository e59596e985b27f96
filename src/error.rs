//! Error types for documentation extraction.

use thiserror::Error;

/// Errors raised while decoding and assembling docstrings.
///
/// All of them are fatal: the run aborts instead of emitting partial output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocError {
    /// Tag key whose base name is not on the allow-list.
    #[error("unknown tag \"@{tag}\"")]
    UnknownTag { tag: String },

    /// Tag value (or parametrized key) that does not have the expected shape.
    #[error("malformed @{tag} value \"{value}\": {reason}")]
    MalformedTag {
        tag: String,
        value: String,
        reason: &'static str,
    },

    /// Variant-defining tag present but a required companion is absent.
    #[error("@{kind} docstring is missing required tag @{tag}")]
    MissingTag { kind: &'static str, tag: &'static str },

    /// None of the variant-defining tags are present.
    #[error(
        "unsupported docstring: missing @block, @module, @class, @datatype, @function, @property, or @table tag"
    )]
    Unrecognized,

    /// Nested record with no enclosing block, module, class or datatype.
    #[error("{kind} \"{name}\" has no enclosing namespace")]
    NoNamespace { kind: &'static str, name: String },

    /// Record that cannot appear at the top level of the reference.
    #[error("unexpected top-level {kind} \"{name}\"")]
    UnexpectedTopLevel { kind: &'static str, name: String },

    /// Any of the above, located at a comment block in a source file.
    #[error("{path}:{line}: {inner}")]
    At {
        path: String,
        line: usize,
        inner: Box<DocError>,
    },
}

impl DocError {
    pub fn malformed(tag: impl Into<String>, value: impl Into<String>, reason: &'static str) -> Self {
        Self::MalformedTag {
            tag: tag.into(),
            value: value.into(),
            reason,
        }
    }

    /// Attach the file and comment-block line to an error.
    pub fn at(self, path: impl Into<String>, line: usize) -> Self {
        match self {
            located @ Self::At { .. } => located,
            other => Self::At {
                path: path.into(),
                line,
                inner: Box::new(other),
            },
        }
    }

    /// The underlying error, without location.
    #[cfg(test)]
    pub fn kind(&self) -> &DocError {
        match self {
            Self::At { inner, .. } => inner.kind(),
            other => other,
        }
    }
}

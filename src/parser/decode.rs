//! Tag decoder: turns a docstring into one typed documentation record.
//!
//! The record variant is chosen by which variant-defining tag is present,
//! checked in a fixed priority order (see [`DECODERS`]).

use super::docstring::{Docstring, Tag};
use crate::error::DocError;
use crate::model::*;
use regex::Regex;
use std::sync::LazyLock;

/// Every tag a docstring may carry.
const ALLOWED_TAGS: &[&str] = &[
    "internal",
    "block",
    "module",
    "class",
    "datatype",
    "function",
    "property",
    "table",
    "tparam",
    "param",
    "treturn",
    "return",
    "tfield",
    "raise",
    "usage",
    "category",
    "signature",
];

type Decoder = fn(&Docstring) -> Result<(Doc, Option<String>), DocError>;

/// Variant-defining tags in dispatch priority order.
const DECODERS: &[(&str, Decoder)] = &[
    ("block", decode_block),
    ("module", decode_module),
    ("class", decode_class),
    ("datatype", decode_datatype),
    ("function", decode_function),
    ("property", decode_property),
    ("table", decode_table),
];

// -- Regex patterns -----------------------------------------------------------

// <type> <name> <description>
static RE_TYPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(\S+) (\S+) (.*)$").unwrap());

// <name> <description>, <type> <description>
static RE_UNTYPED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)^(\S+) (.*)$").unwrap());

static RE_TPARAM_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^tparam(?:\[(.*)\])?$").unwrap());

// -- Public API ---------------------------------------------------------------

/// Decode a docstring. Returns `None` for `@internal` docstrings.
pub fn decode(docstring: &Docstring, path: &str) -> Result<Option<Entry>, DocError> {
    validate_tags(docstring)?;

    if docstring.has("internal") {
        return Ok(None);
    }

    let decoder = DECODERS
        .iter()
        .find(|(tag, _)| docstring.has(tag))
        .map(|(_, decoder)| decoder)
        .ok_or(DocError::Unrecognized)?;

    let (doc, owner) = decoder(docstring)?;
    Ok(Some(Entry {
        doc,
        owner,
        path: path.to_string(),
        line: docstring.line,
    }))
}

fn validate_tags(docstring: &Docstring) -> Result<(), DocError> {
    for tag in &docstring.tags {
        let base = tag.base();
        if !ALLOWED_TAGS.contains(&base) {
            return Err(DocError::UnknownTag {
                tag: tag.key.clone(),
            });
        }
        if base == "tparam" {
            if !RE_TPARAM_KEY.is_match(&tag.key) {
                return Err(DocError::malformed(&tag.key, &tag.value, "bad tparam key"));
            }
        } else if tag.key != base {
            return Err(DocError::malformed(&tag.key, &tag.value, "unexpected key suffix"));
        }
    }
    Ok(())
}

// -- Variant decoders ---------------------------------------------------------

fn decode_block(ds: &Docstring) -> Result<(Doc, Option<String>), DocError> {
    let (name, description) = name_and_description(ds, "block")?;
    let doc = BlockDoc {
        name,
        description,
        category: require(ds, "block", "category")?.to_string(),
        parameters: decode_parameters(ds)?,
        signatures: decode_signatures(ds)?,
        usage: require(ds, "block", "usage")?.to_string(),
        children: Vec::new(),
    };
    Ok((Doc::Block(doc), None))
}

fn decode_module(ds: &Docstring) -> Result<(Doc, Option<String>), DocError> {
    let (name, description) = name_and_description(ds, "module")?;
    let doc = ModuleDoc {
        name,
        description,
        fields: decode_fields(ds)?,
        children: Vec::new(),
    };
    Ok((Doc::Module(doc), None))
}

fn decode_class(ds: &Docstring) -> Result<(Doc, Option<String>), DocError> {
    let (name, description) = name_and_description(ds, "class")?;
    let doc = ClassDoc {
        name,
        description,
        parameters: decode_parameters(ds)?,
        usage: ds.lookup("usage").map(str::to_string),
        children: Vec::new(),
    };
    Ok((Doc::Class(doc), None))
}

fn decode_datatype(ds: &Docstring) -> Result<(Doc, Option<String>), DocError> {
    let (name, description) = name_and_description(ds, "datatype")?;
    let doc = DatatypeDoc {
        name,
        description,
        parameters: decode_parameters(ds)?,
        children: Vec::new(),
    };
    Ok((Doc::Datatype(doc), None))
}

fn decode_function(ds: &Docstring) -> Result<(Doc, Option<String>), DocError> {
    let (name, description) = name_and_description(ds, "function")?;
    let (owner, is_static) = decode_owner(&name);
    let doc = FunctionDoc {
        name,
        description,
        parameters: decode_parameters(ds)?,
        returns: decode_returns(ds)?,
        raises: decode_raises(ds),
        usage: ds.lookup("usage").map(str::to_string),
        is_static,
    };
    Ok((Doc::Function(doc), owner))
}

fn decode_property(ds: &Docstring) -> Result<(Doc, Option<String>), DocError> {
    let (name, description) = name_and_description(ds, "property")?;
    let (owner, is_static) = decode_owner(&name);
    let doc = PropertyDoc {
        name,
        description,
        returns: decode_returns(ds)?,
        raises: decode_raises(ds),
        usage: ds.lookup("usage").map(str::to_string),
        is_static,
    };
    Ok((Doc::Property(doc), owner))
}

fn decode_table(ds: &Docstring) -> Result<(Doc, Option<String>), DocError> {
    let (name, description) = name_and_description(ds, "table")?;
    let doc = TableDoc {
        name,
        description,
        fields: decode_fields(ds)?,
    };
    Ok((Doc::Table(doc), None))
}

// -- Helpers ------------------------------------------------------------------

fn require<'a>(ds: &'a Docstring, kind: &'static str, tag: &'static str) -> Result<&'a str, DocError> {
    ds.lookup(tag).ok_or(DocError::MissingTag { kind, tag })
}

/// Name from the first line of the variant tag. Further lines of that tag
/// continue the docstring description.
fn name_and_description(ds: &Docstring, kind: &'static str) -> Result<(String, String), DocError> {
    let value = require(ds, kind, kind)?;
    let (first, rest) = value.split_once('\n').unwrap_or((value, ""));
    let rest = rest.trim_start_matches('\n');

    let name = first.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(DocError::malformed(kind, value, "expected a single name"));
    }

    let description = match (ds.description.is_empty(), rest.is_empty()) {
        (_, true) => ds.description.clone(),
        (true, false) => rest.to_string(),
        (false, false) => format!("{}\n{}", ds.description, rest),
    };

    Ok((name.to_string(), description))
}

/// `Class.func` → static, `Class:method` → instance, `func` → static, no owner.
fn decode_owner(name: &str) -> (Option<String>, bool) {
    if let Some((owner, _)) = name.split_once('.') {
        (Some(owner.to_string()), true)
    } else if let Some((owner, _)) = name.split_once(':') {
        (Some(owner.to_string()), false)
    } else {
        (None, true)
    }
}

fn decode_parameters(ds: &Docstring) -> Result<Vec<Parameter>, DocError> {
    ds.lookup_multiple(&["tparam", "param"])
        .map(decode_parameter)
        .collect()
}

/// @tparam[opt=<default>] <type> <name> <description>
/// @param <name> <description>
fn decode_parameter(tag: &Tag) -> Result<Parameter, DocError> {
    if tag.base() == "tparam" {
        let caps = RE_TYPED
            .captures(&tag.value)
            .ok_or_else(|| bad_value(tag, "expected <type> <name> <description>"))?;
        return Ok(Parameter {
            name: caps[2].to_string(),
            ty: Some(caps[1].to_string()),
            default: parameter_default(&tag.key),
            description: caps[3].to_string(),
        });
    }

    let caps = RE_UNTYPED
        .captures(&tag.value)
        .ok_or_else(|| bad_value(tag, "expected <name> <description>"))?;
    Ok(Parameter {
        name: caps[1].to_string(),
        ty: None,
        default: None,
        description: caps[2].to_string(),
    })
}

fn parameter_default(key: &str) -> Option<String> {
    RE_TPARAM_KEY
        .captures(key)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().strip_prefix("opt="))
        .map(str::to_string)
}

fn decode_returns(ds: &Docstring) -> Result<Vec<Return>, DocError> {
    ds.lookup_multiple(&["treturn", "return"])
        .map(decode_return)
        .collect()
}

/// @treturn <type> <description>
/// @return <description>
fn decode_return(tag: &Tag) -> Result<Return, DocError> {
    if tag.base() == "treturn" {
        let caps = RE_UNTYPED
            .captures(&tag.value)
            .ok_or_else(|| bad_value(tag, "expected <type> <description>"))?;
        return Ok(Return {
            ty: Some(caps[1].to_string()),
            description: caps[2].to_string(),
        });
    }

    Ok(Return {
        ty: None,
        description: tag.value.clone(),
    })
}

fn decode_raises(ds: &Docstring) -> Vec<String> {
    ds.lookup_multiple(&["raise"]).map(|t| t.value.clone()).collect()
}

fn decode_fields(ds: &Docstring) -> Result<Vec<Field>, DocError> {
    ds.lookup_multiple(&["tfield"]).map(decode_field).collect()
}

/// @tfield <type> <name> <description>
fn decode_field(tag: &Tag) -> Result<Field, DocError> {
    let caps = RE_TYPED
        .captures(&tag.value)
        .ok_or_else(|| bad_value(tag, "expected <type> <name> <description>"))?;
    Ok(Field {
        name: caps[2].to_string(),
        ty: caps[1].to_string(),
        description: caps[3].to_string(),
    })
}

fn decode_signatures(ds: &Docstring) -> Result<Vec<Signature>, DocError> {
    ds.lookup_multiple(&["signature"])
        .map(decode_signature)
        .collect()
}

/// @signature [<name>:<type>, ...] > [<name>:<type>, ...]
fn decode_signature(tag: &Tag) -> Result<Signature, DocError> {
    let (inputs, outputs) = tag
        .value
        .split_once('>')
        .filter(|(_, outputs)| !outputs.contains('>'))
        .ok_or_else(|| bad_value(tag, "expected a single '>' separator"))?;

    Ok(Signature {
        inputs: decode_ports(tag, inputs)?,
        outputs: decode_ports(tag, outputs)?,
    })
}

fn decode_ports(tag: &Tag, list: &str) -> Result<Vec<Port>, DocError> {
    let list = list.trim();
    if list.is_empty() {
        return Ok(Vec::new());
    }

    list.split(',')
        .map(|port| decode_port(tag, port.trim()))
        .collect()
}

/// `name:type`, or `...` for a variadic port.
fn decode_port(tag: &Tag, port: &str) -> Result<Port, DocError> {
    if port == "..." {
        return Ok(Port {
            name: port.to_string(),
            ty: None,
        });
    }

    match port.split_once(':') {
        Some((name, ty)) if !name.is_empty() && !ty.is_empty() && !ty.contains(':') => Ok(Port {
            name: name.to_string(),
            ty: Some(ty.to_string()),
        }),
        _ => Err(bad_value(tag, "expected <name>:<type> port")),
    }
}

fn bad_value(tag: &Tag, reason: &'static str) -> DocError {
    DocError::malformed(&tag.key, &tag.value, reason)
}

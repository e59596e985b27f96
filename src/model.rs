//! Data model for decoded reference documentation, independent of any renderer.

use serde::Serialize;
use std::collections::BTreeMap;

/// Parsed @tparam / @param entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    /// Absent for untyped @param
    #[serde(rename = "type")]
    pub ty: Option<String>,
    /// From the `[opt=<default>]` key suffix
    pub default: Option<String>,
    pub description: String,
}

/// Parsed @treturn / @return entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Return {
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub description: String,
}

/// One input or output port of a block signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Port {
    pub name: String,
    /// None for the variadic `...` port
    #[serde(rename = "type")]
    pub ty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
}

/// Parsed @tfield entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockDoc {
    pub name: String,
    pub description: String,
    pub category: String,
    pub parameters: Vec<Parameter>,
    pub signatures: Vec<Signature>,
    pub usage: String,
    pub children: Vec<Doc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDoc {
    pub name: String,
    pub description: String,
    /// @tfield entries
    pub fields: Vec<Field>,
    /// Records attached during assembly
    pub children: Vec<Doc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDoc {
    pub name: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
    pub usage: Option<String>,
    pub children: Vec<Doc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatatypeDoc {
    pub name: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
    pub children: Vec<Doc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDoc {
    /// Qualified name as written: `Class.func`, `Class:method` or `func`
    pub name: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
    pub returns: Vec<Return>,
    pub raises: Vec<String>,
    pub usage: Option<String>,
    #[serde(rename = "static")]
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDoc {
    pub name: String,
    pub description: String,
    pub returns: Vec<Return>,
    pub raises: Vec<String>,
    pub usage: Option<String>,
    #[serde(rename = "static")]
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDoc {
    pub name: String,
    pub description: String,
    pub fields: Vec<Field>,
}

/// A single decoded documentation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Doc {
    Block(BlockDoc),
    Module(ModuleDoc),
    Class(ClassDoc),
    Datatype(DatatypeDoc),
    Function(FunctionDoc),
    Property(PropertyDoc),
    Table(TableDoc),
}

impl Doc {
    pub fn name(&self) -> &str {
        match self {
            Doc::Block(d) => &d.name,
            Doc::Module(d) => &d.name,
            Doc::Class(d) => &d.name,
            Doc::Datatype(d) => &d.name,
            Doc::Function(d) => &d.name,
            Doc::Property(d) => &d.name,
            Doc::Table(d) => &d.name,
        }
    }

    /// Record kind as shown in diagnostics and the debug dump.
    pub fn kind(&self) -> &'static str {
        match self {
            Doc::Block(_) => "BlockDoc",
            Doc::Module(_) => "ModuleDoc",
            Doc::Class(_) => "ClassDoc",
            Doc::Datatype(_) => "DatatypeDoc",
            Doc::Function(_) => "FunctionDoc",
            Doc::Property(_) => "PropertyDoc",
            Doc::Table(_) => "TableDoc",
        }
    }

    /// Tag that defines this variant (`@block`, `@function`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            Doc::Block(_) => "block",
            Doc::Module(_) => "module",
            Doc::Class(_) => "class",
            Doc::Datatype(_) => "datatype",
            Doc::Function(_) => "function",
            Doc::Property(_) => "property",
            Doc::Table(_) => "table",
        }
    }

    /// Nested records, for the variants that act as namespaces.
    pub fn children(&self) -> Option<&[Doc]> {
        match self {
            Doc::Block(d) => Some(&d.children),
            Doc::Module(d) => Some(&d.children),
            Doc::Class(d) => Some(&d.children),
            Doc::Datatype(d) => Some(&d.children),
            Doc::Function(_) | Doc::Property(_) | Doc::Table(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Doc>> {
        match self {
            Doc::Block(d) => Some(&mut d.children),
            Doc::Module(d) => Some(&mut d.children),
            Doc::Class(d) => Some(&mut d.children),
            Doc::Datatype(d) => Some(&mut d.children),
            Doc::Function(_) | Doc::Property(_) | Doc::Table(_) => None,
        }
    }
}

/// A decoded record together with its assembly-time metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub doc: Doc,
    /// Owning class named by a @function / @property tag
    pub owner: Option<String>,
    /// Source location of the comment block, for diagnostics
    pub path: String,
    pub line: usize,
}

/// Organized output handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Category → blocks sorted by name
    pub blocks: BTreeMap<String, Vec<BlockDoc>>,
    pub modules: BTreeMap<String, ModuleDoc>,
    pub datatypes: BTreeMap<String, DatatypeDoc>,
}

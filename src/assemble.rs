//! Namespace assembly and organization of decoded records.
//!
//! Records arrive in source order. Blocks and modules open a new namespace;
//! classes, datatypes, functions, properties and tables nest under the
//! current namespace, or under a named owner for functions and properties.
//! Attachment depends on order: entries are folded in source order, one
//! file at a time.

use crate::error::DocError;
use crate::model::*;

/// Running state of the assembly fold.
#[derive(Debug, Default)]
pub struct Assembler {
    /// Top-level records
    docs: Vec<Doc>,
    /// Index into `docs` of the current namespace
    namespace: Option<usize>,
}

impl Assembler {
    /// Attach one record and return the updated state.
    pub fn step(mut self, entry: Entry) -> Result<Self, DocError> {
        let Entry {
            doc,
            owner,
            path,
            line,
        } = entry;

        match doc {
            Doc::Block(_) | Doc::Module(_) => self.open_namespace(doc),
            Doc::Class(_) | Doc::Datatype(_) => match self.namespace_children() {
                Some(children) => children.push(doc),
                None => self.open_namespace(doc),
            },
            Doc::Function(_) | Doc::Property(_) => {
                let owner_children = match owner.as_deref() {
                    Some(owner) => self.owner_children(owner),
                    None => None,
                };
                match owner_children {
                    Some(children) => children.push(doc),
                    // Unknown owners fall back to the current namespace.
                    None => self.attach(doc).map_err(|e| e.at(path, line))?,
                }
            }
            Doc::Table(_) => self.attach(doc).map_err(|e| e.at(path, line))?,
        }

        Ok(self)
    }

    /// Top-level records, each owning its nested children.
    pub fn finish(self) -> Vec<Doc> {
        self.docs
    }

    fn open_namespace(&mut self, doc: Doc) {
        self.docs.push(doc);
        self.namespace = Some(self.docs.len() - 1);
    }

    fn namespace_children(&mut self) -> Option<&mut Vec<Doc>> {
        let index = self.namespace?;
        self.docs[index].children_mut()
    }

    fn attach(&mut self, doc: Doc) -> Result<(), DocError> {
        match self.namespace_children() {
            Some(children) => {
                children.push(doc);
                Ok(())
            }
            None => Err(DocError::NoNamespace {
                kind: doc.tag(),
                name: doc.name().to_string(),
            }),
        }
    }

    /// Children of the first record named `owner`, searching top-level
    /// records before the current namespace's children.
    fn owner_children(&mut self, owner: &str) -> Option<&mut Vec<Doc>> {
        if let Some(index) = self.docs.iter().position(|d| is_owner(d, owner)) {
            return self.docs[index].children_mut();
        }

        self.namespace_children()?
            .iter_mut()
            .find(|d| is_owner(d, owner))?
            .children_mut()
    }
}

fn is_owner(doc: &Doc, owner: &str) -> bool {
    doc.name() == owner && doc.children().is_some()
}

/// Fold a sequence of entries into top-level records.
pub fn assemble(entries: impl IntoIterator<Item = Entry>) -> Result<Vec<Doc>, DocError> {
    entries
        .into_iter()
        .try_fold(Assembler::default(), Assembler::step)
        .map(Assembler::finish)
}

/// Group top-level records into the reference collections.
///
/// Blocks are grouped by category and sorted by name. The input is left untouched.
pub fn organize(docs: &[Doc]) -> Result<Reference, DocError> {
    let mut reference = Reference::default();

    for doc in docs {
        match doc {
            Doc::Block(block) => reference
                .blocks
                .entry(block.category.clone())
                .or_default()
                .push(block.clone()),
            Doc::Module(module) => {
                if reference.modules.insert(module.name.clone(), module.clone()).is_some() {
                    tracing::warn!("module {} documented more than once", module.name);
                }
            }
            Doc::Datatype(datatype) => {
                if reference
                    .datatypes
                    .insert(datatype.name.clone(), datatype.clone())
                    .is_some()
                {
                    tracing::warn!("datatype {} documented more than once", datatype.name);
                }
            }
            other => {
                return Err(DocError::UnexpectedTopLevel {
                    kind: other.tag(),
                    name: other.name().to_string(),
                })
            }
        }
    }

    for blocks in reference.blocks.values_mut() {
        blocks.sort_by(|a, b| a.name.cmp(&b.name));
    }

    Ok(reference)
}

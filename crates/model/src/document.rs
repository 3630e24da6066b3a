use std::fs;
use std::io;
use std::io::Read;
use std::path::{Path, PathBuf};

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use thiserror::Error;

use crate::node::Node;

/// Errors emitted while obtaining a [`TreeDocument`].
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// A single-rooted tree plus its provenance.
///
/// A document is either parsed from storage or built from scratch around a
/// caller-chosen root tag; a parse that fails yields an error, never a
/// partially populated tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeDocument {
    root: Node,
    source: Option<PathBuf>,
}

impl TreeDocument {
    /// Creates an empty document with the given root tag and no provenance.
    pub fn new(root_tag: impl Into<String>) -> Self {
        Self {
            root: Node::new(root_tag),
            source: None,
        }
    }

    /// Parses an XML file into a document. Encoding is detected from the BOM
    /// or the XML declaration.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DocumentError::NotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(DocumentError::NotAFile(path.to_path_buf()));
        }
        let bytes = fs::read(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            root: parse_root(&bytes)?,
            source: Some(path.to_path_buf()),
        })
    }

    /// Like [`TreeDocument::parse_file`], but an absent path (or a path that
    /// is not a regular file) yields a fresh empty document with the given
    /// root tag instead of an error. Lets callers treat "no config file yet"
    /// as a normal first run.
    pub fn parse_or_create(
        path: impl AsRef<Path>,
        root_tag: impl Into<String>,
    ) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        match Self::parse_file(path) {
            Ok(document) => Ok(document),
            Err(DocumentError::NotFound(_)) | Err(DocumentError::NotAFile(_)) => Ok(Self {
                root: Node::new(root_tag),
                source: Some(path.to_path_buf()),
            }),
            Err(err) => Err(err),
        }
    }

    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        Ok(Self {
            root: parse_root(bytes)?,
            source: None,
        })
    }

    pub fn parse_str(xml: &str) -> Result<Self, DocumentError> {
        Self::parse_bytes(xml.as_bytes())
    }

    /// Drains the reader and parses its contents.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, DocumentError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|err| DocumentError::Malformed(err.to_string()))?;
        Self::parse_bytes(&bytes)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Path the document was parsed from (or bound to by
    /// [`TreeDocument::parse_or_create`]); `None` for documents built in
    /// memory.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

struct Frame {
    node: Node,
    text: String,
}

/// Builds the element tree from quick-xml events. Whitespace-only text
/// fragments (pretty-printing indentation) are dropped, so element children
/// stay contiguous and positional queries need no filtering.
fn parse_root(bytes: &[u8]) -> Result<Node, DocumentError> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| DocumentError::Malformed(err.to_string()))?;
        match event {
            Event::Start(ref start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(DocumentError::Malformed(
                        "multiple root elements".to_string(),
                    ));
                }
                stack.push(Frame {
                    node: element_from(&reader, start)?,
                    text: String::new(),
                });
            }
            Event::Empty(ref start) => {
                let node = element_from(&reader, start)?;
                match stack.last_mut() {
                    Some(frame) => frame.node.adopt(node),
                    None if root.is_some() => {
                        return Err(DocumentError::Malformed(
                            "multiple root elements".to_string(),
                        ));
                    }
                    None => root = Some(node),
                }
            }
            Event::End(_) => {
                // The reader has already verified the tag names match.
                let frame = stack
                    .pop()
                    .ok_or_else(|| DocumentError::Malformed("unexpected end tag".to_string()))?;
                let mut node = frame.node;
                let text = frame.text.trim();
                if !text.is_empty() {
                    node.set_text(text);
                }
                match stack.last_mut() {
                    Some(parent) => parent.node.adopt(node),
                    None => root = Some(node),
                }
            }
            Event::Text(ref text) => {
                let decoded = reader
                    .decoder()
                    .decode(text.as_ref())
                    .map_err(|err| DocumentError::Malformed(err.to_string()))?;
                let unescaped = unescape(&decoded)
                    .map_err(|err| DocumentError::Malformed(err.to_string()))?;
                append_text(&mut stack, &unescaped)?;
            }
            Event::CData(ref cdata) => {
                let decoded = reader
                    .decoder()
                    .decode(cdata.as_ref())
                    .map_err(|err| DocumentError::Malformed(err.to_string()))?;
                append_text(&mut stack, &decoded)?;
            }
            Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => {}
            Event::Eof => break,
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(DocumentError::Malformed(
            "unclosed element at end of input".to_string(),
        ));
    }
    root.ok_or_else(|| DocumentError::Malformed("missing root element".to_string()))
}

fn element_from(reader: &Reader<&[u8]>, start: &BytesStart) -> Result<Node, DocumentError> {
    let decoder = reader.decoder();
    let tag = decoder
        .decode(start.name().as_ref())
        .map_err(|err| DocumentError::Malformed(err.to_string()))?
        .into_owned();
    let mut node = Node::new(tag);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| DocumentError::Malformed(err.to_string()))?;
        let name = decoder
            .decode(attribute.key.as_ref())
            .map_err(|err| DocumentError::Malformed(err.to_string()))?
            .into_owned();
        let raw = decoder
            .decode(&attribute.value)
            .map_err(|err| DocumentError::Malformed(err.to_string()))?;
        let value = unescape(&raw)
            .map_err(|err| DocumentError::Malformed(err.to_string()))?
            .into_owned();
        node.set_attribute(name, value);
    }
    Ok(node)
}

fn append_text(stack: &mut [Frame], text: &str) -> Result<(), DocumentError> {
    match stack.last_mut() {
        Some(frame) => {
            frame.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(DocumentError::Malformed(
            "text outside of root element".to_string(),
        )),
    }
}

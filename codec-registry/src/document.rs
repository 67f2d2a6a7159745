//! Reading of codec descriptor documents.
//!
//! A descriptor document lists codec entries grouped by transfer syntax:
//!
//! ```xml
//! <ImageReaderFactory>
//!   <element tsuid="1.2.840.10008.1.2.4.50">
//!     <reader format="jpeg" name="JPEG decoder"/>
//!   </element>
//! </ImageReaderFactory>
//! ```
//!
//! The walk is driven by a [`Schema`] naming the element expected
//! at each of the three levels.
//! Other elements are passed through, so that a level may be
//! nested at any depth within the one above it.
use crate::descriptor::Attributes;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;
use tracing::warn;

/// The element names of a descriptor document.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Schema {
    /// the document root
    pub root: &'static str,
    /// a group of entries for one transfer syntax
    pub group: &'static str,
    /// the attribute of `group` holding the transfer syntax UID
    pub key: &'static str,
    /// a codec entry
    pub entry: &'static str,
}

/// How far the document was read.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// The whole document was read.
    Complete,
    /// The document is not well formed;
    /// entries before the fault were delivered.
    Malformed {
        error: quick_xml::Error,
        position: usize,
    },
}

/// Where the walk currently is.
///
/// Each level is searched at any depth:
/// the root anywhere in the document,
/// groups anywhere within the root,
/// and entries anywhere within a group.
#[derive(Debug, Clone)]
enum Node {
    Outside,
    Root,
    Group { key: Option<String> },
}

/// Read a descriptor document,
/// handing each codec entry over to `on_entry`
/// together with the transfer syntax UID of its group.
///
/// An error from `on_entry` interrupts the walk and is returned as is.
pub(crate) fn read_document<R, F, E>(source: R, schema: &Schema, mut on_entry: F) -> Result<Outcome, E>
where
    R: BufRead,
    F: FnMut(&str, Attributes) -> Result<(), E>,
{
    let mut reader = Reader::from_reader(source);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Node> = Vec::new();

    loop {
        let result = match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => open(schema, stack.last(), &e).map(|opened| Some((opened, true))),
            Ok(Event::Empty(e)) => open(schema, stack.last(), &e).map(|opened| Some((opened, false))),
            Ok(Event::End(_)) => {
                stack.pop();
                Ok(None)
            }
            Ok(Event::Eof) => return Ok(Outcome::Complete),
            Ok(_) => Ok(None),
            Err(e) => Err(e),
        };
        match result {
            Ok(Some((Opened { node, entry }, has_children))) => {
                if let Some((key, attributes)) = entry {
                    on_entry(&key, attributes)?;
                }
                if has_children {
                    stack.push(node);
                }
            }
            Ok(None) => {}
            Err(error) => {
                return Ok(Outcome::Malformed {
                    error,
                    position: reader.buffer_position(),
                })
            }
        }
        buf.clear();
    }
}

struct Opened {
    node: Node,
    /// a codec entry to deliver: group key and entry attributes
    entry: Option<(String, Attributes)>,
}

impl Opened {
    fn node(node: Node) -> Self {
        Opened { node, entry: None }
    }
}

fn open(schema: &Schema, parent: Option<&Node>, e: &BytesStart) -> Result<Opened, quick_xml::Error> {
    let local_name = e.local_name();
    let name = local_name.as_ref();
    match parent.unwrap_or(&Node::Outside) {
        Node::Outside if name == schema.root.as_bytes() => Ok(Opened::node(Node::Root)),
        Node::Outside => Ok(Opened::node(Node::Outside)),
        Node::Root if name == schema.group.as_bytes() => {
            let key = read_attributes(e)?.get(schema.key).map(str::to_string);
            if key.is_none() {
                warn!("Ignoring <{}> without `{}` attribute", schema.group, schema.key);
            }
            Ok(Opened::node(Node::Group { key }))
        }
        Node::Root => Ok(Opened::node(Node::Root)),
        Node::Group { key } if name == schema.entry.as_bytes() => {
            let entry = match key {
                Some(key) => Some((key.clone(), read_attributes(e)?)),
                None => None,
            };
            Ok(Opened {
                node: Node::Group { key: key.clone() },
                entry,
            })
        }
        Node::Group { key } => {
            warn!(
                "Unexpected element <{}> in transfer syntax {:?}",
                String::from_utf8_lossy(name),
                key
            );
            Ok(Opened::node(Node::Group { key: key.clone() }))
        }
    }
}

fn read_attributes(e: &BytesStart) -> Result<Attributes, quick_xml::Error> {
    let mut attributes = Attributes::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.insert(key, value);
    }
    Ok(attributes)
}

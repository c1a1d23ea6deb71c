//! XML API v2 response parsing.
//!
//! Only the first `<item>` of a response is ever inspected. A missing item
//! or link is a lookup miss, not an error.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{FetchError, Result};

/// Typed `<link>` entries on a thing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Publisher,
    Designer,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Publisher => "boardgamepublisher",
            LinkKind::Designer => "boardgamedesigner",
        }
    }
}

/// `id` attribute of the first `<item>` in a search response
pub fn first_item_id(xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"item" => {
                return attribute(&e, b"id");
            }
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => {}
            Err(e) => return Err(FetchError::Parse(format!("XML parse error: {}", e))),
        }
    }
}

/// `value` attributes of the first item's links of the given kind, in document order
pub fn first_item_links(xml: &str, kind: LinkKind) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_item = false;
    let mut values = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"item" if !in_item => in_item = true,
                b"link" if in_item => push_link(&e, kind, &mut values)?,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                // A self-closing item has no links
                b"item" if !in_item => break,
                b"link" if in_item => push_link(&e, kind, &mut values)?,
                _ => {}
            },
            Ok(Event::End(e)) if in_item && e.name().as_ref() == b"item" => break,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(FetchError::Parse(format!("XML parse error: {}", e))),
        }
    }

    Ok(values)
}

fn push_link(e: &BytesStart<'_>, kind: LinkKind, values: &mut Vec<String>) -> Result<()> {
    if attribute(e, b"type")?.as_deref() != Some(kind.as_str()) {
        return Ok(());
    }
    if let Some(value) = attribute(e, b"value")? {
        values.push(value);
    }
    Ok(())
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| FetchError::Parse(format!("Bad attribute: {}", err)))?;
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|err| FetchError::Parse(format!("Bad attribute value: {}", err)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

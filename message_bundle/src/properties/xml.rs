//! XML properties document parsing.
//!
//! Accepts the `<properties><entry key="k">value</entry></properties>` shape.
//! `<comment>` elements and unknown elements are ignored; entries without a
//! `key` attribute are rejected.

use super::{Entries, PropertiesError};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parses an XML properties document into entries.
pub(crate) fn parse_xml(bytes: &[u8]) -> Result<Entries, PropertiesError> {
    let text = std::str::from_utf8(bytes)?;
    let mut reader = Reader::from_str(text);
    let mut entries = Entries::new();
    let mut current: Option<(String, String)> = None;
    loop {
        match reader.read_event().map_err(PropertiesError::Xml)? {
            Event::Start(element) if element.local_name().as_ref() == b"entry" => {
                current = Some((entry_key(&element)?, String::new()));
            }
            Event::Empty(element) if element.local_name().as_ref() == b"entry" => {
                entries.insert(entry_key(&element)?, String::new());
            }
            Event::Text(chunk) => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&chunk.unescape().map_err(quick_xml::Error::from)?);
                }
            }
            Event::CData(chunk) => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(std::str::from_utf8(chunk.as_ref())?);
                }
            }
            Event::End(element) if element.local_name().as_ref() == b"entry" => {
                if let Some((key, value)) = current.take() {
                    entries.insert(key, value);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(entries)
}

fn entry_key(element: &BytesStart<'_>) -> Result<String, PropertiesError> {
    let attribute = element
        .try_get_attribute("key")
        .map_err(quick_xml::Error::from)?
        .ok_or(PropertiesError::MissingKeyAttribute)?;
    let raw = std::str::from_utf8(attribute.value.as_ref())?;
    let unescaped = quick_xml::escape::unescape(raw).map_err(quick_xml::Error::from)?;
    Ok(unescaped.into_owned())
}

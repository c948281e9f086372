//! Parsers for the two on-disk resource formats.
//!
//! Message resources arrive either as classic `.properties` text or as the
//! XML properties document shape (`<properties><entry key="…">…</entry>`).
//! Both parsers produce the same [`Entries`] map so that the resolver and
//! every consumer downstream of it are format-agnostic.

use std::collections::HashMap;
use thiserror::Error;

mod text;
mod xml;

pub(crate) use text::parse_text;
pub(crate) use xml::parse_xml;

/// Key-to-template entries parsed from one resource file.
pub(crate) type Entries = HashMap<String, String>;

/// Failures raised while parsing a located resource.
///
/// These always indicate a found-but-malformed resource; they are wrapped
/// into [`BundleError::Read`](crate::BundleError::Read) by the resolver and
/// never trigger locale fallback.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PropertiesError {
    /// The byte source is not valid UTF-8.
    #[error("resource is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),

    /// A `\u` escape did not contain four hex digits or encoded an invalid
    /// code point.
    #[error("invalid \\u escape sequence")]
    UnicodeEscape,

    /// The XML document is not well-formed.
    #[error("malformed XML properties document")]
    Xml(#[from] quick_xml::Error),

    /// An `<entry>` element lacks its mandatory `key` attribute.
    #[error("XML entry element is missing its 'key' attribute")]
    MissingKeyAttribute,
}

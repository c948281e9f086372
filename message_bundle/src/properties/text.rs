//! Line-oriented `.properties` parsing.
//!
//! Supports the classic format: `key=value`, `key:value` or whitespace
//! separation, `#`/`!` comments, backslash line continuations and the
//! `\t \n \r \f \\ \uXXXX` escapes. Input is decoded as UTF-8, which covers
//! both modern UTF-8 files and legacy ASCII files that spell non-Latin text
//! with `\u` escapes.

use super::{Entries, PropertiesError};

/// Parses `.properties` bytes into entries.
pub(crate) fn parse_text(bytes: &[u8]) -> Result<Entries, PropertiesError> {
    let text = std::str::from_utf8(bytes)?;
    let mut entries = Entries::new();
    for line in logical_lines(text) {
        let (raw_key, raw_value) = split_key_value(&line);
        if raw_key.is_empty() {
            continue;
        }
        entries.insert(unescape(&raw_key)?, unescape(&raw_value)?);
    }
    Ok(entries)
}

/// Joins continuation lines and drops blanks and comments.
///
/// A natural line continues when it ends with an odd number of backslashes;
/// the continuation has its leading whitespace stripped. Comment detection
/// applies only to the first natural line, so a `#` inside a continuation is
/// literal content.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;
    for raw in text.lines() {
        let line = match pending.take() {
            Some(mut acc) => {
                acc.push_str(raw.trim_start());
                acc
            }
            None => {
                let trimmed = raw.trim_start();
                if trimmed.is_empty() || trimmed.starts_with(['#', '!']) {
                    continue;
                }
                trimmed.to_owned()
            }
        };
        if trailing_backslashes(&line) % 2 == 1 {
            let mut acc = line;
            acc.pop();
            pending = Some(acc);
        } else {
            lines.push(line);
        }
    }
    if let Some(acc) = pending {
        lines.push(acc);
    }
    lines
}

fn trailing_backslashes(line: &str) -> usize {
    line.chars().rev().take_while(|&c| c == '\\').count()
}

/// Splits a logical line into raw (still escaped) key and value parts.
///
/// The key ends at the first unescaped `=`, `:` or whitespace; whitespace
/// around the separator is ignored.
fn split_key_value(line: &str) -> (String, String) {
    let mut chars = line.chars().peekable();
    let mut key = String::new();
    let mut escaped = false;
    while let Some(c) = chars.next() {
        if escaped {
            key.push('\\');
            key.push(c);
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if c == '=' || c == ':' {
            break;
        }
        if c.is_whitespace() {
            while chars.next_if(|p| p.is_whitespace()).is_some() {}
            if chars.next_if(|&p| p == '=' || p == ':').is_some() {
                // Whitespace-padded separator; the value follows it.
            }
            break;
        }
        key.push(c);
    }
    if escaped {
        key.push('\\');
    }
    while chars.next_if(|p| p.is_whitespace()).is_some() {}
    let value: String = chars.collect();
    (key, value)
}

/// Resolves escape sequences in a raw key or value.
///
/// `\uXXXX` pairs encoding UTF-16 surrogates are combined; a lone surrogate
/// is rejected. Unknown escapes drop the backslash, matching the historical
/// behaviour of the format.
fn unescape(raw: &str) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => out.push(unicode_escape(&mut chars)?),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    Ok(out)
}

fn hex4(chars: &mut std::str::Chars<'_>) -> Result<u32, PropertiesError> {
    let mut code = 0u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or(PropertiesError::UnicodeEscape)?;
        code = code * 16 + digit;
    }
    Ok(code)
}

fn unicode_escape(chars: &mut std::str::Chars<'_>) -> Result<char, PropertiesError> {
    let code = hex4(chars)?;
    if (0xD800..=0xDBFF).contains(&code) {
        // High surrogate: the low half must follow as another \uXXXX.
        if chars.next() != Some('\\') || chars.next() != Some('u') {
            return Err(PropertiesError::UnicodeEscape);
        }
        let low = hex4(chars)?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return Err(PropertiesError::UnicodeEscape);
        }
        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
        return char::from_u32(combined).ok_or(PropertiesError::UnicodeEscape);
    }
    char::from_u32(code).ok_or(PropertiesError::UnicodeEscape)
}

//! Choice subformat: `limit#text|limit<text…`.
//!
//! A `#` boundary includes its limit, a `<` boundary excludes it. Selection
//! picks the last branch whose boundary the value satisfies; a value below
//! every boundary (including NaN) falls back to the first branch.

use super::PatternError;

#[derive(Debug)]
pub(crate) struct ChoiceFormat {
    branches: Vec<Branch>,
}

#[derive(Debug)]
struct Branch {
    limit: f64,
    exclusive: bool,
    text: String,
}

impl ChoiceFormat {
    pub(crate) fn parse(style: &str) -> Result<Self, PatternError> {
        let mut branches = Vec::new();
        for raw in split_branches(style) {
            branches.push(parse_branch(&raw)?);
        }
        if branches.is_empty() {
            return Err(PatternError::new("choice pattern has no branches"));
        }
        Ok(Self { branches })
    }

    pub(crate) fn select(&self, value: f64) -> &str {
        let mut selected = None;
        for branch in &self.branches {
            let matches = if branch.exclusive {
                value > branch.limit
            } else {
                value >= branch.limit
            };
            if matches {
                selected = Some(branch);
            } else {
                break;
            }
        }
        selected
            .or_else(|| self.branches.first())
            .map_or("", |branch| &branch.text)
    }
}

/// Splits on `|` outside quotes and nested argument blocks.
fn split_branches(style: &str) -> Vec<String> {
    let mut parts: Vec<String> = vec![String::new()];
    let mut depth = 0usize;
    let mut in_quote = false;
    for c in style.chars() {
        match c {
            '\'' => in_quote = !in_quote,
            '{' if !in_quote => depth += 1,
            '}' if !in_quote => depth = depth.saturating_sub(1),
            '|' if !in_quote && depth == 0 => {
                parts.push(String::new());
                continue;
            }
            _ => {}
        }
        if let Some(last) = parts.last_mut() {
            last.push(c);
        }
    }
    parts.retain(|part| !part.is_empty());
    parts
}

fn parse_branch(raw: &str) -> Result<Branch, PatternError> {
    let mut limit_text = String::new();
    let mut text = String::new();
    let mut boundary = None;
    for c in raw.chars() {
        if boundary.is_some() {
            text.push(c);
        } else if c == '#' {
            boundary = Some(false);
        } else if c == '<' {
            boundary = Some(true);
        } else {
            limit_text.push(c);
        }
    }
    let Some(exclusive) = boundary else {
        return Err(PatternError::new(format!(
            "choice branch '{raw}' lacks a '#' or '<' boundary"
        )));
    };
    let limit = parse_limit(limit_text.trim()).ok_or_else(|| {
        PatternError::new(format!("invalid choice limit '{}'", limit_text.trim()))
    })?;
    Ok(Branch {
        limit,
        exclusive,
        text,
    })
}

fn parse_limit(raw: &str) -> Option<f64> {
    match raw {
        "\u{221E}" => Some(f64::INFINITY),
        "-\u{221E}" => Some(f64::NEG_INFINITY),
        _ => raw.parse().ok(),
    }
}

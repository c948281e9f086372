//! MessageFormat-compatible template patterns.
//!
//! Templates use positional substitution slots: `{index}`,
//! `{index,type}` or `{index,type,style}` with
//! `type ∈ {number, date, time, choice}`. Single quotes escape literal text
//! (`''` is one literal quote), and an argument index beyond the supplied
//! arguments renders the placeholder itself, matching the behaviour of the
//! format this syntax originates from. Null arguments always render as the
//! literal string `null`, bypassing any type hint.

use crate::localizable::Renderable;
use chrono::NaiveDateTime;
use std::fmt::Write as _;
use std::iter::Peekable;
use std::mem::take;
use std::str::Chars;
use thiserror::Error;

mod choice;
use choice::ChoiceFormat;


/// A malformed pattern or an argument the pattern cannot format.
#[derive(Debug, Error)]
#[error("{detail}")]
pub(crate) struct PatternError {
    pub(crate) detail: String,
}

impl PatternError {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[derive(Debug)]
enum Segment {
    Literal(String),
    Argument { index: usize, format: ArgFormat },
}

#[derive(Debug)]
enum ArgFormat {
    Default,
    Number(NumberStyle),
    Date(DateTimeStyle),
    Time(DateTimeStyle),
    Choice(ChoiceFormat),
}

#[derive(Debug)]
enum NumberStyle {
    Plain,
    Integer,
}

#[derive(Debug)]
enum DateTimeStyle {
    Short,
    Medium,
    Long,
    Full,
    Custom(String),
}

impl DateTimeStyle {
    fn from_style(style: Option<&str>) -> Self {
        match style.map(str::trim) {
            None | Some("") | Some("medium") => Self::Medium,
            Some("short") => Self::Short,
            Some("long") => Self::Long,
            Some("full") => Self::Full,
            Some(custom) => Self::Custom(custom.to_owned()),
        }
    }

    fn date_spec(&self) -> &str {
        match self {
            Self::Short => "%Y-%m-%d",
            Self::Medium => "%b %d, %Y",
            Self::Long => "%B %d, %Y",
            Self::Full => "%A, %B %d, %Y",
            Self::Custom(spec) => spec,
        }
    }

    fn time_spec(&self) -> &str {
        match self {
            Self::Short => "%H:%M",
            Self::Medium | Self::Long | Self::Full => "%H:%M:%S",
            Self::Custom(spec) => spec,
        }
    }
}

/// Renders a pattern by substituting `args` into its slots.
pub(crate) fn format_message(
    pattern: &str,
    args: &[Renderable],
) -> Result<String, PatternError> {
    let mut out = String::with_capacity(pattern.len());
    for segment in parse(pattern)? {
        match segment {
            Segment::Literal(text) => out.push_str(&text),
            Segment::Argument { index, format } => match args.get(index) {
                None => {
                    // Out-of-range index renders the placeholder literally.
                    write!(out, "{{{index}}}").map_err(|_| PatternError::new("write failed"))?;
                }
                Some(Renderable::Null) => out.push_str("null"),
                Some(arg) => format_argument(&mut out, index, arg, &format, args)?,
            },
        }
    }
    Ok(out)
}

fn format_argument(
    out: &mut String,
    index: usize,
    arg: &Renderable,
    format: &ArgFormat,
    all_args: &[Renderable],
) -> Result<(), PatternError> {
    match format {
        ArgFormat::Default => out.push_str(&arg.default_text()),
        ArgFormat::Number(style) => {
            let value = numeric(arg)
                .ok_or_else(|| PatternError::new(format!("argument {index} is not a number")))?;
            match style {
                NumberStyle::Plain => match arg {
                    Renderable::Int(n) => {
                        write!(out, "{n}").map_err(|_| PatternError::new("write failed"))?;
                    }
                    _ => write!(out, "{value}").map_err(|_| PatternError::new("write failed"))?,
                },
                NumberStyle::Integer => {
                    match arg {
                        Renderable::Int(n) => {
                            write!(out, "{n}").map_err(|_| PatternError::new("write failed"))?;
                        }
                        _ => write!(out, "{value:.0}")
                            .map_err(|_| PatternError::new("write failed"))?,
                    }
                }
            }
        }
        ArgFormat::Date(style) => {
            let stamp = timestamp(arg)
                .ok_or_else(|| PatternError::new(format!("argument {index} is not a date")))?;
            write_formatted(out, &stamp, style.date_spec())?;
        }
        ArgFormat::Time(style) => {
            let stamp = timestamp(arg)
                .ok_or_else(|| PatternError::new(format!("argument {index} is not a time")))?;
            write_formatted(out, &stamp, style.time_spec())?;
        }
        ArgFormat::Choice(choice) => {
            let value = numeric(arg).ok_or_else(|| {
                PatternError::new(format!("argument {index} is not a number for choice"))
            })?;
            // The selected branch is itself a pattern; it is a strict
            // substring of the original, so recursion terminates.
            let branch = choice.select(value);
            out.push_str(&format_message(branch, all_args)?);
        }
    }
    Ok(())
}

#[expect(
    clippy::cast_precision_loss,
    reason = "choice limits and number styles compare in f64, as the pattern syntax defines"
)]
fn numeric(arg: &Renderable) -> Option<f64> {
    match arg {
        Renderable::Int(n) => Some(*n as f64),
        Renderable::Float(f) => Some(*f),
        _ => None,
    }
}

fn timestamp(arg: &Renderable) -> Option<NaiveDateTime> {
    match arg {
        Renderable::Timestamp(stamp) => Some(*stamp),
        _ => None,
    }
}

/// Formats a timestamp through a chrono spec, surfacing bad specs as
/// pattern errors instead of panicking in `Display`.
fn write_formatted(
    out: &mut String,
    stamp: &NaiveDateTime,
    spec: &str,
) -> Result<(), PatternError> {
    write!(out, "{}", stamp.format(spec))
        .map_err(|_| PatternError::new(format!("invalid date/time style '{spec}'")))
}

fn parse(pattern: &str) -> Result<Vec<Segment>, PatternError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' => consume_quoted(&mut chars, &mut literal),
            '{' => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(take(&mut literal)));
                }
                let raw = scan_block(&mut chars)?;
                segments.push(parse_argument(&raw)?);
            }
            _ => literal.push(c),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Handles a single quote: doubled quotes are one literal quote, otherwise
/// everything up to the closing quote is literal text. An unterminated
/// quote runs to the end of the pattern.
fn consume_quoted(chars: &mut Peekable<Chars<'_>>, literal: &mut String) {
    if chars.next_if(|&p| p == '\'').is_some() {
        literal.push('\'');
        return;
    }
    loop {
        match chars.next() {
            None => break,
            Some('\'') => {
                if chars.next_if(|&p| p == '\'').is_some() {
                    literal.push('\'');
                } else {
                    break;
                }
            }
            Some(quoted) => literal.push(quoted),
        }
    }
}

/// Collects the raw text of an argument block up to its matching brace,
/// respecting nested braces and quoted runs.
fn scan_block(chars: &mut Peekable<Chars<'_>>) -> Result<String, PatternError> {
    let mut depth = 1usize;
    let mut raw = String::new();
    let mut in_quote = false;
    for c in chars.by_ref() {
        match c {
            '\'' => {
                in_quote = !in_quote;
                raw.push(c);
            }
            '{' if !in_quote => {
                depth += 1;
                raw.push(c);
            }
            '}' if !in_quote => {
                depth -= 1;
                if depth == 0 {
                    return Ok(raw);
                }
                raw.push(c);
            }
            _ => raw.push(c),
        }
    }
    Err(PatternError::new("unmatched '{' in message pattern"))
}

/// Splits a raw argument block into index, type and style parts at
/// top-level commas; the style keeps any further commas verbatim.
fn split_spec(raw: &str) -> (String, Option<String>, Option<String>) {
    let mut parts: Vec<String> = vec![String::new()];
    let mut depth = 0usize;
    let mut in_quote = false;
    for c in raw.chars() {
        match c {
            '\'' => in_quote = !in_quote,
            '{' if !in_quote => depth += 1,
            '}' if !in_quote => depth = depth.saturating_sub(1),
            ',' if !in_quote && depth == 0 && parts.len() < 3 => {
                parts.push(String::new());
                continue;
            }
            _ => {}
        }
        if let Some(last) = parts.last_mut() {
            last.push(c);
        }
    }
    let mut iter = parts.into_iter();
    let index = iter.next().unwrap_or_default();
    (index, iter.next(), iter.next())
}

fn parse_argument(raw: &str) -> Result<Segment, PatternError> {
    let (index_part, type_part, style_part) = split_spec(raw);
    let index: usize = index_part.trim().parse().map_err(|_| {
        PatternError::new(format!("invalid argument index '{}'", index_part.trim()))
    })?;
    let format = match type_part.as_deref().map(str::trim) {
        None | Some("") => ArgFormat::Default,
        Some("number") => ArgFormat::Number(match style_part.as_deref().map(str::trim) {
            None | Some("") => NumberStyle::Plain,
            Some("integer") => NumberStyle::Integer,
            Some(other) => {
                return Err(PatternError::new(format!(
                    "unsupported number style '{other}'"
                )));
            }
        }),
        Some("date") => ArgFormat::Date(DateTimeStyle::from_style(style_part.as_deref())),
        Some("time") => ArgFormat::Time(DateTimeStyle::from_style(style_part.as_deref())),
        Some("choice") => {
            ArgFormat::Choice(ChoiceFormat::parse(style_part.as_deref().unwrap_or_default())?)
        }
        Some(other) => {
            return Err(PatternError::new(format!("unknown format type '{other}'")));
        }
    };
    Ok(Segment::Argument { index, format })
}

//! PEST-based parser for operator command templates.
//!
//! A command template is free-form text with `${keyword}` placeholders.
//! Parsing yields the ordered placeholder list with byte spans; keyword
//! classification follows the declaration conventions of the framework
//! (inputs, outputs, selectors, free parameters).

use pest::Parser;
use pest_derive::Parser;
use serde::{Deserialize, Serialize};


/* ===================== Template ===================== */

/// A parsed command template: the raw text plus every placeholder in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandTemplate {
    /// Template text as declared.
    pub raw: String,
    /// Placeholders in textual order.
    pub placeholders: Vec<Placeholder>,
}

/// One `${keyword}` occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeholder {
    /// Keyword text between the braces.
    pub keyword: String,
    pub kind: PlaceholderKind,
    /// Byte range of the whole `${keyword}` token.
    pub span: Span,
}

/// Classification of a placeholder keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaceholderKind {
    /// `${in}`, `${ins}`, `${mmin}` and their `_<n>` ranked forms.
    Input {
        /// Explicit `_<n>` suffix, or 0 for the unranked form.
        rank: u32,
        /// `mm` prefix: the slot takes a list of datasets.
        multiple: bool,
        /// `s` suffix: the slot takes a time-series of files.
        series: bool,
    },
    /// `${out}` (primary, `label` is `None`) or `${out_<label>}`.
    Output { label: Option<String> },
    /// `${var}` / `${var_<n>}`: variable selection for input `rank`.
    Variable { rank: u32 },
    /// `${period}` / `${period_iso}` and their ranked forms.
    Period { rank: u32, iso: bool },
    /// `${domain}` / `${domain_<n>}`: spatial-domain selection.
    Domain { rank: u32 },
    /// `${alias}`: on-the-fly variable renaming/rescaling.
    Alias,
    /// `${missing}`: on-the-fly missing-value substitution.
    Missing,
    /// `${crs}`: the invocation's symbolic expression text.
    Crs,
    /// Any other keyword, filled from invocation parameters.
    Param,
}

/// Byte range of a token in the template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/* ===================== PEST Parser ===================== */

#[derive(Parser)]
#[grammar = "parser/template.pest"]
struct TemplateParser;

/* ===================== Error Type ===================== */

/// Template text that does not match the placeholder grammar.
#[derive(Debug, Clone)]
pub struct ParseError {
    message: String,
    span: Option<Span>,
}

impl ParseError {
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let span = match err.location {
            pest::error::InputLocation::Pos(pos) => Some(Span {
                start: pos,
                end: pos,
            }),
            pest::error::InputLocation::Span((start, end)) => Some(Span { start, end }),
        };
        ParseError {
            message: err.to_string(),
            span,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/* ===================== Public API ===================== */

/// Parse a command template into its placeholder list.
///
/// A template with no placeholder at all is a valid parse; contract rules
/// (at least one input, rank sequence, ...) are checked at declaration,
/// not here.
pub fn parse_template(text: &str) -> ParseResult<CommandTemplate> {
    let mut pairs = TemplateParser::parse(Rule::template, text)?;

    let template = pairs.next().unwrap();
    let mut placeholders = Vec::new();
    for pair in template.into_inner() {
        match pair.as_rule() {
            Rule::placeholder => placeholders.push(build_placeholder(pair)),
            Rule::literal | Rule::EOI => {}
            rule => {
                return Err(ParseError {
                    message: format!("unexpected template content: {:?}", rule),
                    span: Some(pair_to_span(&pair)),
                })
            }
        }
    }

    Ok(CommandTemplate {
        raw: text.to_string(),
        placeholders,
    })
}

/* ===================== Placeholder Builder ===================== */

fn build_placeholder(pair: pest::iterators::Pair<Rule>) -> Placeholder {
    let span = pair_to_span(&pair);
    let keyword = pair.into_inner().next().unwrap().as_str().to_string();
    let kind = classify(&keyword);
    Placeholder {
        keyword,
        kind,
        span,
    }
}

fn pair_to_span(pair: &pest::iterators::Pair<Rule>) -> Span {
    let pest_span = pair.as_span();
    Span {
        start: pest_span.start(),
        end: pest_span.end(),
    }
}

/* ===================== Keyword Classification ===================== */

/// Classify a placeholder keyword.
///
/// Input keywords have the shape `(mm)?in(s)?(_<digits>)?`; anything that
/// almost looks like one (`${in_}`, `${insitu}`, `${index}`) is a free
/// parameter, not an input.
fn classify(keyword: &str) -> PlaceholderKind {
    if let Some(kind) = classify_input(keyword) {
        return kind;
    }
    if keyword == "out" {
        return PlaceholderKind::Output { label: None };
    }
    if let Some(label) = keyword.strip_prefix("out_") {
        return PlaceholderKind::Output {
            label: Some(label.to_string()),
        };
    }
    if let Some(rank) = ranked(keyword, "period_iso") {
        return PlaceholderKind::Period { rank, iso: true };
    }
    if let Some(rank) = ranked(keyword, "period") {
        return PlaceholderKind::Period { rank, iso: false };
    }
    if let Some(rank) = ranked(keyword, "var") {
        return PlaceholderKind::Variable { rank };
    }
    if let Some(rank) = ranked(keyword, "domain") {
        return PlaceholderKind::Domain { rank };
    }
    match keyword {
        "alias" => PlaceholderKind::Alias,
        "missing" => PlaceholderKind::Missing,
        "crs" => PlaceholderKind::Crs,
        _ => PlaceholderKind::Param,
    }
}

fn classify_input(keyword: &str) -> Option<PlaceholderKind> {
    let (multiple, rest) = match keyword.strip_prefix("mm") {
        Some(rest) => (true, rest),
        None => (false, keyword),
    };
    let rest = rest.strip_prefix("in")?;
    let (series, rest) = match rest.strip_prefix('s') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    let rank = match rest.strip_prefix('_') {
        Some(digits) => parse_rank(digits)?,
        None if rest.is_empty() => 0,
        None => return None,
    };
    Some(PlaceholderKind::Input {
        rank,
        multiple,
        series,
    })
}

/// `Some(0)` for `base` itself, `Some(n)` for `base_<digits>`, else `None`.
fn ranked(keyword: &str, base: &str) -> Option<u32> {
    if keyword == base {
        return Some(0);
    }
    let digits = keyword.strip_prefix(base)?.strip_prefix('_')?;
    parse_rank(digits)
}

fn parse_rank(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

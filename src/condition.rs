//! MSBuild configuration-condition parser.
//!
//! Parses the `Condition` attribute found on `.csproj` `<PropertyGroup>`
//! elements and resolves it to a configuration/platform pair, for example:
//!
//! - `'$(Configuration)|$(Platform)' == 'Debug|AnyCPU'` → `Debug` / `Any CPU`
//! - `'$(Configuration)' == 'Release'` → `Release` / `Any CPU`
//!
//! Only the single equality shape `'template' == 'value'` is supported; the
//! left-hand template may use any placeholder names, not just the well-known
//! `Configuration`/`Platform` pair. Uses [`chumsky`] for the template grammar
//! and [`regex`] for the compiled match pattern.
//!
//! ## Template grammar
//!
//! ```text
//! template    = segment*
//! segment     = placeholder | literal
//! placeholder = '$(' name ')'
//! literal     = any run of characters not starting a placeholder
//! ```
//!
//! Each placeholder compiles to a named, non-greedy capture group; literals
//! (including the `|` separator and the surrounding quotes) match verbatim.

use chumsky::prelude::*;
use regex::Regex;

use crate::configurations::ProjectConfiguration;

// ═══════════════════════════════════════════════════════════════════════════════
//  Error
// ═══════════════════════════════════════════════════════════════════════════════

/// Why a condition expression did not resolve to a configuration.
///
/// Every variant is recoverable: arbitrary project conditions routinely fall
/// outside the supported shape, and callers treat any failure as "this group
/// does not encode a configuration".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    /// The expression is empty.
    Empty,
    /// The expression does not split on `==` into exactly two parts.
    NotAnEquality,
    /// The left-hand template could not be parsed or compiled into a match
    /// pattern (unterminated placeholder, invalid placeholder name, …).
    MalformedTemplate(String),
    /// The compiled template did not match the right-hand value.
    NoMatch,
    /// No non-empty `Configuration` capture.
    MissingConfiguration,
    /// The `Platform` capture resolved to an empty value.
    MissingPlatform,
}

impl std::fmt::Display for ConditionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "condition expression is empty"),
            Self::NotAnEquality => {
                write!(f, "condition expression is not a single '==' comparison")
            }
            Self::MalformedTemplate(detail) => {
                write!(f, "malformed condition template: {detail}")
            }
            Self::NoMatch => write!(f, "condition value does not match its template"),
            Self::MissingConfiguration => {
                write!(f, "condition does not yield a configuration name")
            }
            Self::MissingPlatform => write!(f, "condition yields an empty platform name"),
        }
    }
}

impl std::error::Error for ConditionError {}

// ═══════════════════════════════════════════════════════════════════════════════
//  Template grammar
// ═══════════════════════════════════════════════════════════════════════════════

/// One piece of a condition template.
#[derive(Debug, Clone, PartialEq)]
enum TemplateSegment {
    /// Verbatim text (quotes, separators, …).
    Literal(String),
    /// A `$(Name)` placeholder, capturing one-or-more characters.
    Placeholder(String),
}

/// Build the chumsky parser for the left-hand template of a condition.
fn template_parser<'a>()
-> impl Parser<'a, &'a str, Vec<TemplateSegment>, extra::Err<Simple<'a, char>>> {
    // ── $(Name) placeholder ──────────────────────────────────────────────
    let placeholder = just("$(")
        .ignore_then(none_of(')').repeated().at_least(1).to_slice())
        .then_ignore(just(')'))
        .map(|name: &str| TemplateSegment::Placeholder(name.to_string()));

    // ── Literal run — stops where the next placeholder starts ────────────
    let literal = any()
        .and_is(just("$(").not())
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|text: &str| TemplateSegment::Literal(text.to_string()));

    choice((placeholder, literal))
        .repeated()
        .collect()
        .then_ignore(end())
}

/// Compile template segments into a regex: literals are escaped, each
/// placeholder becomes a named non-greedy capture group.
///
/// `'$(Configuration)|$(Platform)'` compiles to
/// `'(?P<Configuration>.+?)\|(?P<Platform>.+?)'`.
fn compile_template(segments: &[TemplateSegment]) -> Result<Regex, regex::Error> {
    let mut pattern = String::new();

    for segment in segments {
        match segment {
            TemplateSegment::Literal(text) => pattern.push_str(&regex::escape(text)),
            TemplateSegment::Placeholder(name) => {
                pattern.push_str("(?P<");
                pattern.push_str(name);
                pattern.push_str(">.+?)");
            }
        }
    }

    Regex::new(&pattern)
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Condition resolution
// ═══════════════════════════════════════════════════════════════════════════════

/// Resolve a `Condition` attribute to the configuration/platform pair it
/// selects.
///
/// Splits the expression on `==`, compiles the left-hand template and matches
/// it against the right-hand value. The `Configuration` capture is required;
/// the `Platform` capture defaults to `AnyCPU` when the template has no such
/// placeholder. The source token `AnyCPU` is rewritten to the canonical
/// platform name `Any CPU` in the captured platform value.
///
/// ```
/// use projconfig_rs::parse_condition;
///
/// let cfg = parse_condition("'$(Configuration)|$(Platform)' == 'Debug|AnyCPU'").unwrap();
/// assert_eq!(cfg.configuration, "Debug");
/// assert_eq!(cfg.platform, "Any CPU");
/// ```
pub fn parse_condition(expression: &str) -> Result<ProjectConfiguration, ConditionError> {
    if expression.is_empty() {
        return Err(ConditionError::Empty);
    }

    let parts: Vec<&str> = expression.split("==").collect();
    if parts.len() != 2 {
        return Err(ConditionError::NotAnEquality);
    }

    let segments = template_parser()
        .parse(parts[0].trim())
        .into_result()
        .map_err(|errs| {
            let messages: Vec<String> = errs.iter().map(|e| format!("{e}")).collect();
            ConditionError::MalformedTemplate(messages.join("; "))
        })?;

    let pattern = compile_template(&segments)
        .map_err(|e| ConditionError::MalformedTemplate(e.to_string()))?;

    let captures = pattern
        .captures(parts[1].trim())
        .ok_or(ConditionError::NoMatch)?;

    let configuration = captures
        .name("Configuration")
        .map(|m| m.as_str().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConditionError::MissingConfiguration)?;

    let platform = captures
        .name("Platform")
        .map(|m| m.as_str())
        .unwrap_or("AnyCPU")
        .replace("AnyCPU", "Any CPU");
    if platform.is_empty() {
        return Err(ConditionError::MissingPlatform);
    }

    Ok(ProjectConfiguration { configuration, platform })
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════

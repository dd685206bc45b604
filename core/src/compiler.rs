//! Part compiler — AST to compiled artifact
//!
//! Walks the AST once per translation-option set and produces both code
//! generators in a single pass: an anchored regex for matching, with one
//! generated named capture group per parameter, and the parallel assembler
//! instruction tree with translated literals already resolved to text.
//!
//! # Capture-slot mapping
//!
//! Parameters compile to generated named groups `p0`, `p1`, … recorded in an
//! explicit slot table alongside the parameter name they stand for. Lookup
//! at match time goes through the group *name*, so grouping constructs
//! inside a user constraint can never shift which subject substring is
//! attributed to which parameter.

use std::collections::HashMap;

use regex::Regex;

use crate::translator::Translator;
use crate::{Part, RouteError};

/// Translation options resolved for one compilation.
pub(crate) struct TranslationContext<'a> {
    pub translator: &'a dyn Translator,
    pub text_domain: &'a str,
    pub locale: Option<&'a str>,
}

/// One assembler instruction. Mirrors the part structure with translation
/// already applied, so assembly needs no translator.
#[derive(Debug)]
pub(crate) enum AsmOp {
    /// Emit literal text verbatim (pattern literals and resolved
    /// translated literals alike).
    Literal(String),
    /// Emit the percent-encoded value of the named parameter.
    Parameter(String),
    /// Recurse into an optional group, or skip it entirely.
    Group(Vec<AsmOp>),
}

/// A compiled artifact: matcher and assembler representations for one
/// (constraints, translation options) combination. Immutable once built.
#[derive(Debug)]
pub(crate) struct CompiledPattern {
    /// `^(?:…)` — anchored at the start offset, trailing subject allowed.
    partial: Regex,
    /// `^(?:…)$` — the entire subject must be consumed.
    full: Regex,
    /// Generated group name → parameter name, in declaration order.
    slots: Vec<(String, String)>,
    /// Assembler instructions.
    ops: Vec<AsmOp>,
}

impl CompiledPattern {
    pub(crate) fn partial(&self) -> &Regex {
        &self.partial
    }

    pub(crate) fn full(&self) -> &Regex {
        &self.full
    }

    pub(crate) fn slots(&self) -> &[(String, String)] {
        &self.slots
    }

    pub(crate) fn ops(&self) -> &[AsmOp] {
        &self.ops
    }
}

/// Compile a part sequence against the given constraints and translation
/// options.
///
/// # Errors
///
/// [`RouteError::InvalidPattern`] when a constraint fragment breaks the
/// assembled regex; [`RouteError::NoTranslator`] when the sequence contains
/// a translated literal but no translation context was supplied.
pub(crate) fn compile(
    parts: &[Part],
    constraints: &HashMap<String, String>,
    translation: Option<&TranslationContext<'_>>,
) -> Result<CompiledPattern, RouteError> {
    let mut body = String::new();
    let mut slots = Vec::new();
    let mut ops = Vec::new();
    build(parts, constraints, translation, &mut body, &mut slots, &mut ops)?;

    let partial = Regex::new(&format!("^(?:{body})")).map_err(|e| invalid(&body, &e))?;
    let full = Regex::new(&format!("^(?:{body})$")).map_err(|e| invalid(&body, &e))?;

    Ok(CompiledPattern {
        partial,
        full,
        slots,
        ops,
    })
}

fn invalid(body: &str, source: &regex::Error) -> RouteError {
    RouteError::InvalidPattern {
        pattern: body.to_string(),
        source: source.to_string(),
    }
}

fn build(
    parts: &[Part],
    constraints: &HashMap<String, String>,
    translation: Option<&TranslationContext<'_>>,
    body: &mut String,
    slots: &mut Vec<(String, String)>,
    ops: &mut Vec<AsmOp>,
) -> Result<(), RouteError> {
    for part in parts {
        match part {
            Part::Literal(text) => {
                body.push_str(&regex::escape(text));
                ops.push(AsmOp::Literal(text.clone()));
            }
            Part::Parameter { name, delimiters } => {
                let group = format!("p{}", slots.len());
                body.push_str("(?P<");
                body.push_str(&group);
                body.push('>');
                if let Some(constraint) = constraints.get(name) {
                    body.push_str(constraint);
                } else if let Some(delims) = delimiters {
                    body.push_str("[^");
                    body.push_str(&escape_class(delims));
                    body.push_str("]+");
                } else {
                    body.push_str("[^/]+");
                }
                body.push(')');
                slots.push((group, name.clone()));
                ops.push(AsmOp::Parameter(name.clone()));
            }
            Part::TranslatedLiteral(id) => {
                let ctx = translation.ok_or(RouteError::NoTranslator)?;
                let text = ctx
                    .translator
                    .translate(id, ctx.text_domain, ctx.locale)
                    .unwrap_or_else(|| id.clone());
                body.push_str(&regex::escape(&text));
                ops.push(AsmOp::Literal(text));
            }
            Part::Optional(inner) => {
                body.push_str("(?:");
                let mut inner_ops = Vec::new();
                build(inner, constraints, translation, body, slots, &mut inner_ops)?;
                body.push_str(")?");
                ops.push(AsmOp::Group(inner_ops));
            }
        }
    }

    Ok(())
}

/// Escape a delimiter set for embedding in a regex character class.
fn escape_class(delims: &str) -> String {
    let mut out = String::with_capacity(delims.len() * 2);
    for c in delims.chars() {
        if matches!(c, '\\' | '[' | ']' | '^' | '-' | '&') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

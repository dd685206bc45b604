//! `Part` — the pattern AST
//!
//! A parsed pattern is an ordered sequence of parts; optional groups recurse
//! into their own sequences. Every later stage (compiler, matcher, assembler)
//! is a single visitor over this variant set, so the AST stays a plain tagged
//! union with no behavior of its own beyond structural queries.

/// One node of a parsed segment pattern.
///
/// # Example
///
/// ```
/// use ruta::{parse, Part};
///
/// let parts = parse("/blog[/:page]").unwrap();
/// assert_eq!(parts[0], Part::Literal("/blog".to_string()));
/// assert!(matches!(parts[1], Part::Optional(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Literal text, matched verbatim and emitted verbatim.
    Literal(String),

    /// A named parameter.
    ///
    /// `delimiters` holds the content of a `{…}` marker immediately
    /// following the name: the set of characters that terminate the
    /// parameter's greedy capture. `None` means the inherited default
    /// delimiter `/`. A declared constraint overrides the delimiter
    /// entirely.
    Parameter {
        /// Parameter name; dashes are allowed (`:foo-bar` names `foo-bar`).
        name: String,
        /// Custom terminating characters, if a `{…}` marker was given.
        delimiters: Option<String>,
    },

    /// A literal resolved through a message catalog rather than matched
    /// verbatim. Holds the message id.
    TranslatedLiteral(String),

    /// A bracketed sub-sequence that may be entirely absent from both the
    /// subject and the assembled output. Groups nest arbitrarily.
    Optional(Vec<Part>),
}

impl Part {
    /// Returns `true` if this part or any nested part is a
    /// [`TranslatedLiteral`](Part::TranslatedLiteral).
    pub fn contains_translated(&self) -> bool {
        match self {
            Self::TranslatedLiteral(_) => true,
            Self::Optional(inner) => inner.iter().any(Part::contains_translated),
            _ => false,
        }
    }
}

/// Collect parameter names in declaration order, recursing into optional
/// groups.
pub(crate) fn parameter_names(parts: &[Part]) -> Vec<&str> {
    let mut names = Vec::new();
    collect_names(parts, &mut names);
    names
}

fn collect_names<'a>(parts: &'a [Part], names: &mut Vec<&'a str>) {
    for part in parts {
        match part {
            Part::Parameter { name, .. } => names.push(name),
            Part::Optional(inner) => collect_names(inner, names),
            _ => {}
        }
    }
}

/// Returns `true` if any part of the sequence is a translated literal.
pub(crate) fn contains_translated(parts: &[Part]) -> bool {
    parts.iter().any(Part::contains_translated)
}

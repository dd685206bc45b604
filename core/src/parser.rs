//! Pattern parser — pattern string to [`Part`] AST
//!
//! Single pass, linear, no backtracking. The scanner walks the pattern once,
//! splitting literal runs at the four structural characters `:` `{` `[` `]`
//! and recursing for optional groups. A `{…}` marker directly after a
//! parameter name is consumed into that parameter node, never as a separate
//! literal.

use crate::{Part, RouteError, MAX_OPTIONAL_DEPTH, MAX_PATTERN_LENGTH};

/// Parse a segment pattern into its ordered part sequence.
///
/// # Errors
///
/// - [`RouteError::UnbalancedBrackets`] — `[` left open at end of input.
/// - [`RouteError::UnexpectedClosingBracket`] — `]` with no open group.
/// - [`RouteError::EmptyParameterName`] — `:` not followed by a name.
/// - [`RouteError::UnterminatedTranslatedLiteral`] — `{` never closed.
/// - [`RouteError::PatternTooLong`] / [`RouteError::DepthExceeded`] —
///   hardening limits, checked before any further work.
///
/// # Example
///
/// ```
/// use ruta::{parse, Part};
///
/// let parts = parse("/archive/:year{-}").unwrap();
/// assert_eq!(
///     parts[1],
///     Part::Parameter {
///         name: "year".to_string(),
///         delimiters: Some("-".to_string()),
///     }
/// );
/// ```
pub fn parse(pattern: &str) -> Result<Vec<Part>, RouteError> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(RouteError::PatternTooLong {
            len: pattern.len(),
            max: MAX_PATTERN_LENGTH,
        });
    }

    let mut pos = 0;
    parse_sequence(pattern, &mut pos, 0)
}

/// Parse one part sequence; `depth` counts enclosing optional groups.
///
/// Returns on `]` (closing the group the caller opened) or at end of input.
fn parse_sequence(pattern: &str, pos: &mut usize, depth: usize) -> Result<Vec<Part>, RouteError> {
    let mut parts = Vec::new();

    loop {
        let rest = &pattern[*pos..];
        let split = rest
            .find(&[':', '{', '[', ']'][..])
            .unwrap_or(rest.len());
        if split > 0 {
            parts.push(Part::Literal(rest[..split].to_string()));
            *pos += split;
        }

        let rest = &pattern[*pos..];
        let Some(token) = rest.chars().next() else {
            if depth > 0 {
                return Err(RouteError::UnbalancedBrackets);
            }
            return Ok(parts);
        };

        if token == ':' {
            *pos += 1;
            parts.push(parse_parameter(pattern, pos)?);
        } else if token == '{' {
            *pos += 1;
            parts.push(parse_translated(pattern, pos, depth)?);
        } else if token == '[' {
            if depth + 1 > MAX_OPTIONAL_DEPTH {
                return Err(RouteError::DepthExceeded {
                    depth: depth + 1,
                    max: MAX_OPTIONAL_DEPTH,
                });
            }
            *pos += 1;
            parts.push(Part::Optional(parse_sequence(pattern, pos, depth + 1)?));
        } else {
            // `]` — the only remaining structural character.
            if depth == 0 {
                return Err(RouteError::UnexpectedClosingBracket);
            }
            *pos += 1;
            return Ok(parts);
        }
    }
}

/// Parse a parameter node; `pos` points just past the `:`.
///
/// Name matching is greedy: every character that can belong to a name does,
/// so `:foo-bar` names `foo-bar` rather than `foo` followed by a literal.
fn parse_parameter(pattern: &str, pos: &mut usize) -> Result<Part, RouteError> {
    let rest = &pattern[*pos..];
    let name_len = rest
        .char_indices()
        .find(|&(_, c)| !is_name_char(c))
        .map_or(rest.len(), |(i, _)| i);
    if name_len == 0 {
        return Err(RouteError::EmptyParameterName);
    }
    let name = rest[..name_len].to_string();
    *pos += name_len;

    // A non-empty `{…}` marker directly after the name declares the set of
    // characters terminating this parameter's capture. An empty or
    // unterminated marker is left for the main loop, which treats the `{`
    // as a translated-literal opener.
    let rest = &pattern[*pos..];
    let mut delimiters = None;
    if let Some(tail) = rest.strip_prefix('{') {
        if let Some(end) = tail.find('}') {
            if end > 0 {
                delimiters = Some(tail[..end].to_string());
                *pos += end + 2;
            }
        }
    }

    Ok(Part::Parameter { name, delimiters })
}

/// Parse a translated literal; `pos` points just past the `{`.
fn parse_translated(pattern: &str, pos: &mut usize, depth: usize) -> Result<Part, RouteError> {
    let rest = &pattern[*pos..];
    let close = rest.find('}');
    let bracket = rest.find(']');

    match close {
        // Inside an optional group, a `]` before the `}` would close the
        // enclosing group; the literal is then unterminated.
        Some(end) if depth == 0 || bracket.map_or(true, |b| b > end) => {
            let id = rest[..end].to_string();
            *pos += end + 1;
            Ok(Part::TranslatedLiteral(id))
        }
        _ => Err(RouteError::UnterminatedTranslatedLiteral),
    }
}

/// Characters admissible in a parameter name: anything except the
/// structural set and whitespace. Dashes are name characters.
fn is_name_char(c: char) -> bool {
    !matches!(c, '/' | ':' | '{' | '}' | '[' | ']') && !c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(text: &str) -> Part {
        Part::Literal(text.to_string())
    }

    fn param(name: &str) -> Part {
        Part::Parameter {
            name: name.to_string(),
            delimiters: None,
        }
    }

    #[test]
    fn plain_literal() {
        assert_eq!(parse("/blog").unwrap(), vec![literal("/blog")]);
    }

    #[test]
    fn literal_and_parameter() {
        assert_eq!(parse("/:foo").unwrap(), vec![literal("/"), param("foo")]);
    }

    #[test]
    fn dashes_belong_to_the_name() {
        assert_eq!(
            parse("/:foo-bar").unwrap(),
            vec![literal("/"), param("foo-bar")]
        );
    }

    #[test]
    fn parameter_terminated_by_slash() {
        assert_eq!(
            parse("/:controller/:action").unwrap(),
            vec![literal("/"), param("controller"), literal("/"), param("action")]
        );
    }

    #[test]
    fn delimiter_marker_is_part_of_the_parameter() {
        assert_eq!(
            parse("/:foo{-}/bar").unwrap(),
            vec![
                literal("/"),
                Part::Parameter {
                    name: "foo".into(),
                    delimiters: Some("-".into()),
                },
                literal("/bar"),
            ]
        );
    }

    #[test]
    fn multi_character_delimiter_marker() {
        assert_eq!(
            parse(":slug{-.}").unwrap(),
            vec![Part::Parameter {
                name: "slug".into(),
                delimiters: Some("-.".into()),
            }]
        );
    }

    #[test]
    fn translated_literal() {
        assert_eq!(
            parse("/{greeting}/:name").unwrap(),
            vec![
                literal("/"),
                Part::TranslatedLiteral("greeting".into()),
                literal("/"),
                param("name"),
            ]
        );
    }

    #[test]
    fn optional_group() {
        assert_eq!(
            parse("/:foo[/:bar]").unwrap(),
            vec![
                literal("/"),
                param("foo"),
                Part::Optional(vec![literal("/"), param("bar")]),
            ]
        );
    }

    #[test]
    fn nested_optional_groups() {
        assert_eq!(
            parse("/:a[/:b[/:c]]").unwrap(),
            vec![
                literal("/"),
                param("a"),
                Part::Optional(vec![
                    literal("/"),
                    param("b"),
                    Part::Optional(vec![literal("/"), param("c")]),
                ]),
            ]
        );
    }

    #[test]
    fn unbalanced_brackets() {
        assert_eq!(parse("/foo[/bar").unwrap_err(), RouteError::UnbalancedBrackets);
        assert_eq!(parse("[[]").unwrap_err(), RouteError::UnbalancedBrackets);
    }

    #[test]
    fn stray_closing_bracket() {
        assert_eq!(
            parse("/foo]").unwrap_err(),
            RouteError::UnexpectedClosingBracket
        );
        assert_eq!(
            parse("/foo[/bar]]").unwrap_err(),
            RouteError::UnexpectedClosingBracket
        );
    }

    #[test]
    fn empty_parameter_name() {
        assert_eq!(parse("/:").unwrap_err(), RouteError::EmptyParameterName);
        assert_eq!(parse("/::").unwrap_err(), RouteError::EmptyParameterName);
        assert_eq!(parse("/:/foo").unwrap_err(), RouteError::EmptyParameterName);
    }

    #[test]
    fn unterminated_translated_literal() {
        assert_eq!(
            parse("{").unwrap_err(),
            RouteError::UnterminatedTranslatedLiteral
        );
        assert_eq!(
            parse("/{greeting").unwrap_err(),
            RouteError::UnterminatedTranslatedLiteral
        );
    }

    #[test]
    fn translated_literal_cut_off_by_enclosing_group() {
        assert_eq!(
            parse("[/{greeting]/x}").unwrap_err(),
            RouteError::UnterminatedTranslatedLiteral
        );
    }

    #[test]
    fn closing_brace_allowed_in_toplevel_message_id() {
        // At top level there is no enclosing group a `]` could close.
        assert_eq!(
            parse("{weird]id}").unwrap(),
            vec![Part::TranslatedLiteral("weird]id".into())]
        );
    }

    #[test]
    fn unterminated_delimiter_marker_reads_as_translated_literal() {
        assert_eq!(
            parse("/:foo{ab").unwrap_err(),
            RouteError::UnterminatedTranslatedLiteral
        );
    }

    #[test]
    fn empty_optional_group() {
        assert_eq!(parse("/x[]").unwrap(), vec![
            literal("/x"),
            Part::Optional(Vec::new()),
        ]);
    }

    #[test]
    fn pattern_length_limit() {
        let long = "a".repeat(MAX_PATTERN_LENGTH + 1);
        assert!(matches!(
            parse(&long).unwrap_err(),
            RouteError::PatternTooLong { .. }
        ));
    }

    #[test]
    fn optional_depth_limit() {
        let mut deep = String::new();
        for _ in 0..=MAX_OPTIONAL_DEPTH {
            deep.push_str("[/x");
        }
        deep.push_str(&"]".repeat(MAX_OPTIONAL_DEPTH + 1));
        assert!(matches!(
            parse(&deep).unwrap_err(),
            RouteError::DepthExceeded { .. }
        ));
    }

    #[test]
    fn whitespace_terminates_a_name() {
        assert_eq!(
            parse("/:foo bar").unwrap(),
            vec![literal("/"), param("foo"), literal(" bar")]
        );
    }

    #[test]
    fn non_ascii_literals_survive() {
        assert_eq!(
            parse("/café/:item").unwrap(),
            vec![literal("/café/"), param("item")]
        );
    }
}

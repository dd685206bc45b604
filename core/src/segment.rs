//! `Segment` — the route facade
//!
//! Owns the raw pattern, static constraints and default parameter values;
//! exposes matching and assembling over compiled artifacts. Artifacts are
//! built lazily per translation-option key and published immutably behind
//! `Arc`, so concurrent matching against an already-compiled route needs no
//! synchronization beyond the cache lookup itself.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::compiler::{self, CompiledPattern, TranslationContext};
use crate::translator::{Translator, DEFAULT_TEXT_DOMAIN};
use crate::{assembler, parser, part, percent, Part, RouteError};

// ═══════════════════════════════════════════════════════════════════════════════
// Options
// ═══════════════════════════════════════════════════════════════════════════════

/// Per-call options for [`Segment::match_path`].
///
/// A translator is required only when the pattern contains translated
/// literals; matching such a pattern without one is a configuration error,
/// not a no-match.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions<'a> {
    /// Resolves translated literals. Never stored by the route.
    pub translator: Option<&'a dyn Translator>,
    /// Text domain for catalog lookup; defaults to `"default"`.
    pub text_domain: Option<&'a str>,
    /// Locale for catalog lookup; `None` lets the translator decide.
    pub locale: Option<&'a str>,
}

/// Per-call options for [`Segment::assemble`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AssembleOptions<'a> {
    /// Resolves translated literals. Never stored by the route.
    pub translator: Option<&'a dyn Translator>,
    /// Text domain for catalog lookup; defaults to `"default"`.
    pub text_domain: Option<&'a str>,
    /// Locale for catalog lookup; `None` lets the translator decide.
    pub locale: Option<&'a str>,
    /// Force optional groups to be emitted even when every contained value
    /// equals its default, so a nested child route's path can be appended
    /// after this route's text.
    pub has_child: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// RouteMatch
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a successful match: consumed length plus extracted, decoded
/// parameter values (defaults included). Owned by the caller; holds no
/// reference back to the route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    params: HashMap<String, String>,
    matched_length: usize,
}

impl RouteMatch {
    fn new(params: HashMap<String, String>, matched_length: usize) -> Self {
        Self {
            params,
            matched_length,
        }
    }

    /// All extracted parameters, including ones filled purely from defaults.
    #[must_use]
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Look up a single parameter value.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Number of subject bytes consumed, counted from the match offset.
    #[must_use]
    pub fn matched_length(&self) -> usize {
        self.matched_length
    }

    /// Consume the match, yielding the parameter map.
    #[must_use]
    pub fn into_params(self) -> HashMap<String, String> {
        self.params
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Segment
// ═══════════════════════════════════════════════════════════════════════════════

/// Cache key: the translation options that affect literal resolution.
/// Untranslated patterns collapse onto a single key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TranslationKey {
    text_domain: Option<String>,
    locale: Option<String>,
}

impl TranslationKey {
    const UNTRANSLATED: Self = Self {
        text_domain: None,
        locale: None,
    };
}

/// A segment route: a path pattern with per-parameter constraints and
/// default values.
///
/// Immutable after construction apart from the compiled-artifact cache,
/// which only ever publishes new immutable artifacts.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use ruta::prelude::*;
///
/// let route = Segment::with_options(
///     "/album/:id[/:page]",
///     HashMap::from([("id".to_string(), r"\d+".to_string())]),
///     HashMap::from([("page".to_string(), "1".to_string())]),
/// )
/// .unwrap();
///
/// let m = route
///     .match_path("/album/42", None, &MatchOptions::default())
///     .unwrap()
///     .expect("matches");
/// assert_eq!(m.param("id"), Some("42"));
/// assert_eq!(m.param("page"), Some("1")); // elided group, default applied
/// ```
pub struct Segment {
    pattern: String,
    parts: Vec<Part>,
    constraints: HashMap<String, String>,
    defaults: HashMap<String, String>,
    has_translated: bool,
    cache: RwLock<HashMap<TranslationKey, Arc<CompiledPattern>>>,
}

impl Segment {
    /// Create a route from a pattern with no constraints or defaults.
    ///
    /// # Errors
    ///
    /// Any parse error from [`parse`](crate::parse).
    pub fn new(pattern: impl Into<String>) -> Result<Self, RouteError> {
        Self::with_options(pattern, HashMap::new(), HashMap::new())
    }

    /// Create a route with per-parameter constraints and defaults.
    ///
    /// The pattern is parsed eagerly and every constraint fragment is
    /// validated to compile on its own, so malformed routes fail here
    /// rather than on first use.
    ///
    /// # Errors
    ///
    /// Parse errors, or [`RouteError::InvalidPattern`] for a constraint
    /// fragment that is not a valid regex.
    pub fn with_options(
        pattern: impl Into<String>,
        constraints: HashMap<String, String>,
        defaults: HashMap<String, String>,
    ) -> Result<Self, RouteError> {
        let pattern = pattern.into();
        let parts = parser::parse(&pattern)?;

        for constraint in constraints.values() {
            regex::Regex::new(&format!("(?:{constraint})")).map_err(|e| {
                RouteError::InvalidPattern {
                    pattern: constraint.clone(),
                    source: e.to_string(),
                }
            })?;
        }

        let has_translated = part::contains_translated(&parts);

        Ok(Self {
            pattern,
            parts,
            constraints,
            defaults,
            has_translated,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// The raw pattern string this route was built from.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The parsed part sequence.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Per-parameter regex constraints.
    #[must_use]
    pub fn constraints(&self) -> &HashMap<String, String> {
        &self.constraints
    }

    /// Default parameter values.
    #[must_use]
    pub fn defaults(&self) -> &HashMap<String, String> {
        &self.defaults
    }

    /// Parameter names in declaration order.
    #[must_use]
    pub fn parameter_names(&self) -> Vec<&str> {
        part::parameter_names(&self.parts)
    }

    /// `true` if matching or assembling this route requires a translator.
    #[must_use]
    pub fn needs_translator(&self) -> bool {
        self.has_translated
    }

    /// Match a subject path against this route.
    ///
    /// With `offset: Some(n)` the compiled pattern must match starting
    /// exactly at byte `n`; trailing subject content may remain (prefix
    /// matching for nested routing). With `offset: None` the entire subject
    /// must be consumed.
    ///
    /// Returns `Ok(None)` for an ordinary no-match. An offset past the end
    /// of the subject, or off a character boundary, is a no-match as well.
    ///
    /// # Errors
    ///
    /// [`RouteError::NoTranslator`] when the pattern contains translated
    /// literals and `options` carries no translator — a caller
    /// configuration error, deliberately distinct from `Ok(None)`.
    pub fn match_path(
        &self,
        path: &str,
        offset: Option<usize>,
        options: &MatchOptions<'_>,
    ) -> Result<Option<RouteMatch>, RouteError> {
        let artifact = self.artifact(options.translator, options.text_domain, options.locale)?;

        let (subject, regex) = match offset {
            Some(n) => match path.get(n..) {
                Some(rest) => (rest, artifact.partial()),
                None => return Ok(None),
            },
            None => (path, artifact.full()),
        };

        let Some(caps) = regex.captures(subject) else {
            return Ok(None);
        };
        let matched_length = caps.get(0).map_or(0, |m| m.end());

        // Defaults underneath, captures on top; empty captures count as
        // absent so defaults shine through.
        let mut params = self.defaults.clone();
        for (group, name) in artifact.slots() {
            if let Some(capture) = caps.name(group) {
                if !capture.as_str().is_empty() {
                    params.insert(name.clone(), percent::decode(capture.as_str()));
                }
            }
        }

        Ok(Some(RouteMatch::new(params, matched_length)))
    }

    /// Assemble a concrete path from parameter values.
    ///
    /// Explicit values take precedence over declared defaults. Optional
    /// groups are elided when every contained parameter equals its default,
    /// unless [`AssembleOptions::has_child`] forces emission.
    ///
    /// # Errors
    ///
    /// [`RouteError::MissingParameter`] for a required parameter with no
    /// value and no default; [`RouteError::NoTranslator`] when translated
    /// literals need resolving and no translator was supplied.
    pub fn assemble(
        &self,
        params: &HashMap<String, String>,
        options: &AssembleOptions<'_>,
    ) -> Result<String, RouteError> {
        let artifact = self.artifact(options.translator, options.text_domain, options.locale)?;

        let mut merged = self.defaults.clone();
        for (name, value) in params {
            merged.insert(name.clone(), value.clone());
        }

        assembler::assemble(artifact.ops(), &merged, &self.defaults, options.has_child)
    }

    /// Fetch or build the compiled artifact for the given translation
    /// options.
    ///
    /// Artifacts are immutable once published; if two callers race on the
    /// same key, the first published artifact wins and the other build is
    /// dropped.
    fn artifact(
        &self,
        translator: Option<&dyn Translator>,
        text_domain: Option<&str>,
        locale: Option<&str>,
    ) -> Result<Arc<CompiledPattern>, RouteError> {
        let (key, translation) = if self.has_translated {
            let Some(translator) = translator else {
                return Err(RouteError::NoTranslator);
            };
            let text_domain = text_domain.unwrap_or(DEFAULT_TEXT_DOMAIN);
            (
                TranslationKey {
                    text_domain: Some(text_domain.to_string()),
                    locale: locale.map(str::to_string),
                },
                Some(TranslationContext {
                    translator,
                    text_domain,
                    locale,
                }),
            )
        } else {
            (TranslationKey::UNTRANSLATED, None)
        };

        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(hit));
        }

        let built = Arc::new(compiler::compile(
            &self.parts,
            &self.constraints,
            translation.as_ref(),
        )?);

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(key).or_insert(built)))
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("Segment")
            .field("pattern", &self.pattern)
            .field("constraints", &self.constraints.len())
            .field("defaults", &self.defaults.len())
            .field("cached_artifacts", &cached)
            .finish()
    }
}

impl Clone for Segment {
    fn clone(&self) -> Self {
        let cache = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        Self {
            pattern: self.pattern.clone(),
            parts: self.parts.clone(),
            constraints: self.constraints.clone(),
            defaults: self.defaults.clone(),
            has_translated: self.has_translated,
            cache: RwLock::new(cache),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticTranslator;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn full_match_extracts_and_counts() {
        let route = Segment::new("/:foo").unwrap();
        let m = route
            .match_path("/bar", None, &MatchOptions::default())
            .unwrap()
            .expect("matches");
        assert_eq!(m.param("foo"), Some("bar"));
        assert_eq!(m.matched_length(), 4);
    }

    #[test]
    fn elided_group_takes_defaults() {
        let route =
            Segment::with_options("/:foo[/:bar]", HashMap::new(), map(&[("bar", "baz")])).unwrap();
        let m = route
            .match_path("/bar", None, &MatchOptions::default())
            .unwrap()
            .expect("matches");
        assert_eq!(m.param("foo"), Some("bar"));
        assert_eq!(m.param("bar"), Some("baz"));
    }

    #[test]
    fn elided_group_without_default_leaves_parameter_unset() {
        let route = Segment::new("/:foo[/:bar]").unwrap();
        let m = route
            .match_path("/only", None, &MatchOptions::default())
            .unwrap()
            .expect("matches");
        assert_eq!(m.param("bar"), None);
    }

    #[test]
    fn constraint_beats_custom_delimiter() {
        let route = Segment::with_options(
            "/:foo{-}/bar",
            map(&[("foo", "[^/]+")]),
            HashMap::new(),
        )
        .unwrap();
        let m = route
            .match_path("/foo-bar/bar", None, &MatchOptions::default())
            .unwrap()
            .expect("matches");
        assert_eq!(m.param("foo"), Some("foo-bar"));
    }

    #[test]
    fn captured_values_are_percent_decoded() {
        let route = Segment::new("/:foo").unwrap();
        let m = route
            .match_path("/foo%20bar", None, &MatchOptions::default())
            .unwrap()
            .expect("matches");
        assert_eq!(m.param("foo"), Some("foo bar"));
    }

    #[test]
    fn constraint_rejection_is_a_plain_no_match() {
        let route =
            Segment::with_options("/:id", map(&[("id", r"\d+")]), HashMap::new()).unwrap();
        assert!(route
            .match_path("/abc", None, &MatchOptions::default())
            .unwrap()
            .is_none());
        assert!(route
            .match_path("/123", None, &MatchOptions::default())
            .unwrap()
            .is_some());
    }

    #[test]
    fn full_mode_rejects_trailing_subject() {
        let route = Segment::new("/:foo").unwrap();
        assert!(route
            .match_path("/bar/baz", None, &MatchOptions::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn offset_mode_permits_trailing_subject() {
        let route = Segment::new("/bar").unwrap();
        let m = route
            .match_path("/foo/bar/rest", Some(4), &MatchOptions::default())
            .unwrap()
            .expect("matches at offset");
        assert_eq!(m.matched_length(), 4);
    }

    #[test]
    fn offset_mode_requires_match_at_exactly_that_offset() {
        let route = Segment::new("/bar").unwrap();
        assert!(route
            .match_path("/foo/bar", Some(0), &MatchOptions::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn offset_past_the_end_is_a_no_match() {
        let route = Segment::new("/bar").unwrap();
        assert!(route
            .match_path("/bar", Some(10), &MatchOptions::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn translated_pattern_without_translator_is_fatal() {
        let route = Segment::new("/{greeting}").unwrap();
        assert!(route.needs_translator());

        let err = route
            .match_path("/hello", None, &MatchOptions::default())
            .unwrap_err();
        assert_eq!(err, RouteError::NoTranslator);

        let err = route
            .assemble(&HashMap::new(), &AssembleOptions::default())
            .unwrap_err();
        assert_eq!(err, RouteError::NoTranslator);
    }

    #[test]
    fn translated_pattern_matches_per_locale() {
        let mut translator = StaticTranslator::new();
        translator.insert("default", Some("en"), "greeting", "hello");
        translator.insert("default", Some("de"), "greeting", "hallo");

        let route = Segment::new("/{greeting}").unwrap();

        let en = MatchOptions {
            translator: Some(&translator),
            locale: Some("en"),
            ..Default::default()
        };
        let de = MatchOptions {
            translator: Some(&translator),
            locale: Some("de"),
            ..Default::default()
        };

        assert!(route.match_path("/hello", None, &en).unwrap().is_some());
        assert!(route.match_path("/hallo", None, &en).unwrap().is_none());
        assert!(route.match_path("/hallo", None, &de).unwrap().is_some());
    }

    #[test]
    fn artifacts_are_cached_per_translation_key() {
        let mut translator = StaticTranslator::new();
        translator.insert("default", Some("en"), "greeting", "hello");
        translator.insert("default", Some("de"), "greeting", "hallo");

        let route = Segment::new("/{greeting}").unwrap();
        let en = MatchOptions {
            translator: Some(&translator),
            locale: Some("en"),
            ..Default::default()
        };
        let de = MatchOptions {
            translator: Some(&translator),
            locale: Some("de"),
            ..Default::default()
        };

        route.match_path("/hello", None, &en).unwrap();
        route.match_path("/hello", None, &en).unwrap();
        route.match_path("/hallo", None, &de).unwrap();

        let cached = route
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        assert_eq!(cached, 2);
    }

    #[test]
    fn untranslated_pattern_uses_a_single_cache_slot() {
        let route = Segment::new("/:foo").unwrap();
        route
            .match_path("/a", None, &MatchOptions::default())
            .unwrap();
        route
            .match_path(
                "/b",
                None,
                &MatchOptions {
                    locale: Some("de"),
                    ..Default::default()
                },
            )
            .unwrap();

        let cached = route
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        assert_eq!(cached, 1);
    }

    #[test]
    fn assemble_merges_explicit_values_over_defaults() {
        let route = Segment::with_options(
            "/album/:id[/:page]",
            HashMap::new(),
            map(&[("page", "1")]),
        )
        .unwrap();

        let path = route
            .assemble(&map(&[("id", "7")]), &AssembleOptions::default())
            .unwrap();
        assert_eq!(path, "/album/7");

        let path = route
            .assemble(
                &map(&[("id", "7"), ("page", "3")]),
                &AssembleOptions::default(),
            )
            .unwrap();
        assert_eq!(path, "/album/7/3");
    }

    #[test]
    fn assemble_missing_required_parameter_is_fatal() {
        let route = Segment::new("/:foo").unwrap();
        let err = route
            .assemble(&HashMap::new(), &AssembleOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::MissingParameter {
                name: "foo".to_string()
            }
        );
    }

    #[test]
    fn assemble_translated_literal() {
        let mut translator = StaticTranslator::new();
        translator.insert("default", Some("de"), "news", "nachrichten");

        let route = Segment::new("/{news}/:id").unwrap();
        let path = route
            .assemble(
                &map(&[("id", "1")]),
                &AssembleOptions {
                    translator: Some(&translator),
                    locale: Some("de"),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(path, "/nachrichten/1");
    }

    #[test]
    fn bad_constraint_fails_at_construction() {
        let err =
            Segment::with_options("/:id", map(&[("id", "[unclosed")]), HashMap::new())
                .unwrap_err();
        assert!(matches!(err, RouteError::InvalidPattern { .. }));
    }

    #[test]
    fn parse_errors_surface_at_construction() {
        assert_eq!(
            Segment::new("{").unwrap_err(),
            RouteError::UnterminatedTranslatedLiteral
        );
        assert_eq!(
            Segment::new("/foo[").unwrap_err(),
            RouteError::UnbalancedBrackets
        );
    }

    #[test]
    fn segment_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Segment>();
    }

    #[test]
    fn clone_carries_the_cache() {
        let route = Segment::new("/:foo").unwrap();
        route
            .match_path("/a", None, &MatchOptions::default())
            .unwrap();

        let cloned = route.clone();
        let cached = cloned
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        assert_eq!(cached, 1);
    }
}

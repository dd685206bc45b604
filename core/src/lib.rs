//! ruta - segment route engine
//!
//! A small but complete path-pattern language: patterns describing URL path
//! segments are parsed into an AST, compiled into a linear-time matcher, and
//! can be run in reverse to assemble a concrete path from parameter values.
//!
//! # Architecture
//!
//! The pipeline, leaves first:
//!
//! - [`parse`] — tokenizes a pattern string into an ordered [`Part`] AST,
//!   validating bracket and marker balance.
//! - `compiler` (internal) — walks the AST once per translation-option set
//!   and produces a compiled artifact: an anchored regex with one named
//!   capture slot per parameter, plus a parallel assembler instruction tree.
//! - [`Segment`] — the route facade. Owns the pattern, constraints and
//!   defaults; exposes [`match_path`](Segment::match_path) and
//!   [`assemble`](Segment::assemble); caches compiled artifacts keyed by the
//!   translation options that affect literal resolution.
//!
//! # Pattern syntax
//!
//! | Fragment | Meaning |
//! |----------|---------|
//! | `/blog` | literal text, matched verbatim |
//! | `:id` | named parameter, captures up to the next `/` |
//! | `:id{-.}` | named parameter with custom terminating characters |
//! | `[/:page]` | optional group, may nest |
//! | `{greeting}` | translated literal, resolved through a [`Translator`] |
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use ruta::prelude::*;
//!
//! let route = Segment::new("/users/:id").unwrap();
//!
//! // Match a subject path (no offset = the whole path must be consumed).
//! let m = route
//!     .match_path("/users/42", None, &MatchOptions::default())
//!     .unwrap()
//!     .expect("path matches");
//! assert_eq!(m.param("id"), Some("42"));
//! assert_eq!(m.matched_length(), 9);
//!
//! // Run the pattern in reverse.
//! let params = HashMap::from([("id".to_string(), "7".to_string())]);
//! let path = route.assemble(&params, &AssembleOptions::default()).unwrap();
//! assert_eq!(path, "/users/7");
//! ```
//!
//! # Scope
//!
//! The engine matches and assembles a single route. Selecting between
//! candidate routes, loading translation catalogs, and HTTP method or host
//! matching belong to the surrounding system.

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod assembler;
mod compiler;
mod parser;
mod part;
mod percent;
mod segment;
mod translator;

#[cfg(feature = "config")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use parser::parse;
pub use part::Part;
pub use segment::{AssembleOptions, MatchOptions, RouteMatch, Segment};
pub use translator::{StaticTranslator, Translator};

#[cfg(feature = "config")]
pub use config::SegmentConfig;

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use ruta::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AssembleOptions, MatchOptions, Part, RouteError, RouteMatch, Segment, StaticTranslator,
        Translator,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed pattern length, in bytes.
///
/// Longer patterns are rejected at parse time via
/// [`RouteError::PatternTooLong`], before any regex work happens.
pub const MAX_PATTERN_LENGTH: usize = 8192;

/// Maximum allowed nesting depth for optional groups.
///
/// The parser, compiler and assembler all recurse over the group structure,
/// so depth is bounded at parse time via [`RouteError::DepthExceeded`].
pub const MAX_OPTIONAL_DEPTH: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from route construction, matching and assembling.
///
/// Parse and configuration errors are caught at construction or entry-point
/// time. A matching attempt that simply does not satisfy the pattern is NOT
/// an error — [`Segment::match_path`] reports it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// An optional group opened with `[` was never closed.
    UnbalancedBrackets,
    /// A `]` appeared with no optional group open.
    UnexpectedClosingBracket,
    /// A `:` was not followed by a valid parameter name.
    EmptyParameterName,
    /// A translated literal opened with `{` was never closed with `}`.
    UnterminatedTranslatedLiteral,
    /// The pattern exceeds [`MAX_PATTERN_LENGTH`].
    PatternTooLong {
        /// Actual length of the pattern, in bytes.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },
    /// Optional group nesting exceeds [`MAX_OPTIONAL_DEPTH`].
    DepthExceeded {
        /// Actual nesting depth.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
    /// A constraint fragment or the assembled route regex failed to compile.
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying error message.
        source: String,
    },
    /// Route configuration is missing the required `route` key.
    MissingRouteOption,
    /// Route configuration could not be deserialized.
    InvalidConfig {
        /// The underlying error message.
        source: String,
    },
    /// The pattern contains translated literals but no translator was
    /// supplied in the call options.
    NoTranslator,
    /// A required parameter had no value and no default at assemble time.
    MissingParameter {
        /// Name of the offending parameter.
        name: String,
    },
}

impl std::fmt::Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnbalancedBrackets => write!(f, "Found unbalanced brackets"),
            Self::UnexpectedClosingBracket => {
                write!(f, "Found closing bracket without matching opening bracket")
            }
            Self::EmptyParameterName => write!(f, "Found empty parameter name"),
            Self::UnterminatedTranslatedLiteral => {
                write!(f, "Translated literal missing closing bracket")
            }
            Self::PatternTooLong { len, max } => {
                write!(f, "pattern length is {len}, but maximum allowed is {max}")
            }
            Self::DepthExceeded { depth, max } => {
                write!(
                    f,
                    "optional group nesting depth is {depth}, but maximum allowed is {max}"
                )
            }
            Self::InvalidPattern { pattern, source } => {
                write!(f, "invalid pattern \"{pattern}\": {source}")
            }
            Self::MissingRouteOption => write!(f, "missing required \"route\" option"),
            Self::InvalidConfig { source } => write!(f, "invalid route configuration: {source}"),
            Self::NoTranslator => write!(f, "No translator provided"),
            Self::MissingParameter { name } => write!(f, "Missing parameter \"{name}\""),
        }
    }
}

impl std::error::Error for RouteError {}

//! Config types for factory-driven route construction.
//!
//! These types mirror the runtime [`Segment`] but are serde-deserializable,
//! enabling config-driven construction from JSON or YAML maps.
//!
//! | Config key | Runtime field | Required |
//! |------------|---------------|----------|
//! | `route` | pattern string | yes |
//! | `constraints` | parameter name → regex fragment | no |
//! | `defaults` | parameter name → fallback value | no |

use std::collections::HashMap;

use serde::Deserialize;

use crate::{RouteError, Segment};

/// Configuration for a [`Segment`] route.
///
/// `route` is modeled as an `Option` so that its absence surfaces as
/// [`RouteError::MissingRouteOption`] — a configuration error reported
/// before any parsing is attempted — rather than as a deserializer error.
///
/// # Example
///
/// ```
/// use ruta::{Segment, SegmentConfig};
///
/// let json = serde_json::json!({
///     "route": "/users/:id",
///     "constraints": { "id": "\\d+" },
///     "defaults": {}
/// });
///
/// let config: SegmentConfig = serde_json::from_value(json).unwrap();
/// let route = Segment::from_config(config).unwrap();
/// assert_eq!(route.pattern(), "/users/:id");
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentConfig {
    /// The pattern string. Required; checked by the factory.
    #[serde(default)]
    pub route: Option<String>,

    /// Per-parameter regex constraints.
    #[serde(default)]
    pub constraints: HashMap<String, String>,

    /// Default parameter values.
    #[serde(default)]
    pub defaults: HashMap<String, String>,
}

impl Segment {
    /// Build a route from deserialized configuration.
    ///
    /// # Errors
    ///
    /// [`RouteError::MissingRouteOption`] when no `route` key was present;
    /// otherwise any [`Segment::with_options`] error.
    pub fn from_config(config: SegmentConfig) -> Result<Self, RouteError> {
        let Some(route) = config.route else {
            return Err(RouteError::MissingRouteOption);
        };
        Self::with_options(route, config.constraints, config.defaults)
    }

    /// Build a route from an untyped configuration value.
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidConfig`] when the value does not deserialize
    /// into a [`SegmentConfig`]; otherwise as [`from_config`](Self::from_config).
    pub fn from_value(value: &serde_json::Value) -> Result<Self, RouteError> {
        let config: SegmentConfig =
            serde_json::from_value(value.clone()).map_err(|e| RouteError::InvalidConfig {
                source: e.to_string(),
            })?;
        Self::from_config(config)
    }
}

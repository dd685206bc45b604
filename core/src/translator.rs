//! `Translator` — message-catalog collaborator
//!
//! Patterns may contain translated literals (`{message-id}`) that resolve
//! through a catalog rather than matching verbatim. The engine never loads
//! or stores catalogs; a translator is supplied per call through the match
//! or assemble options and consulted only while compiling the artifact for
//! the requested `(text domain, locale)` pair.

use std::collections::HashMap;
use std::fmt::Debug;

/// Text domain used when the caller supplies none.
pub(crate) const DEFAULT_TEXT_DOMAIN: &str = "default";

/// Resolves message ids to translated text.
///
/// Returning `None` means "no catalog entry" — the engine then falls back
/// to the raw message id. A missing locale is passed through as `None`;
/// how to default it is the translator's decision.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; compiled artifacts are shared
/// across threads and may be built from any of them.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Translator`",
    label = "this type cannot resolve translated literals",
    note = "implement `translate(&self, message_id, text_domain, locale) -> Option<String>`, or use the in-memory `StaticTranslator`"
)]
pub trait Translator: Send + Sync + Debug {
    /// Resolve `message_id` within `text_domain` for `locale`.
    ///
    /// Returns `None` when the catalog has no entry.
    fn translate(&self, message_id: &str, text_domain: &str, locale: Option<&str>)
        -> Option<String>;
}

/// In-memory translator backed by `(text domain, locale)` catalogs.
///
/// Lookup tries the exact `(domain, locale)` catalog first, then the
/// locale-less catalog for the same domain. Intended for tests and the CLI;
/// production catalogs come from the host system.
///
/// # Example
///
/// ```
/// use ruta::{StaticTranslator, Translator};
///
/// let mut translator = StaticTranslator::new();
/// translator.insert("default", None, "greeting", "hello");
/// translator.insert("default", Some("de"), "greeting", "hallo");
///
/// assert_eq!(
///     translator.translate("greeting", "default", Some("de")),
///     Some("hallo".to_string())
/// );
/// assert_eq!(
///     translator.translate("greeting", "default", Some("fr")),
///     Some("hello".to_string()) // falls back to the locale-less catalog
/// );
/// assert_eq!(translator.translate("missing", "default", None), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticTranslator {
    catalogs: HashMap<(String, Option<String>), HashMap<String, String>>,
}

impl StaticTranslator {
    /// Create an empty translator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a message into the `(text_domain, locale)` catalog.
    pub fn insert(
        &mut self,
        text_domain: &str,
        locale: Option<&str>,
        message_id: &str,
        text: &str,
    ) {
        self.catalogs
            .entry((text_domain.to_string(), locale.map(str::to_string)))
            .or_default()
            .insert(message_id.to_string(), text.to_string());
    }
}

impl Translator for StaticTranslator {
    fn translate(
        &self,
        message_id: &str,
        text_domain: &str,
        locale: Option<&str>,
    ) -> Option<String> {
        if let Some(locale) = locale {
            let key = (text_domain.to_string(), Some(locale.to_string()));
            if let Some(text) = self.catalogs.get(&key).and_then(|c| c.get(message_id)) {
                return Some(text.clone());
            }
        }

        let key = (text_domain.to_string(), None);
        self.catalogs
            .get(&key)
            .and_then(|c| c.get(message_id))
            .cloned()
    }
}

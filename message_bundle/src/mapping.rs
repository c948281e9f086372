//! Resolved template mappings and their parent chains.

use crate::locale::Locale;
use std::collections::HashMap;
use std::sync::Arc;

/// A resolved key-to-template mapping for one locale, linked to the mapping
/// for the next less specific locale.
///
/// Mappings are immutable once published and are shared behind [`Arc`], so
/// several locales may alias the same mapping when a locale has no distinct
/// resource of its own. Parent chains are built root-first, which makes them
/// acyclic by construction; their depth is bounded by the locale fallback
/// chain.
#[derive(Debug)]
pub struct TemplateMapping {
    locale: Locale,
    entries: HashMap<String, String>,
    parent: Option<Arc<TemplateMapping>>,
}

impl TemplateMapping {
    pub(crate) const fn new(
        locale: Locale,
        entries: HashMap<String, String>,
        parent: Option<Arc<Self>>,
    ) -> Self {
        Self {
            locale,
            entries,
            parent,
        }
    }

    /// The locale this mapping was loaded for.
    #[must_use]
    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The mapping for the next less specific locale, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<&Arc<Self>> {
        self.parent.as_ref()
    }

    /// Looks up a template, walking the parent chain on a local miss.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .or_else(|| self.parent.as_deref().and_then(|parent| parent.get(key)))
    }

    /// Looks up a template in this mapping only, ignoring parents.
    #[must_use]
    pub fn get_local(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

//! Locale fallback resolution and the per-namespace bundle cache.
//!
//! This is the heart of the crate: [`BundleResolver`] owns the two strategy
//! seams and a per-namespace, per-locale cache of resolved
//! [`TemplateMapping`]s. The cache guarantees that a mapping for a given
//! `(namespace, locale)` pair is loaded at most once, no matter how many
//! threads ask for it concurrently.

use crate::error::{BundleError, BundleResult};
use crate::locale::Locale;
use crate::localizable::{Localizable, Renderable};
use crate::mapping::TemplateMapping;
use crate::namespace::Namespace;
use crate::pattern;
use crate::properties::{self, Entries};
use crate::provider::{LocaleProvider, ResourceProvider, SearchPathProvider, SystemLocaleProvider};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

#[cfg(test)]
mod tests;

/// Resolves template mappings with locale fallback and caches the result.
///
/// A resolver is an explicit, injectable object; [`BundleResolver::global`]
/// provides a process-wide default instance for ergonomic top-level call
/// sites. Resolution walks the fallback chain of the requested locale
/// (variant, then country, then language, then root), loads the first
/// backing resource it finds, and links it to the mapping of the next less
/// specific locale so key lookups can fall through.
///
/// # Examples
///
/// ```rust,no_run
/// use message_bundle::{BundleResolver, Locale, Namespace, Renderable};
///
/// # fn run() -> message_bundle::BundleResult<()> {
/// let resolver = BundleResolver::new();
/// let ns = Namespace::new("com.acme.Messages", "i18n");
/// let text = resolver.format_at(
///     &ns,
///     &Locale::new("de").with_country("DE"),
///     "files.deleted",
///     &[Renderable::Int(3)],
/// )?;
/// println!("{text}");
/// # Ok(())
/// # }
/// ```
pub struct BundleResolver {
    locale_provider: RwLock<Arc<dyn LocaleProvider>>,
    resource_provider: RwLock<Arc<dyn ResourceProvider>>,
    namespaces: RwLock<HashMap<Namespace, Arc<NamespaceCache>>>,
}

/// Per-namespace cache state.
///
/// `bundles` supports concurrent reads; `load_lock` serialises the
/// load-and-populate path so unrelated namespaces never contend.
#[derive(Default)]
struct NamespaceCache {
    bundles: RwLock<HashMap<Locale, Arc<TemplateMapping>>>,
    load_lock: Mutex<()>,
}

static GLOBAL: OnceLock<BundleResolver> = OnceLock::new();

impl Default for BundleResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BundleResolver {
    /// Creates a resolver with the default strategies: the operating system
    /// locale and the namespace search path on the filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::with_providers(
            Arc::new(SystemLocaleProvider::new()),
            Arc::new(SearchPathProvider::new()),
        )
    }

    /// Creates a resolver with explicit strategies.
    #[must_use]
    pub fn with_providers(
        locale_provider: Arc<dyn LocaleProvider>,
        resource_provider: Arc<dyn ResourceProvider>,
    ) -> Self {
        Self {
            locale_provider: RwLock::new(locale_provider),
            resource_provider: RwLock::new(resource_provider),
            namespaces: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide default resolver.
    ///
    /// Created on first use with the default strategies. [`Localizable`]
    /// rendering and other ambient-locale call sites go through this
    /// instance unless given an explicit resolver.
    ///
    /// [`Localizable`]: crate::Localizable
    #[must_use]
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::new)
    }

    /// Replaces the locale strategy.
    ///
    /// The swap takes effect for all subsequent ambient-locale lookups;
    /// renders already in flight may still observe the previous strategy.
    pub fn set_locale_provider(&self, provider: Arc<dyn LocaleProvider>) {
        *self.locale_provider.write() = provider;
    }

    /// The currently installed locale strategy.
    #[must_use]
    pub fn locale_provider(&self) -> Arc<dyn LocaleProvider> {
        Arc::clone(&self.locale_provider.read())
    }

    /// Replaces the resource strategy.
    ///
    /// Already-cached mappings are not invalidated; call
    /// [`BundleResolver::clear`] afterwards to re-resolve against the new
    /// strategy. Swapping concurrently with lookups is best-effort: an
    /// in-flight resolution may finish against the previous strategy.
    pub fn set_resource_provider(&self, provider: Arc<dyn ResourceProvider>) {
        *self.resource_provider.write() = provider;
    }

    /// The currently installed resource strategy.
    #[must_use]
    pub fn resource_provider(&self) -> Arc<dyn ResourceProvider> {
        Arc::clone(&self.resource_provider.read())
    }

    /// The ambient locale reported by the installed locale strategy.
    #[must_use]
    pub fn current_locale(&self) -> Locale {
        self.locale_provider.read().current()
    }

    /// Resolves the namespace's template mapping at the given locale.
    ///
    /// The fast path is a concurrent map read. On a miss the per-namespace
    /// load lock is taken, the cache is re-checked, and the resource chain
    /// is loaded root-first; once this returns for a given pair, every
    /// subsequent call observes the same mapping object. A locale with no
    /// distinct resource is memoized as an alias of its fallback's mapping,
    /// so the miss is not re-probed on later calls.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::ResourceNotFound`] when the fallback chain is
    /// exhausted at root and root itself has no backing resource, or
    /// [`BundleError::Read`] when a located resource cannot be read or
    /// parsed. A malformed resource fails hard; it does not fall back to
    /// the next less specific locale.
    pub fn resolve(
        &self,
        namespace: &Namespace,
        locale: &Locale,
    ) -> BundleResult<Arc<TemplateMapping>> {
        let cache = self.namespace_cache(namespace);
        if let Some(found) = cache.bundles.read().get(locale) {
            return Ok(Arc::clone(found));
        }
        let _loading = cache.load_lock.lock();
        self.load_locked(&cache, namespace, locale)
    }

    /// Formats the keyed template at the ambient locale.
    ///
    /// # Errors
    ///
    /// As [`BundleResolver::format_at`].
    pub fn format(
        &self,
        namespace: &Namespace,
        key: &str,
        args: &[Renderable],
    ) -> BundleResult<String> {
        let locale = self.current_locale();
        self.format_at(namespace, &locale, key, args)
    }

    /// Formats the keyed template at an explicit locale.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::MissingKey`] when the key is absent from the
    /// resolved mapping and every parent, [`BundleError::Pattern`] when the
    /// template cannot format the arguments, and any resolution failure
    /// from [`BundleResolver::resolve`].
    pub fn format_at(
        &self,
        namespace: &Namespace,
        locale: &Locale,
        key: &str,
        args: &[Renderable],
    ) -> BundleResult<String> {
        let mapping = self.resolve(namespace, locale)?;
        let template = mapping.get(key).ok_or_else(|| BundleError::MissingKey {
            namespace: namespace.name().to_owned(),
            key: key.to_owned(),
        })?;
        pattern::format_message(template, args).map_err(|err| BundleError::Pattern {
            key: key.to_owned(),
            detail: err.detail,
        })
    }

    /// Creates a deferred message for the namespace and key.
    ///
    /// Equivalent to [`Localizable::new`]: the arguments are captured now,
    /// no lookup or I/O happens, and the locale is chosen only when the
    /// message is rendered.
    #[must_use]
    pub fn localizable(
        &self,
        namespace: &Namespace,
        key: impl Into<String>,
        args: impl IntoIterator<Item = Renderable>,
    ) -> Localizable {
        Localizable::new(namespace.clone(), key, args)
    }

    /// Drops every cached mapping for every namespace.
    ///
    /// The next resolution reloads from the resource strategy, which makes
    /// this the hook for observing changed resource files or a swapped
    /// provider.
    pub fn clear(&self) {
        self.namespaces.write().clear();
        tracing::debug!("cleared message bundle cache");
    }

    fn namespace_cache(&self, namespace: &Namespace) -> Arc<NamespaceCache> {
        if let Some(found) = self.namespaces.read().get(namespace) {
            return Arc::clone(found);
        }
        let mut map = self.namespaces.write();
        Arc::clone(map.entry(namespace.clone()).or_default())
    }

    /// Loads a mapping with the namespace load lock held.
    ///
    /// Recurses on the fallback locale before publishing, so parents exist
    /// by the time a child mapping becomes visible. Recursion depth is
    /// bounded by the locale fallback chain.
    fn load_locked(
        &self,
        cache: &NamespaceCache,
        namespace: &Namespace,
        locale: &Locale,
    ) -> BundleResult<Arc<TemplateMapping>> {
        if let Some(found) = cache.bundles.read().get(locale) {
            return Ok(Arc::clone(found));
        }
        let fallback = locale.fallback();
        let suffix = locale.to_string();
        let stem = if suffix.is_empty() {
            namespace.base_name().to_owned()
        } else {
            format!("{}_{suffix}", namespace.base_name())
        };
        let mapping = if let Some((resource, entries)) = self.load_resource(&stem, namespace)? {
            let parent = fallback
                .as_ref()
                .map(|next| self.load_locked(cache, namespace, next))
                .transpose()?;
            tracing::debug!(
                namespace = %namespace,
                locale = %locale,
                resource = %resource,
                "loaded message bundle"
            );
            Arc::new(TemplateMapping::new(locale.clone(), entries, parent))
        } else {
            let Some(next) = &fallback else {
                return Err(BundleError::ResourceNotFound {
                    namespace: namespace.name().to_owned(),
                });
            };
            // No distinct resource for this locale: alias the fallback's
            // mapping so the miss is remembered.
            let parent = self.load_locked(cache, namespace, next)?;
            tracing::trace!(
                namespace = %namespace,
                locale = %locale,
                "memoized fallback mapping for locale without resources"
            );
            parent
        };
        cache
            .bundles
            .write()
            .insert(locale.clone(), Arc::clone(&mapping));
        Ok(mapping)
    }

    /// Probes the `.properties` form first, then the XML variant with the
    /// same stem. A located resource that fails to parse is a hard error.
    fn load_resource(
        &self,
        stem: &str,
        namespace: &Namespace,
    ) -> BundleResult<Option<(String, Entries)>> {
        let provider = self.resource_provider();
        let properties_name = format!("{stem}.properties");
        if let Some(bytes) = provider
            .find(&properties_name, namespace)
            .map_err(|source| BundleError::Read {
                resource: properties_name.clone(),
                source,
            })?
        {
            let entries = properties::parse_text(&bytes).map_err(|err| BundleError::Read {
                resource: properties_name.clone(),
                source: Box::new(err),
            })?;
            return Ok(Some((properties_name, entries)));
        }
        let xml_name = format!("{stem}.xml");
        if let Some(bytes) =
            provider
                .find(&xml_name, namespace)
                .map_err(|source| BundleError::Read {
                    resource: xml_name.clone(),
                    source,
                })?
        {
            let entries = properties::parse_xml(&bytes).map_err(|err| BundleError::Read {
                resource: xml_name.clone(),
                source: Box::new(err),
            })?;
            return Ok(Some((xml_name, entries)));
        }
        Ok(None)
    }
}

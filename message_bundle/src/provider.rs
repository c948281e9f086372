//! Pluggable strategies for ambient locale and resource bytes.
//!
//! Both strategies are seams: swapping the [`ResourceProvider`] lets
//! resources come from an overlay directory or a different archive without
//! changing the resolution algorithm, and swapping the [`LocaleProvider`]
//! decides what "the locale to use now" means when callers do not pass one
//! explicitly.

use crate::locale::Locale;
use crate::namespace::Namespace;
use std::io::ErrorKind;
use std::sync::Arc;
use unic_langid::LanguageIdentifier;

/// Boxed cause for a found-but-unreadable resource.
pub type ResourceError = Box<dyn std::error::Error + Send + Sync>;

/// Strategy deciding the locale to use when none is given explicitly.
///
/// Implementations must be infallible and always return a concrete locale;
/// return [`Locale::root`] when nothing better is known.
pub trait LocaleProvider: Send + Sync {
    /// The locale to use now.
    fn current(&self) -> Locale;
}

/// Default [`LocaleProvider`]: the operating system locale.
///
/// Falls back to the root locale when the OS locale cannot be determined or
/// parsed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLocaleProvider;

impl SystemLocaleProvider {
    /// Creates a new instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LocaleProvider for SystemLocaleProvider {
    fn current(&self) -> Locale {
        sys_locale::get_locale()
            .and_then(|tag| tag.parse::<LanguageIdentifier>().ok())
            .map_or_else(Locale::root, |langid| Locale::from(&langid))
    }
}

/// A [`LocaleProvider`] pinned to one locale.
///
/// Useful for servers that decide the locale per request scope, and for
/// tests.
#[derive(Debug, Clone)]
pub struct FixedLocaleProvider(Locale);

impl FixedLocaleProvider {
    /// Creates a provider that always reports `locale`.
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self(locale)
    }
}

impl LocaleProvider for FixedLocaleProvider {
    fn current(&self) -> Locale {
        self.0.clone()
    }
}

/// Strategy mapping a resource file name and owning namespace to bytes.
///
/// `Ok(None)` means the resource does not exist for this provider, which
/// lets the resolver continue down the locale fallback chain. An `Err` means
/// the resource was located but could not be read; that is surfaced as
/// [`BundleError::Read`](crate::BundleError::Read) and never retried.
pub trait ResourceProvider: Send + Sync {
    /// Locates and reads the named resource for the namespace.
    ///
    /// # Errors
    ///
    /// Returns the underlying failure when the resource exists but cannot
    /// be read.
    fn find(
        &self,
        resource_name: &str,
        namespace: &Namespace,
    ) -> Result<Option<Vec<u8>>, ResourceError>;
}

/// Default [`ResourceProvider`]: reads from the namespace's search path.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchPathProvider;

impl SearchPathProvider {
    /// Creates a new instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ResourceProvider for SearchPathProvider {
    fn find(
        &self,
        resource_name: &str,
        namespace: &Namespace,
    ) -> Result<Option<Vec<u8>>, ResourceError> {
        read_optional(namespace.search_path().join(resource_name).as_str())
    }
}

/// Layers an overlay directory over another provider.
///
/// The overlay is probed first with the flat resource name; on a miss the
/// lookup falls through to the wrapped provider. This reproduces the common
/// deployment where site-local translations shadow the shipped ones.
pub struct OverlayProvider {
    overlay: camino::Utf8PathBuf,
    fallback: Arc<dyn ResourceProvider>,
}

impl OverlayProvider {
    /// Creates an overlay over the given provider.
    #[must_use]
    pub fn new(overlay: impl Into<camino::Utf8PathBuf>, fallback: Arc<dyn ResourceProvider>) -> Self {
        Self {
            overlay: overlay.into(),
            fallback,
        }
    }

    /// Creates an overlay over the default search-path provider.
    #[must_use]
    pub fn over_search_path(overlay: impl Into<camino::Utf8PathBuf>) -> Self {
        Self::new(overlay, Arc::new(SearchPathProvider::new()))
    }
}

impl ResourceProvider for OverlayProvider {
    fn find(
        &self,
        resource_name: &str,
        namespace: &Namespace,
    ) -> Result<Option<Vec<u8>>, ResourceError> {
        if let Some(bytes) = read_optional(self.overlay.join(resource_name).as_str())? {
            return Ok(Some(bytes));
        }
        self.fallback.find(resource_name, namespace)
    }
}

fn read_optional(path: &str) -> Result<Option<Vec<u8>>, ResourceError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(Box::new(err)),
    }
}

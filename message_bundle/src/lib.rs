//! Locale-aware message bundles with fallback resolution and deferred
//! rendering.
//!
//! A [`Namespace`] groups related message templates; the [`BundleResolver`]
//! resolves the namespace's templates for a requested [`Locale`], falling
//! back through progressively less specific locales (variant, country,
//! language, root) and caching the result so repeated lookups are cheap.
//! A [`Localizable`] captures a template reference plus arguments so that
//! rendering can be deferred until a locale is known, for example at output
//! time rather than at computation time.
//!
//! Resources are `.properties` files (with an XML-properties fallback of the
//! same name stem) located through a swappable [`ResourceProvider`]; the
//! ambient locale comes from a swappable [`LocaleProvider`]. Templates use
//! MessageFormat-style positional slots: `{0}`, `{0,number}`, `{0,date}`,
//! `{0,time}` and `{0,choice,…}`.

mod error;
mod locale;
mod localizable;
mod mapping;
mod namespace;
mod pattern;
mod properties;
mod provider;
mod resolver;

pub use error::{BundleError, BundleResult};
pub use locale::Locale;
pub use localizable::{Localizable, Renderable};
pub use mapping::TemplateMapping;
pub use namespace::Namespace;
pub use properties::PropertiesError;
pub use provider::{
    FixedLocaleProvider, LocaleProvider, OverlayProvider, ResourceError, ResourceProvider,
    SearchPathProvider, SystemLocaleProvider,
};
pub use resolver::BundleResolver;

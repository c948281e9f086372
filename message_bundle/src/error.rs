//! Primary error enum for message bundle resolution and rendering.

use thiserror::Error;

/// Convenience alias for results produced by bundle resolution and rendering.
pub type BundleResult<T> = Result<T, BundleError>;

/// Errors that can occur while resolving or rendering localised messages.
///
/// Every failure is surfaced to the immediate caller; the crate never retries
/// internally and never falls back silently beyond the documented locale
/// fallback chain.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BundleError {
    /// No resource exists for the namespace at any locale in the fallback
    /// chain, including the root locale.
    #[error("no message resource was found for namespace '{namespace}'")]
    ResourceNotFound {
        /// Qualified name of the namespace that has no backing resource.
        namespace: String,
    },

    /// A resource chain was found but the requested key is absent at every
    /// level of it.
    #[error("key '{key}' is not defined in namespace '{namespace}' or any fallback level")]
    MissingKey {
        /// Qualified name of the namespace that was searched.
        namespace: String,
        /// Message key that could not be found.
        key: String,
    },

    /// A byte source was located but could not be read or parsed.
    #[error("failed to read message resource '{resource}': {source}")]
    Read {
        /// Name of the resource that failed to load.
        resource: String,
        /// Underlying I/O or parse failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A template was found but its pattern is malformed or incompatible
    /// with the supplied arguments.
    #[error("invalid message pattern for key '{key}': {detail}")]
    Pattern {
        /// Message key whose template failed to format.
        key: String,
        /// Human-readable description of the pattern failure.
        detail: String,
    },
}

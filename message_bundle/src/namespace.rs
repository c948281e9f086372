//! Namespace identity for a set of message templates.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identifies one logical set of message templates.
///
/// A namespace couples a qualified dotted name (such as
/// `com.acme.reports.Messages`) with the directory that naturally contains
/// its resource files. The final dotted segment is the *base name* used as
/// the resource file stem, so the namespace above looks for
/// `Messages.properties`, `Messages_de.properties` and so on.
///
/// Namespaces are cheap to clone and compare by value, which makes them
/// usable as cache keys.
///
/// # Examples
///
/// ```
/// use message_bundle::Namespace;
///
/// let ns = Namespace::new("com.acme.reports.Messages", "i18n/reports");
/// assert_eq!(ns.base_name(), "Messages");
/// assert_eq!(ns.search_path().as_str(), "i18n/reports");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "NamespaceRepr", into = "NamespaceRepr")]
pub struct Namespace {
    inner: Arc<NamespaceInner>,
}

#[derive(Debug)]
struct NamespaceInner {
    name: String,
    search_path: Utf8PathBuf,
}

/// Serialised form of a [`Namespace`].
#[derive(Serialize, Deserialize)]
struct NamespaceRepr {
    name: String,
    search_path: Utf8PathBuf,
}

impl Namespace {
    /// Creates a namespace with the given qualified name and resource
    /// search path.
    #[must_use]
    pub fn new(name: impl Into<String>, search_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            inner: Arc::new(NamespaceInner {
                name: name.into(),
                search_path: search_path.into(),
            }),
        }
    }

    /// The qualified dotted name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The final dotted segment of the name, used as the resource file stem.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.inner
            .name
            .rsplit('.')
            .next()
            .unwrap_or(&self.inner.name)
    }

    /// The directory searched for this namespace's resource files.
    #[must_use]
    pub fn search_path(&self) -> &Utf8Path {
        &self.inner.search_path
    }
}

impl PartialEq for Namespace {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.name == other.inner.name
                && self.inner.search_path == other.inner.search_path)
    }
}

impl Eq for Namespace {}

impl Hash for Namespace {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.name.hash(state);
        self.inner.search_path.hash(state);
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}

impl From<NamespaceRepr> for Namespace {
    fn from(repr: NamespaceRepr) -> Self {
        Self::new(repr.name, repr.search_path)
    }
}

impl From<Namespace> for NamespaceRepr {
    fn from(ns: Namespace) -> Self {
        Self {
            name: ns.inner.name.clone(),
            search_path: ns.inner.search_path.clone(),
        }
    }
}

//! Test helpers shared across crates.
//!
//! This crate provides a temporary resource-tree fixture and a counting
//! resource provider for asserting cache behaviour.

use camino::Utf8PathBuf;
use message_bundle::{Namespace, ResourceError, ResourceProvider, SearchPathProvider};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// A temporary directory of message resource files.
///
/// Files are written under a unique temp directory that is removed when the
/// fixture drops. [`ResourceTree::namespace`] hands out namespaces whose
/// search path is that directory, so the default resource provider finds
/// the written files.
///
/// # Examples
///
/// ```
/// use message_bundle::{BundleResolver, Locale};
/// use test_helpers::ResourceTree;
///
/// let tree = ResourceTree::new();
/// tree.write_properties("Messages", "abc=base");
/// let ns = tree.namespace("com.acme.Messages");
///
/// let resolver = BundleResolver::new();
/// let text = resolver
///     .format_at(&ns, &Locale::new("en"), "abc", &[])
///     .expect("root resource resolves");
/// assert_eq!(text, "base");
/// ```
pub struct ResourceTree {
    dir: TempDir,
}

impl ResourceTree {
    /// Creates an empty resource tree.
    ///
    /// # Panics
    ///
    /// Panics when the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp resource dir"),
        }
    }

    /// The directory containing the resource files.
    ///
    /// # Panics
    ///
    /// Panics when the temporary directory path is not valid UTF-8.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().to_path_buf())
            .expect("temp dir path should be UTF-8")
    }

    /// Writes `<file_stem>.properties` with the given body.
    ///
    /// # Panics
    ///
    /// Panics when the file cannot be written.
    pub fn write_properties(&self, file_stem: &str, body: &str) {
        let path = self.path().join(format!("{file_stem}.properties"));
        std::fs::write(path, body).expect("write properties file");
    }

    /// Writes `<file_stem>.xml` as an XML properties document.
    ///
    /// # Panics
    ///
    /// Panics when the file cannot be written.
    pub fn write_xml(&self, file_stem: &str, entries: &[(&str, &str)]) {
        let mut body = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<properties>\n",
        );
        for (key, value) in entries {
            body.push_str(&format!("  <entry key=\"{key}\">{value}</entry>\n"));
        }
        body.push_str("</properties>\n");
        let path = self.path().join(format!("{file_stem}.xml"));
        std::fs::write(path, body).expect("write XML properties file");
    }

    /// Removes a previously written resource file.
    ///
    /// # Panics
    ///
    /// Panics when the file cannot be removed.
    pub fn remove(&self, file_name: &str) {
        std::fs::remove_file(self.path().join(file_name)).expect("remove resource file");
    }

    /// A namespace whose search path is this tree's directory.
    #[must_use]
    pub fn namespace(&self, qualified_name: &str) -> Namespace {
        Namespace::new(qualified_name, self.path())
    }
}

impl Default for ResourceTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A resource provider that counts how many lookups found bytes.
///
/// Wraps another provider (the default search-path provider unless given
/// one) and increments a counter every time `find` returns content. Use it
/// to assert that a bundle is loaded at most once under concurrency.
pub struct CountingProvider {
    inner: Arc<dyn ResourceProvider>,
    loads: AtomicUsize,
}

impl CountingProvider {
    /// Wraps the given provider.
    #[must_use]
    pub fn new(inner: Arc<dyn ResourceProvider>) -> Self {
        Self {
            inner,
            loads: AtomicUsize::new(0),
        }
    }

    /// Wraps the default search-path provider.
    #[must_use]
    pub fn over_search_path() -> Self {
        Self::new(Arc::new(SearchPathProvider::new()))
    }

    /// How many lookups have returned content so far.
    #[must_use]
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ResourceProvider for CountingProvider {
    fn find(
        &self,
        resource_name: &str,
        namespace: &Namespace,
    ) -> Result<Option<Vec<u8>>, ResourceError> {
        let found = self.inner.find(resource_name, namespace)?;
        if found.is_some() {
            self.loads.fetch_add(1, Ordering::SeqCst);
        }
        Ok(found)
    }
}

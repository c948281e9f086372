//! Unit tests for fallback resolution and cache behaviour.

use super::*;
use crate::provider::{FixedLocaleProvider, ResourceError};
use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory resource provider with a load counter.
#[derive(Default)]
struct MapProvider {
    files: HashMap<String, Vec<u8>>,
    loads: AtomicUsize,
}

impl MapProvider {
    fn with(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(name, body)| ((*name).to_owned(), body.as_bytes().to_vec()))
                .collect(),
            loads: AtomicUsize::new(0),
        }
    }
}

impl ResourceProvider for MapProvider {
    fn find(
        &self,
        resource_name: &str,
        _namespace: &Namespace,
    ) -> Result<Option<Vec<u8>>, ResourceError> {
        let found = self.files.get(resource_name).cloned();
        if found.is_some() {
            self.loads.fetch_add(1, Ordering::SeqCst);
        }
        Ok(found)
    }
}

fn resolver_with(files: &[(&str, &str)]) -> BundleResolver {
    BundleResolver::with_providers(
        Arc::new(FixedLocaleProvider::new(Locale::new("en"))),
        Arc::new(MapProvider::with(files)),
    )
}

fn namespace() -> Namespace {
    Namespace::new("com.acme.Messages", "unused")
}

#[rstest]
fn root_only_namespace_resolves_for_any_locale() {
    let resolver = resolver_with(&[("Messages.properties", "abc=base")]);
    let ns = namespace();
    for locale in [
        Locale::root(),
        Locale::new("en"),
        Locale::new("de").with_country("DE").with_variant("bavarian"),
    ] {
        let mapping = resolver.resolve(&ns, &locale).expect("root resource backs every locale");
        assert_eq!(mapping.get("abc"), Some("base"));
    }
}

#[rstest]
fn parent_chain_ends_at_the_nearest_backing_resource() {
    let resolver = resolver_with(&[
        ("Messages.properties", "abc=base\nonly_root=root"),
        ("Messages_de.properties", "abc=german"),
    ]);
    let ns = namespace();
    let mapping = resolver
        .resolve(&ns, &Locale::new("de").with_country("DE"))
        .expect("chain resolves");

    // de_DE has no resource of its own, so it aliases the de mapping.
    assert_eq!(mapping.locale(), &Locale::new("de"));
    assert_eq!(mapping.get("abc"), Some("german"));
    assert_eq!(mapping.get("only_root"), Some("root"));
    let parent = mapping.parent().expect("de links to root");
    assert!(parent.locale().is_root());
    assert!(parent.parent().is_none());
}

#[rstest]
fn key_defined_only_at_root_renders_identically_everywhere() {
    let resolver = resolver_with(&[
        ("Messages.properties", "abc=base"),
        ("Messages_de.properties", "other=german"),
    ]);
    let ns = namespace();
    for locale in [Locale::new("en"), Locale::new("de").with_country("DE"), Locale::root()] {
        let text = resolver
            .format_at(&ns, &locale, "abc", &[])
            .expect("root key reachable from every locale");
        assert_eq!(text, "base");
    }
}

#[rstest]
fn locales_without_resources_alias_the_same_mapping() {
    let resolver = resolver_with(&[("Messages.properties", "abc=base")]);
    let ns = namespace();
    let en = resolver.resolve(&ns, &Locale::new("en")).expect("resolves");
    let root = resolver.resolve(&ns, &Locale::root()).expect("resolves");
    assert!(Arc::ptr_eq(&en, &root));
}

#[rstest]
fn repeated_resolution_hits_the_cache() {
    let provider = Arc::new(MapProvider::with(&[("Messages.properties", "abc=base")]));
    let resolver = BundleResolver::with_providers(
        Arc::new(FixedLocaleProvider::new(Locale::new("en"))),
        Arc::clone(&provider) as Arc<dyn ResourceProvider>,
    );
    let ns = namespace();
    let first = resolver.resolve(&ns, &Locale::new("en")).expect("resolves");
    let loads_after_first = provider.loads.load(Ordering::SeqCst);
    let second = resolver.resolve(&ns, &Locale::new("en")).expect("resolves");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(provider.loads.load(Ordering::SeqCst), loads_after_first);
}

#[rstest]
fn missing_root_resource_is_resource_not_found() {
    let resolver = resolver_with(&[]);
    let err = resolver
        .resolve(&namespace(), &Locale::new("en"))
        .expect_err("nothing to resolve");
    assert!(matches!(err, BundleError::ResourceNotFound { namespace } if namespace == "com.acme.Messages"));
}

#[rstest]
fn key_absent_at_every_level_is_missing_key() {
    let resolver = resolver_with(&[("Messages.properties", "abc=base")]);
    let err = resolver
        .format_at(&namespace(), &Locale::new("en"), "absent", &[])
        .expect_err("key is nowhere");
    assert!(matches!(err, BundleError::MissingKey { key, .. } if key == "absent"));
}

#[rstest]
fn properties_form_wins_over_xml_with_the_same_stem() {
    let resolver = resolver_with(&[
        ("Messages.properties", "abc=Fran\\u00e7ais(properties)"),
        (
            "Messages.xml",
            "<properties><entry key=\"abc\">Français(xml)</entry></properties>",
        ),
    ]);
    let text = resolver
        .format_at(&namespace(), &Locale::root(), "abc", &[])
        .expect("properties form resolves");
    assert_eq!(text, "Français(properties)");
}

#[rstest]
fn xml_form_backs_a_locale_without_properties() {
    let resolver = resolver_with(&[(
        "Messages_ja.xml",
        "<properties><entry key=\"abc\">日本語</entry></properties>",
    ), ("Messages.properties", "abc=base")]);
    let text = resolver
        .format_at(&namespace(), &Locale::new("ja"), "abc", &[])
        .expect("XML form resolves");
    assert_eq!(text, "日本語");
}

#[rstest]
fn malformed_resource_fails_hard_without_fallback() {
    let resolver = resolver_with(&[
        ("Messages.properties", "abc=base"),
        ("Messages_de.properties", "abc=\\uZZZZ"),
    ]);
    let err = resolver
        .resolve(&namespace(), &Locale::new("de"))
        .expect_err("malformed resource must not fall back");
    assert!(matches!(err, BundleError::Read { resource, .. } if resource == "Messages_de.properties"));
}

#[rstest]
fn clear_forgets_cached_mappings() {
    let provider = Arc::new(MapProvider::with(&[("Messages.properties", "abc=base")]));
    let resolver = BundleResolver::with_providers(
        Arc::new(FixedLocaleProvider::new(Locale::new("en"))),
        Arc::clone(&provider) as Arc<dyn ResourceProvider>,
    );
    let ns = namespace();
    let first = resolver.resolve(&ns, &Locale::root()).expect("resolves");
    resolver.clear();
    let second = resolver.resolve(&ns, &Locale::root()).expect("resolves again");
    assert!(!Arc::ptr_eq(&first, &second));
}

#[rstest]
fn ambient_format_uses_the_locale_provider() {
    let resolver = BundleResolver::with_providers(
        Arc::new(FixedLocaleProvider::new(Locale::new("de"))),
        Arc::new(MapProvider::with(&[
            ("Messages.properties", "abc=base"),
            ("Messages_de.properties", "abc=german"),
        ])),
    );
    let text = resolver.format(&namespace(), "abc", &[]).expect("resolves");
    assert_eq!(text, "german");
}

#[rstest]
fn localizable_factory_defers_rendering() {
    let resolver = resolver_with(&[("Messages.properties", "greeting=Hello, {0}!")]);
    let ns = namespace();
    let message = resolver.localizable(&ns, "greeting", [Renderable::from("World")]);
    assert_eq!(
        message
            .render_with(&resolver, &Locale::new("en"))
            .expect("resolves"),
        "Hello, World!"
    );
}

#[rstest]
fn swapping_the_locale_provider_is_immediate() {
    let resolver = resolver_with(&[
        ("Messages.properties", "abc=base"),
        ("Messages_de.properties", "abc=german"),
    ]);
    let ns = namespace();
    assert_eq!(resolver.format(&ns, "abc", &[]).expect("resolves"), "base");
    resolver.set_locale_provider(Arc::new(FixedLocaleProvider::new(Locale::new("de"))));
    assert_eq!(resolver.format(&ns, "abc", &[]).expect("resolves"), "german");
}

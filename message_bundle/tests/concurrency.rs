//! At-most-once loading under concurrent first resolution.

use anyhow::Result;
use message_bundle::{BundleResolver, FixedLocaleProvider, Locale, TemplateMapping};
use rstest::rstest;
use std::sync::{Arc, Barrier};
use test_helpers::{CountingProvider, ResourceTree};

#[rstest]
fn concurrent_first_resolution_loads_exactly_once() -> Result<()> {
    let tree = ResourceTree::new();
    tree.write_properties("Messages", "abc=base");
    let ns = tree.namespace("com.acme.Messages");

    let provider = Arc::new(CountingProvider::over_search_path());
    let resolver = Arc::new(BundleResolver::with_providers(
        Arc::new(FixedLocaleProvider::new(Locale::new("en"))),
        Arc::clone(&provider) as Arc<dyn message_bundle::ResourceProvider>,
    ));

    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));
    let mut handles = Vec::with_capacity(threads);
    for _ in 0..threads {
        let resolver = Arc::clone(&resolver);
        let ns = ns.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(std::thread::spawn(move || {
            barrier.wait();
            resolver.resolve(&ns, &Locale::new("en"))
        }));
    }

    let mut mappings: Vec<Arc<TemplateMapping>> = Vec::with_capacity(threads);
    for handle in handles {
        let mapping = handle
            .join()
            .map_err(|_| anyhow::anyhow!("resolution thread panicked"))??;
        mappings.push(mapping);
    }

    // Every thread observes the same mapping object.
    let first = mappings
        .first()
        .ok_or_else(|| anyhow::anyhow!("no mappings resolved"))?;
    assert!(mappings.iter().all(|mapping| Arc::ptr_eq(first, mapping)));
    // The backing resource was read exactly once.
    assert_eq!(provider.loads(), 1);
    Ok(())
}

#[rstest]
fn unrelated_namespaces_resolve_concurrently() -> Result<()> {
    let tree = ResourceTree::new();
    tree.write_properties("Alpha", "abc=alpha");
    tree.write_properties("Beta", "abc=beta");
    let resolver = Arc::new(BundleResolver::new());

    let alpha = tree.namespace("com.acme.Alpha");
    let beta = tree.namespace("com.acme.Beta");
    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for ns in [alpha, beta] {
        let resolver = Arc::clone(&resolver);
        let barrier = Arc::clone(&barrier);
        handles.push(std::thread::spawn(move || {
            barrier.wait();
            resolver.format_at(&ns, &Locale::new("en"), "abc", &[])
        }));
    }
    let mut texts = Vec::new();
    for handle in handles {
        texts.push(
            handle
                .join()
                .map_err(|_| anyhow::anyhow!("resolution thread panicked"))??,
        );
    }
    texts.sort();
    assert_eq!(texts, ["alpha", "beta"]);
    Ok(())
}

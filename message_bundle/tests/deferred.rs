//! Deferred rendering through `Localizable`.

use anyhow::Result;
use message_bundle::{
    BundleError, BundleResolver, Localizable, Locale, Renderable,
};
use rstest::rstest;
use test_helpers::ResourceTree;

#[rstest]
fn null_argument_formats_as_the_literal_null() -> Result<()> {
    let tree = ResourceTree::new();
    tree.write_properties("Messages", "arg=arg: {0}");
    let ns = tree.namespace("com.acme.Messages");
    let resolver = BundleResolver::new();

    let message = Localizable::new(ns, "arg", [Renderable::Null]);
    assert_eq!(message.render_with(&resolver, &Locale::new("en"))?, "arg: null");
    Ok(())
}

#[rstest]
fn rendering_defers_locale_choice() -> Result<()> {
    let tree = ResourceTree::new();
    tree.write_properties("Messages", "files={0,choice,0#no files|1#one file|1<{0,number,integer} files}");
    tree.write_properties("Messages_de", "files={0,choice,0#keine Dateien|1#eine Datei|1<{0,number,integer} Dateien}");
    let ns = tree.namespace("com.acme.Messages");
    let resolver = BundleResolver::new();

    // One value object, rendered later for two audiences.
    let message = Localizable::new(ns, "files", [Renderable::Int(3)]);
    assert_eq!(message.render_with(&resolver, &Locale::new("en"))?, "3 files");
    assert_eq!(
        message.render_with(&resolver, &Locale::new("de").with_country("DE"))?,
        "3 Dateien"
    );
    Ok(())
}

#[rstest]
fn construction_does_no_io() -> Result<()> {
    // The namespace points at a directory that does not exist; construction
    // must still succeed because resolution is fully deferred.
    let ns = message_bundle::Namespace::new("com.acme.Ghost", "/nonexistent/res");
    let message = Localizable::new(ns, "key", [Renderable::Int(1)]);

    let resolver = BundleResolver::new();
    let err = message
        .render_with(&resolver, &Locale::new("en"))
        .expect_err("rendering should fail, construction should not");
    assert!(matches!(err, BundleError::ResourceNotFound { .. }));
    Ok(())
}

#[rstest]
fn missing_key_surfaces_with_namespace_and_key() {
    let tree = ResourceTree::new();
    tree.write_properties("Messages", "present=here");
    let ns = tree.namespace("com.acme.Messages");
    let resolver = BundleResolver::new();

    let message = Localizable::new(ns, "absent", []);
    let err = message
        .render_with(&resolver, &Locale::new("en"))
        .expect_err("key is absent everywhere");
    assert!(matches!(
        err,
        BundleError::MissingKey { namespace, key }
            if namespace == "com.acme.Messages" && key == "absent"
    ));
}

#[rstest]
fn serde_round_trip_preserves_value_equality() -> Result<()> {
    let tree = ResourceTree::new();
    tree.write_properties("Messages", "greeting=Hello, {0}! You have {1,number,integer} items.");
    let ns = tree.namespace("com.acme.Messages");

    let original = Localizable::new(
        ns,
        "greeting",
        [Renderable::from("World"), Renderable::Int(5)],
    );
    let wire = serde_json::to_string(&original)?;
    let restored: Localizable = serde_json::from_str(&wire)?;
    assert_eq!(original, restored);

    let resolver = BundleResolver::new();
    assert_eq!(
        restored.render_with(&resolver, &Locale::new("en"))?,
        "Hello, World! You have 5 items."
    );
    Ok(())
}

#[rstest]
fn typed_arguments_use_their_hints() -> Result<()> {
    let tree = ResourceTree::new();
    tree.write_properties("Messages", "report=Generated {0,date,short} at {1,time,short}");
    let ns = tree.namespace("com.acme.Messages");
    let resolver = BundleResolver::new();

    let stamp = chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
        .and_then(|d| d.and_hms_opt(14, 5, 0))
        .ok_or_else(|| anyhow::anyhow!("valid timestamp"))?;
    let message = Localizable::new(
        ns,
        "report",
        [Renderable::from(stamp), Renderable::from(stamp)],
    );
    assert_eq!(
        message.render_with(&resolver, &Locale::new("en"))?,
        "Generated 2024-03-09 at 14:05"
    );
    Ok(())
}

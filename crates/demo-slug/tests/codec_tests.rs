//! Tests for slug encoding and decoding

use demo_slug::{
    DecodedSlug, decode_slug, encode_collection_slug, encode_file_slug, encode_variant_slug,
    segment_count, to_canonical_form,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

const VARIANTS: [&str; 3] = ["Default", "Premium", "CssModules"];

// =============================================================================
// Canonical form
// =============================================================================

#[rstest]
#[case("FooBar", "foo-bar")]
#[case("APIUtils", "apiutils")]
#[case("MyComponent.test", "my-component.test")]
#[case("  Hello   World  ", "hello-world")]
#[case("snake_case_name", "snake-case-name")]
#[case("already-kebab", "already-kebab")]
#[case("Tailwind CSS", "tailwind-css")]
#[case("über", "ber")]
#[case("", "")]
fn test_canonical_form(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(to_canonical_form(input), expected);
}

// =============================================================================
// Encoding
// =============================================================================

#[test]
fn test_encode_kebab_base_keeps_extension() {
    assert_eq!(
        encode_file_slug("Basic", "MyComponent.test.tsx", "Default", true),
        "basic:my-component.test.tsx"
    );
}

#[rstest]
#[case("Demo", "helper.ts", "Premium", false, "demo:premium:helper.ts")]
#[case("Demo", "helper.ts", "Premium", true, "demo:helper.ts")]
#[case("Demo", "Makefile", "Default", true, "demo:makefile")]
#[case("Css Modules Demo", "styles.module.css", "CssModules", false, "css-modules-demo:css-modules:styles.module.css")]
#[case("", "Component.tsx", "Premium", false, "component.tsx")]
fn test_encode_file_slug(
    #[case] collection: &str,
    #[case] file: &str,
    #[case] variant: &str,
    #[case] is_default: bool,
    #[case] expected: &str,
) {
    assert_eq!(encode_file_slug(collection, file, variant, is_default), expected);
}

#[test]
fn test_encode_collection_slug() {
    assert_eq!(encode_collection_slug("This Demo"), "this-demo");
    assert_eq!(encode_collection_slug(""), "");
}

#[test]
fn test_encode_variant_slug() {
    assert_eq!(encode_variant_slug("Demo", "Premium", false), "demo:premium");
    assert_eq!(encode_variant_slug("Demo", "Default", true), "demo");
    assert_eq!(encode_variant_slug("", "Premium", false), "");
}

#[test]
fn test_segment_count() {
    assert_eq!(segment_count("demo"), 1);
    assert_eq!(segment_count("demo:file.ts"), 2);
    assert_eq!(segment_count("demo:premium:file.ts"), 3);
    assert_eq!(segment_count(""), 1);
}

// =============================================================================
// Decoding
// =============================================================================

#[test]
fn test_decode_collection_only() {
    assert_eq!(
        decode_slug("demo", VARIANTS),
        DecodedSlug::CollectionOnly {
            collection: "demo".to_string()
        }
    );
}

#[test]
fn test_decode_known_variant_is_compared_canonically() {
    assert_eq!(
        decode_slug("demo:css-modules", VARIANTS),
        DecodedSlug::Variant {
            collection: "demo".to_string(),
            variant: "CssModules".to_string(),
        }
    );
}

#[test]
fn test_decode_default_variant_file() {
    let decoded = decode_slug("demo:component.tsx", VARIANTS);
    assert_eq!(decoded.collection(), Some("demo"));
    assert_eq!(decoded.file(), Some("component.tsx"));
    assert_eq!(decoded.variant(), None);
}

#[test]
fn test_decode_two_segments_without_dot_is_ambiguous() {
    assert_eq!(
        decode_slug("demo:something-else", VARIANTS),
        DecodedSlug::CollectionOnly {
            collection: "demo".to_string()
        }
    );
}

#[test]
fn test_decode_three_segments() {
    assert_eq!(
        decode_slug("demo:premium:helper.ts", VARIANTS),
        DecodedSlug::VariantFile {
            collection: "demo".to_string(),
            variant: "premium".to_string(),
            file: "helper.ts".to_string(),
        }
    );
}

#[rstest]
#[case("a:b:c:d")]
#[case("::::")]
#[case("demo:premium:helper.ts:extra")]
fn test_decode_unparseable(#[case] slug: &str) {
    assert_eq!(decode_slug(slug, VARIANTS), DecodedSlug::Unparseable);
}

#[test]
fn test_decode_empty_slug() {
    assert_eq!(
        decode_slug("", VARIANTS),
        DecodedSlug::CollectionOnly {
            collection: String::new()
        }
    );
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn test_canonical_form_is_total_and_idempotent(s in "\\PC*") {
        let once = to_canonical_form(&s);

        // Only [a-z0-9.-], never leading/trailing separators
        prop_assert!(once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-'));
        prop_assert!(!once.starts_with('-'));
        prop_assert!(!once.ends_with('-'));
        prop_assert!(!once.contains("--"));

        prop_assert_eq!(to_canonical_form(&once), once);
    }

    #[test]
    fn test_decode_never_panics(s in "\\PC*") {
        let _ = decode_slug(&s, VARIANTS);
    }

    #[test]
    fn test_round_trip_preserves_segments(
        collection in "[A-Z][a-zA-Z ]{0,12}",
        base in "[A-Za-z][A-Za-z0-9_]{0,10}",
        extension in "[a-z]{1,4}",
        variant in "[A-Z][a-z]{1,8}",
        is_default in any::<bool>(),
    ) {
        let file = format!("{base}.{extension}");
        let slug = encode_file_slug(&collection, &file, &variant, is_default);
        let decoded = decode_slug(&slug, [variant.as_str()]);

        let expected_collection = to_canonical_form(&collection);
        let expected_variant = to_canonical_form(&variant);
        let expected_file = format!("{}.{}", to_canonical_form(&base), extension);
        prop_assert_eq!(decoded.collection(), Some(expected_collection.as_str()));
        prop_assert_eq!(decoded.file(), Some(expected_file.as_str()));
        if is_default {
            prop_assert_eq!(decoded.variant(), None);
        } else {
            prop_assert_eq!(decoded.variant(), Some(expected_variant.as_str()));
        }
    }
}

//! [`TestCollection`] builder for selection scenarios.

use demo_meta::{Collection, Variant};
use indexmap::IndexMap;

/// Builder for collections used in tests.
///
/// # Example
///
/// ```rust
/// use demo_test_utils::TestCollection;
///
/// let collection = TestCollection::new("Demo")
///     .variant("Default", "component.tsx", &["styles.css"])
///     .variant("Premium", "component.tsx", &["helper.ts"])
///     .build();
/// assert_eq!(collection.default_variant(), "Default");
/// ```
pub struct TestCollection {
    id: String,
    variants: IndexMap<String, Variant>,
    default_variant: Option<String>,
}

impl TestCollection {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            variants: IndexMap::new(),
            default_variant: None,
        }
    }

    /// Add a variant. Content sources are derived from the names.
    pub fn variant(mut self, name: &str, main_file: &str, extra_files: &[&str]) -> Self {
        let variant = extra_files.iter().fold(
            Variant::new(main_file, format!("./{name}/{main_file}")),
            |variant, file| variant.with_file(*file, format!("./{name}/{file}")),
        );
        self.variants.insert(name.to_string(), variant);
        self
    }

    /// Designate an explicit default variant.
    pub fn default_variant(mut self, name: &str) -> Self {
        self.default_variant = Some(name.to_string());
        self
    }

    /// Build the collection, panicking on invalid fixtures.
    pub fn build(self) -> Collection {
        let collection = Collection::new(self.id, self.variants)
            .expect("TestCollection::build: invalid collection fixture");
        match self.default_variant {
            Some(name) => collection
                .with_default_variant(name)
                .expect("TestCollection::build: unknown default variant"),
            None => collection,
        }
    }
}

/// The `demo` collection most scenarios run against.
///
/// - `Default`: `component.tsx`, `styles.css`, `utils.ts`
/// - `Premium`: `component.tsx`, `helper.ts`
/// - `Tailwind`: `index.tsx`
pub fn demo_collection() -> Collection {
    TestCollection::new("demo")
        .variant("Default", "component.tsx", &["styles.css", "utils.ts"])
        .variant("Premium", "component.tsx", &["helper.ts"])
        .variant("Tailwind", "index.tsx", &[])
        .build()
}

//! Slug codec for shareable demo selection links.
//!
//! A slug is the compact, colon-delimited form of a viewer selection:
//!
//! ```text
//! collection[:variant][:file]
//! ```
//!
//! The variant segment is only present when the selected variant is not the
//! collection's default variant. Every segment is produced in canonical
//! lower-kebab form, except the file extension which is kept verbatim.
//!
//! All functions in this crate are total: any input string produces a value,
//! and decoding never fails. Anything that cannot be parsed is reported as
//! [`DecodedSlug::Unparseable`] and treated as "no match" by callers.
//!
//! # Example
//!
//! ```
//! use demo_slug::{decode_slug, encode_file_slug, DecodedSlug};
//!
//! let slug = encode_file_slug("Basic", "MyComponent.test.tsx", "Default", true);
//! assert_eq!(slug, "basic:my-component.test.tsx");
//!
//! let decoded = decode_slug(&slug, ["Default", "Premium"]);
//! assert_eq!(
//!     decoded,
//!     DecodedSlug::DefaultVariantFile {
//!         collection: "basic".to_string(),
//!         file: "my-component.test.tsx".to_string(),
//!     }
//! );
//! ```

pub mod canonical;
pub mod codec;

pub use canonical::{SEPARATOR, to_canonical_form};
pub use codec::{
    DecodedSlug, SEGMENT_DELIMITER, decode_slug, encode_collection_slug, encode_file_segment,
    encode_file_slug, encode_variant_slug, segment_count, split_extension,
};

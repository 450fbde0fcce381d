//! Path-segment identifiers.
//!
//! Everything here is pure string work: classifying an inbound segment into
//! its identifier scheme, building and splitting SEO segments, and turning
//! Cyrillic labels into anchor ids. Store access lives in [`crate::resolver`].

pub mod scheme;
pub mod seo;
pub mod translit;

pub use scheme::{
    candidates, classify, is_canonical_uuid, Candidate, Lookup, PrimaryKey, Scheme,
    TrailingIdScheme,
};
pub use seo::{build_seo_segment, canonical_path, extract_trailing_id, MAX_TITLE_SLUG_LEN};
pub use translit::{anchor_id, transliterate};

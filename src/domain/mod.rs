//! Domain types for the catalog.
//!
//! This module contains the core data structures:
//! - Resource: catalog entries and their store row shape
//! - Status: publication lifecycle and view filters
//! - Taxonomy: groups, subgroups, translations and release versions

pub mod resource;
pub mod status;
pub mod taxonomy;

// Re-export commonly used types
pub use resource::{RelatedLink, ResourceRecord, ResourceRow, PLACEHOLDER_SCREENSHOT};
pub use status::{Status, StatusFilter};
pub use taxonomy::{
    GroupKey, GroupRecord, GroupScheme, GroupTranslation, StatusRecord, SubgroupRecord,
    SubsubgroupRecord, VersionRecord,
};

//! bibliotechka - catalog core of a curated resource directory
//!
//! Resolves resource links written under any of the catalog's identifier
//! generations and turns a group's resources into navigable subgroup
//! sections. All data is read from an external store.
//!
//! # Architecture
//!
//! - Identifiers are classified purely syntactically into a closed set of
//!   schemes, which yields an ordered list of store lookups
//! - The resolver runs those lookups and rejects records filed under another
//!   group
//! - Catalog builders are pure functions over already-fetched records
//!
//! # Modules
//!
//! - `domain`: Data structures (ResourceRecord, Status, groups, versions)
//! - `identifier`: Scheme classification, SEO segments, anchor ids
//! - `resolver`: Segment to resource resolution
//! - `catalog`: Group pages, overview, updates feed
//! - `store`: Store trait with SQLite and REST implementations
//! - `config`: Configuration loading
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Resolve a link
//! bibliotechka resolve trainers grid-garden-302
//!
//! # Show a group page
//! bibliotechka group trainers --status published,coming-soon
//!
//! # Build a readable segment
//! bibliotechka seo-url "Интерактивный Тренажёр" 42
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod identifier;
pub mod resolver;
pub mod store;

// Re-export main types at crate root for convenience
pub use catalog::{aggregate_catalog, CatalogAggregate, CatalogAggregator, CatalogSection};
pub use domain::{GroupKey, GroupRecord, GroupScheme, ResourceRecord, Status, StatusFilter};
pub use identifier::{anchor_id, build_seo_segment, extract_trailing_id, Scheme};
pub use resolver::{
    resolve_resource, Resolution, ResolveError, ResolvedReference, Resolver, ResolverSettings,
};
pub use store::{ResourceStore, RestStore, SqliteStore, StoreError};

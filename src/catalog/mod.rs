//! Catalog views built from already-fetched store data.
//!
//! Nothing in here performs I/O: callers fetch records through a
//! [`crate::store::ResourceStore`] and hand them to these builders.
//!
//! - [`aggregate`]: a group page split into subgroup sections
//! - [`overview`]: the home page list of groups
//! - [`updates`]: the release feed and admin version listing

pub mod aggregate;
pub mod overview;
pub mod updates;

pub use aggregate::{
    aggregate_catalog, collate, collation_key, CatalogAggregate, CatalogAggregator,
    CatalogSection, NO_SUBGROUP,
};
pub use overview::{group_overview, GroupSummary};
pub use updates::{
    sort_versions, version_listing, UpdateEntry, UpdatesFeed, VersionSummary, VersionUpdates,
};

//! Read-only access to the catalog's backing store.
//!
//! The resolver and the catalog builders only ever talk to [`ResourceStore`];
//! two implementations are provided:
//! - [`SqliteStore`]: a local snapshot of the catalog tables
//! - [`RestStore`]: the hosted database through its REST interface

pub mod rest;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    GroupKey, GroupRecord, GroupTranslation, ResourceRecord, StatusFilter, StatusRecord,
    SubgroupRecord, SubsubgroupRecord, VersionRecord,
};
use crate::identifier::PrimaryKey;

pub use rest::{RestStore, RestStoreConfig};
pub use sqlite::SqliteStore;

/// Failure talking to the backing store. Surfaced to callers unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Store connection lock poisoned")]
    Poisoned,
}

/// Query capability the catalog needs from a store
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Resource by UUID or numeric primary key
    async fn find_by_primary_key(
        &self,
        key: &PrimaryKey,
    ) -> Result<Option<ResourceRecord>, StoreError>;

    /// Resource by short id
    async fn find_by_short_id(&self, short_id: &str)
        -> Result<Option<ResourceRecord>, StoreError>;

    /// All resources of a group whose status passes the filter
    async fn list_by_group(
        &self,
        group: &GroupKey,
        filter: &StatusFilter,
    ) -> Result<Vec<ResourceRecord>, StoreError>;

    /// Group by slug, merged with its legacy translation when one exists
    async fn find_group_by_slug_or_translation(
        &self,
        slug: &str,
    ) -> Result<Option<GroupRecord>, StoreError>;

    /// Every resource whose status passes the filter
    async fn list_resources(&self, filter: &StatusFilter)
        -> Result<Vec<ResourceRecord>, StoreError>;

    /// Every resource, whatever its status (unrecognised or missing included)
    async fn list_all_resources(&self) -> Result<Vec<ResourceRecord>, StoreError>;

    /// Resources attached to a release version
    async fn list_by_version(
        &self,
        version: i64,
        filter: &StatusFilter,
    ) -> Result<Vec<ResourceRecord>, StoreError>;

    async fn list_groups(&self) -> Result<Vec<GroupRecord>, StoreError>;

    async fn list_translations(&self) -> Result<Vec<GroupTranslation>, StoreError>;

    async fn list_subgroups(&self) -> Result<Vec<SubgroupRecord>, StoreError>;

    async fn list_subsubgroups(&self) -> Result<Vec<SubsubgroupRecord>, StoreError>;

    async fn list_statuses(&self) -> Result<Vec<StatusRecord>, StoreError>;

    async fn list_versions(&self) -> Result<Vec<VersionRecord>, StoreError>;
}

/// Fill gaps in a group row from its translation
pub(crate) fn merge_translation(
    group: Option<GroupRecord>,
    translation: Option<GroupTranslation>,
) -> Option<GroupRecord> {
    match (group, translation) {
        (Some(mut group), Some(t)) => {
            if group.display_name.as_deref().map_or(true, str::is_empty) {
                group.display_name = Some(t.display_name);
            }
            group.description = group.description.or(t.description);
            group.cover_url = group.cover_url.or(t.cover_url);
            group.original_name = Some(t.original_name);
            Some(group)
        }
        (Some(group), None) => Some(group),
        (None, Some(t)) => Some(GroupRecord::from(t)),
        (None, None) => None,
    }
}

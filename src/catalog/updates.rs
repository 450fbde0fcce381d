//! Release versions: the public updates feed and the admin listing.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use super::aggregate::collate;
use crate::domain::{GroupTranslation, ResourceRecord, Status, VersionRecord};
use crate::identifier::canonical_path;

/// A resource as it appears in the updates feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateEntry {
    /// Stored title; AI overrides are not applied here
    pub title: String,

    /// Readable link, when the resource has both a group slug and an id
    pub path: Option<String>,

    pub resource: ResourceRecord,
}

/// One release and what it published
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionUpdates {
    pub version: VersionRecord,
    pub entries: Vec<UpdateEntry>,
}

/// Admin view of a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionSummary {
    pub version: VersionRecord,
    pub resource_count: usize,
}

/// Newest release first; undated releases last
fn release_order(a: &VersionRecord, b: &VersionRecord) -> Ordering {
    match (a.release_date, b.release_date) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| b.slug.cmp(&a.slug))
}

/// Sort versions for display
pub fn sort_versions(versions: &mut [VersionRecord]) {
    versions.sort_by(release_order);
}

/// Builds feed links, mapping legacy group names to slugs
#[derive(Debug, Clone, Default)]
pub struct UpdatesFeed {
    /// original_name -> slug
    group_slugs: HashMap<String, String>,
}

impl UpdatesFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translations(
        mut self,
        translations: impl IntoIterator<Item = GroupTranslation>,
    ) -> Self {
        self.group_slugs
            .extend(translations.into_iter().map(|t| (t.original_name, t.slug)));
        self
    }

    /// Group segment of a resource's readable link
    pub fn group_slug_for<'a>(&'a self, resource: &'a ResourceRecord) -> Option<&'a str> {
        resource
            .group_slug
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| {
                resource
                    .group_name
                    .as_deref()
                    .and_then(|name| self.group_slugs.get(name))
                    .map(String::as_str)
            })
    }

    /// Readable `/{group}/{title-id}` link of a resource
    pub fn path_for(&self, resource: &ResourceRecord) -> Option<String> {
        let group = self.group_slug_for(resource)?;
        let id = resource
            .slug
            .map(|n| n.to_string())
            .or_else(|| resource.short_id.clone())?;
        Some(canonical_path(group, &resource.title, &id))
    }

    /// Published resources per version, newest version first.
    ///
    /// Entries are ordered by title; versions that published nothing are left
    /// out.
    pub fn build(
        &self,
        versions: impl IntoIterator<Item = VersionRecord>,
        resources: &[ResourceRecord],
    ) -> Vec<VersionUpdates> {
        let mut versions: Vec<VersionRecord> = versions.into_iter().collect();
        sort_versions(&mut versions);

        versions
            .into_iter()
            .filter_map(|version| {
                let mut published: Vec<&ResourceRecord> = resources
                    .iter()
                    .filter(|r| {
                        r.version_id == Some(version.slug) && r.status == Status::Published
                    })
                    .collect();
                if published.is_empty() {
                    return None;
                }

                published.sort_by(|a, b| {
                    collate(&a.title, &b.title)
                        .then_with(|| a.identity_key().cmp(&b.identity_key()))
                });

                let entries = published
                    .into_iter()
                    .map(|resource| UpdateEntry {
                        title: resource.title.clone(),
                        path: self.path_for(resource),
                        resource: resource.clone(),
                    })
                    .collect();

                Some(VersionUpdates { version, entries })
            })
            .collect()
    }
}

/// Every version with the number of resources attached to it, whatever
/// their status. Pass every resource (`ResourceStore::list_all_resources`),
/// not a filtered view.
pub fn version_listing(
    versions: impl IntoIterator<Item = VersionRecord>,
    resources: &[ResourceRecord],
) -> Vec<VersionSummary> {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for version_id in resources.iter().filter_map(|r| r.version_id) {
        *counts.entry(version_id).or_default() += 1;
    }

    let mut versions: Vec<VersionRecord> = versions.into_iter().collect();
    sort_versions(&mut versions);

    versions
        .into_iter()
        .map(|version| VersionSummary {
            resource_count: counts.get(&version.slug).copied().unwrap_or(0),
            version,
        })
        .collect()
}

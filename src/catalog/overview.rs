//! Home page group overview: every group that has resources, with counts.

use std::collections::HashMap;

use serde::Serialize;

use super::aggregate::collate;
use crate::domain::{GroupRecord, GroupScheme, GroupTranslation, ResourceRecord, StatusFilter};

/// One tile of the group overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    /// Path segment of the group page
    pub slug: String,
    pub display_name: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    /// Resources that passed the filter
    pub count: usize,
}

/// Summarize the groups present among `resources`.
///
/// Resources are keyed by `group_slug` or by legacy `group_name` depending on
/// `scheme`. Group metadata comes from `groups` (slug scheme) or
/// `translations` (legacy scheme); a key with no metadata falls back to the
/// raw key for both slug and display name.
pub fn group_overview(
    resources: &[ResourceRecord],
    groups: &[GroupRecord],
    translations: &[GroupTranslation],
    scheme: GroupScheme,
    filter: &StatusFilter,
) -> Vec<GroupSummary> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for resource in resources.iter().filter(|r| filter.allows(&r.status)) {
        let key = match scheme {
            GroupScheme::Slug => resource.group_slug.as_deref(),
            GroupScheme::Legacy => resource.group_name.as_deref(),
        };
        if let Some(key) = key.map(str::trim).filter(|k| !k.is_empty()) {
            *counts.entry(key).or_default() += 1;
        }
    }

    let mut summaries: Vec<GroupSummary> = counts
        .into_iter()
        .map(|(key, count)| {
            let metadata = match scheme {
                GroupScheme::Slug => groups.iter().find(|g| g.slug == key).cloned(),
                GroupScheme::Legacy => translations
                    .iter()
                    .find(|t| t.original_name == key)
                    .cloned()
                    .map(GroupRecord::from),
            };

            match metadata {
                Some(group) => GroupSummary {
                    display_name: group.display_name().to_string(),
                    slug: if group.slug.is_empty() {
                        key.to_string()
                    } else {
                        group.slug
                    },
                    description: group.description,
                    cover_url: group.cover_url,
                    count,
                },
                None => GroupSummary {
                    slug: key.to_string(),
                    display_name: key.to_string(),
                    description: None,
                    cover_url: None,
                    count,
                },
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        collate(&a.display_name, &b.display_name).then_with(|| a.slug.cmp(&b.slug))
    });
    summaries
}

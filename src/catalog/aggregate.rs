//! Grouping a group's resources into navigable subgroup sections.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{ResourceRecord, StatusFilter, SubgroupRecord};
use crate::identifier::anchor_id;

/// Label for resources filed under no subgroup
pub const NO_SUBGROUP: &str = "Без подгруппы";

/// One subgroup of a catalog page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSection {
    /// Subgroup display label
    pub label: String,

    /// In-page anchor derived from the label
    pub anchor: String,

    /// Resources sorted by title
    pub resources: Vec<ResourceRecord>,
}

impl CatalogSection {
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Ordered sections plus the number of resources that passed the filter
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogAggregate {
    pub sections: Vec<CatalogSection>,
    pub total: usize,
}

impl CatalogAggregate {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Whether a jump-to-section bar is worth rendering
    pub fn has_navigation(&self) -> bool {
        self.sections.len() > 1
    }

    /// Section by anchor id
    pub fn section(&self, anchor: &str) -> Option<&CatalogSection> {
        self.sections.iter().find(|s| s.anchor == anchor)
    }

    /// All resources in display order
    pub fn resources(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.sections.iter().flat_map(|s| s.resources.iter())
    }
}

/// Builds [`CatalogAggregate`]s, resolving subgroup slugs to display names
#[derive(Debug, Clone, Default)]
pub struct CatalogAggregator {
    /// subgroup slug -> display name
    subgroups: HashMap<String, String>,
}

impl CatalogAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register known subgroups; records without a display name are ignored
    pub fn with_subgroups(mut self, subgroups: impl IntoIterator<Item = SubgroupRecord>) -> Self {
        for subgroup in subgroups {
            if let Some(name) = subgroup.display_name.filter(|n| !n.trim().is_empty()) {
                self.subgroups.insert(subgroup.slug, name);
            }
        }
        self
    }

    /// Display label of the subgroup a resource is filed under
    pub fn label_for(&self, resource: &ResourceRecord) -> String {
        let slug = non_blank(&resource.subgroup_slug);

        slug.and_then(|s| self.subgroups.get(s).cloned())
            .or_else(|| non_blank(&resource.subgroup_name).map(str::to_string))
            .or_else(|| slug.map(str::to_string))
            .unwrap_or_else(|| NO_SUBGROUP.to_string())
    }

    /// Filter, group and order resources.
    ///
    /// Records the filter rejects are dropped before grouping, so they count
    /// nowhere. The result does not depend on input order.
    pub fn aggregate(
        &self,
        resources: impl IntoIterator<Item = ResourceRecord>,
        filter: &StatusFilter,
    ) -> CatalogAggregate {
        let mut labelled: Vec<(String, ResourceRecord)> = resources
            .into_iter()
            .filter(|r| filter.allows(&r.status))
            .map(|r| (self.label_for(&r), r))
            .collect();

        labelled.sort_by(|(la, a), (lb, b)| {
            collate(la, lb)
                .then_with(|| collate(&a.title, &b.title))
                .then_with(|| a.identity_key().cmp(&b.identity_key()))
        });

        let total = labelled.len();
        let mut sections: Vec<CatalogSection> = Vec::new();

        for (label, resource) in labelled {
            match sections.last_mut() {
                Some(section) if section.label == label => section.resources.push(resource),
                _ => sections.push(CatalogSection {
                    anchor: anchor_id(&label),
                    label,
                    resources: vec![resource],
                }),
            }
        }

        CatalogAggregate { sections, total }
    }
}

/// Aggregate with labels taken from the records themselves
pub fn aggregate_catalog(
    resources: impl IntoIterator<Item = ResourceRecord>,
    filter: &StatusFilter,
) -> CatalogAggregate {
    CatalogAggregator::new().aggregate(resources, filter)
}

/// Case-insensitive sort key with `ё` collating as `е`
pub fn collation_key(text: &str) -> String {
    text.trim().to_lowercase().replace('ё', "е")
}

/// Collation order, falling back to the raw strings so it stays total
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;

    fn resource(title: &str, subgroup: Option<&str>, slug: i64) -> ResourceRecord {
        let record = ResourceRecord::new(title).with_slug(slug).with_group("tools");
        match subgroup {
            Some(name) => record.with_subgroup_name(name),
            None => record,
        }
    }

    fn sample() -> Vec<ResourceRecord> {
        vec![
            resource("Figma", Some("Графика"), 1),
            resource("Penpot", Some("Графика"), 2),
            resource("Ёлка", Some("Тренажёры"), 3),
            resource("Flexbox Froggy", Some("Тренажёры"), 4),
            resource("Notion", None, 5),
            resource("Draft", Some("Графика"), 6).with_status(Status::Trash),
        ]
    }

    fn shape(aggregate: &CatalogAggregate) -> Vec<(String, Vec<String>)> {
        aggregate
            .sections
            .iter()
            .map(|s| {
                (
                    s.label.clone(),
                    s.resources.iter().map(|r| r.title.clone()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let aggregate = aggregate_catalog(Vec::new(), &StatusFilter::default());
        assert!(aggregate.is_empty());
        assert_eq!(aggregate.total, 0);
        assert!(!aggregate.has_navigation());

        // everything filtered out is the same terminal state
        let trashed = vec![resource("Gone", None, 1).with_status(Status::Trash)];
        let aggregate = aggregate_catalog(trashed, &StatusFilter::default());
        assert!(aggregate.is_empty());
        assert_eq!(aggregate.total, 0);
    }

    #[test]
    fn test_grouping_and_order() {
        let aggregate = aggregate_catalog(sample(), &StatusFilter::default());

        assert_eq!(
            shape(&aggregate),
            vec![
                (
                    "Без подгруппы".to_string(),
                    vec!["Notion".to_string()]
                ),
                (
                    "Графика".to_string(),
                    vec!["Figma".to_string(), "Penpot".to_string()]
                ),
                (
                    "Тренажёры".to_string(),
                    vec!["Flexbox Froggy".to_string(), "Ёлка".to_string()]
                ),
            ]
        );
        assert_eq!(aggregate.total, 5);
        assert!(aggregate.has_navigation());
        assert_eq!(aggregate.sections[2].anchor, "trenazhery");
        assert_eq!(aggregate.section("grafika").map(CatalogSection::len), Some(2));
    }

    #[test]
    fn test_filtered_records_count_nowhere() {
        let filter = StatusFilter::only([Status::Published, Status::Trash]);
        let aggregate = aggregate_catalog(sample(), &filter);
        assert_eq!(aggregate.total, 6);
        assert_eq!(aggregate.resources().count(), 6);

        let unknown = vec![resource("Odd", None, 9).with_status(Status::Unknown("draft".into()))];
        assert_eq!(aggregate_catalog(unknown, &StatusFilter::any_known()).total, 0);
    }

    #[test]
    fn test_order_independent_of_input() {
        let forward = aggregate_catalog(sample(), &StatusFilter::default());

        let mut reversed = sample();
        reversed.reverse();
        let backward = aggregate_catalog(reversed, &StatusFilter::default());

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_yo_collates_as_ye() {
        let records = vec![
            resource("Ёж", None, 1),
            resource("Жук", None, 2),
            resource("Еда", None, 3),
        ];
        let aggregate = aggregate_catalog(records, &StatusFilter::default());
        let titles: Vec<_> = aggregate.resources().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Еда", "Ёж", "Жук"]);
    }

    #[test]
    fn test_duplicate_titles_tie_break_on_identity() {
        let records = vec![resource("Same", None, 2), resource("Same", None, 1)];
        let aggregate = aggregate_catalog(records, &StatusFilter::default());
        let slugs: Vec<_> = aggregate.resources().map(|r| r.slug).collect();
        assert_eq!(slugs, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_label_resolution() {
        let aggregator = CatalogAggregator::new().with_subgroups([
            SubgroupRecord::new("css", "CSS-тренажёры"),
            SubgroupRecord::new("empty", " "),
        ]);

        let by_slug = ResourceRecord::new("A").with_subgroup("css");
        assert_eq!(aggregator.label_for(&by_slug), "CSS-тренажёры");

        let named = ResourceRecord::new("B")
            .with_subgroup("unknown")
            .with_subgroup_name("Прочее");
        assert_eq!(aggregator.label_for(&named), "Прочее");

        let slug_only = ResourceRecord::new("C").with_subgroup("empty");
        assert_eq!(aggregator.label_for(&slug_only), "empty");

        let bare = ResourceRecord::new("D").with_subgroup_name("  ");
        assert_eq!(aggregator.label_for(&bare), NO_SUBGROUP);
    }
}

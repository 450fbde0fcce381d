//! Catalog resources and their store row shape.
//!
//! The store has gone through several schema generations, so a row may carry
//! any mix of the identity and classification columns. [`ResourceRow`] is the
//! lenient wire/row shape; [`ResourceRecord`] is the normalized form the rest
//! of the crate works with.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::status::Status;
use super::taxonomy::GroupKey;

/// Number of related-link slots a row can carry
pub const LINK_SLOTS: usize = 5;

/// Image shown when a resource has no screenshot
pub const PLACEHOLDER_SCREENSHOT: &str = "/placeholder.svg?height=630&width=1200";

/// A related link taken from a complete `(url_i, url_title_i)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLink {
    pub title: String,
    pub url: String,
}

/// A resource row exactly as the store returns it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResourceRow {
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub slug: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub row_number: Option<i64>,
    pub short_id: Option<String>,

    pub group_name: Option<String>,
    pub group_slug: Option<String>,
    pub subgroup_name: Option<String>,
    pub subgroup_slug: Option<String>,
    pub subsubgroup_slug: Option<String>,

    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub title_ai: Option<String>,
    pub description_ai: Option<String>,
    pub author_ai: Option<String>,
    pub summary_ai: Option<String>,
    pub comment: Option<String>,

    pub url_1: Option<String>,
    pub url_title_1: Option<String>,
    pub url_2: Option<String>,
    pub url_title_2: Option<String>,
    pub url_3: Option<String>,
    pub url_title_3: Option<String>,
    pub url_4: Option<String>,
    pub url_title_4: Option<String>,
    pub url_5: Option<String>,
    pub url_title_5: Option<String>,

    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub published: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,

    pub status_slug: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub version_id: Option<i64>,
    pub screenshot_url: Option<String>,
}

impl ResourceRow {
    fn link_slots(&self) -> [(&Option<String>, &Option<String>); LINK_SLOTS] {
        [
            (&self.url_1, &self.url_title_1),
            (&self.url_2, &self.url_title_2),
            (&self.url_3, &self.url_title_3),
            (&self.url_4, &self.url_title_4),
            (&self.url_5, &self.url_title_5),
        ]
    }
}

/// Normalized catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// UUID primary key (earliest generation)
    pub id: Option<Uuid>,

    /// Numeric primary key, formerly `row_number`
    pub slug: Option<i64>,

    /// Compact public identifier
    pub short_id: Option<String>,

    /// Legacy free-text group
    pub group_name: Option<String>,
    pub group_slug: Option<String>,
    /// Legacy free-text subgroup
    pub subgroup_name: Option<String>,
    pub subgroup_slug: Option<String>,
    pub subsubgroup_slug: Option<String>,

    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub title_ai: Option<String>,
    pub description_ai: Option<String>,
    pub author_ai: Option<String>,
    pub summary_ai: Option<String>,
    pub comment: Option<String>,

    /// Complete link pairs, in slot order
    #[serde(default)]
    pub links: Vec<RelatedLink>,

    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub published: Option<NaiveDate>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,

    pub status: Status,
    pub version_id: Option<i64>,

    /// Explicit screenshot, used when no numeric slug is available
    pub screenshot_url: Option<String>,
}

impl From<ResourceRow> for ResourceRecord {
    fn from(row: ResourceRow) -> Self {
        let links = row
            .link_slots()
            .into_iter()
            .filter_map(|(url, title)| match (non_empty(url), non_empty(title)) {
                (Some(url), Some(title)) => Some(RelatedLink {
                    title: title.to_string(),
                    url: url.to_string(),
                }),
                _ => None,
            })
            .collect();

        let id = row.id.as_deref().and_then(|raw| match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::debug!(id = raw, "Ignoring non-UUID primary key");
                None
            }
        });

        Self {
            id,
            slug: row.slug.or(row.row_number),
            short_id: row.short_id.filter(|s| !s.is_empty()),
            group_name: row.group_name,
            group_slug: row.group_slug,
            subgroup_name: row.subgroup_name,
            subgroup_slug: row.subgroup_slug,
            subsubgroup_slug: row.subsubgroup_slug,
            title: row.title.unwrap_or_default(),
            description: row.description,
            author: row.author,
            title_ai: row.title_ai,
            description_ai: row.description_ai,
            author_ai: row.author_ai,
            summary_ai: row.summary_ai,
            comment: row.comment,
            links,
            start_date: row.start_date.as_deref().and_then(parse_timestamp),
            end_date: row.end_date.as_deref().and_then(parse_timestamp),
            published: row.published.as_deref().and_then(parse_date),
            created_at: row.created_at.as_deref().and_then(parse_timestamp),
            updated_at: row.updated_at.as_deref().and_then(parse_timestamp),
            status: row
                .status_slug
                .as_deref()
                .map(Status::from_slug)
                .unwrap_or_else(|| Status::Unknown(String::new())),
            version_id: row.version_id,
            screenshot_url: row.screenshot_url.filter(|s| !s.is_empty()),
        }
    }
}

impl ResourceRecord {
    /// Create a bare record with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            slug: None,
            short_id: None,
            group_name: None,
            group_slug: None,
            subgroup_name: None,
            subgroup_slug: None,
            subsubgroup_slug: None,
            title: title.into(),
            description: None,
            author: None,
            title_ai: None,
            description_ai: None,
            author_ai: None,
            summary_ai: None,
            comment: None,
            links: Vec::new(),
            start_date: None,
            end_date: None,
            published: None,
            created_at: None,
            updated_at: None,
            status: Status::Published,
            version_id: None,
            screenshot_url: None,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_slug(mut self, slug: i64) -> Self {
        self.slug = Some(slug);
        self
    }

    pub fn with_short_id(mut self, short_id: impl Into<String>) -> Self {
        self.short_id = Some(short_id.into());
        self
    }

    pub fn with_group(mut self, group_slug: impl Into<String>) -> Self {
        self.group_slug = Some(group_slug.into());
        self
    }

    pub fn with_group_name(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = Some(group_name.into());
        self
    }

    pub fn with_subgroup(mut self, subgroup_slug: impl Into<String>) -> Self {
        self.subgroup_slug = Some(subgroup_slug.into());
        self
    }

    pub fn with_subgroup_name(mut self, subgroup_name: impl Into<String>) -> Self {
        self.subgroup_name = Some(subgroup_name.into());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_version(mut self, version_id: i64) -> Self {
        self.version_id = Some(version_id);
        self
    }

    /// Title to show: the AI override when present
    pub fn display_title(&self) -> &str {
        prefer(&self.title_ai).unwrap_or(&self.title)
    }

    pub fn display_description(&self) -> Option<&str> {
        prefer(&self.description_ai).or_else(|| prefer(&self.description))
    }

    pub fn display_author(&self) -> Option<&str> {
        prefer(&self.author_ai).or_else(|| prefer(&self.author))
    }

    /// Whether this record is filed under the given group
    pub fn belongs_to(&self, group: &GroupKey) -> bool {
        match group {
            GroupKey::Slug(slug) => self.group_slug.as_deref() == Some(slug.as_str()),
            GroupKey::LegacyName(name) => self.group_name.as_deref() == Some(name.as_str()),
        }
    }

    /// Screenshot location.
    ///
    /// Resources with a numeric slug have their screenshot in the public
    /// `screenshots` bucket; otherwise the stored URL, otherwise a placeholder.
    pub fn screenshot_url(&self, public_url: Option<&str>) -> String {
        match (self.slug, public_url) {
            (Some(slug), Some(base)) => format!(
                "{}/storage/v1/object/public/screenshots/{}.webp",
                base.trim_end_matches('/'),
                slug
            ),
            _ => self
                .screenshot_url
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_SCREENSHOT.to_string()),
        }
    }

    /// Stable identity used to break ordering ties
    pub(crate) fn identity_key(&self) -> (Option<i64>, Option<&str>, Option<Uuid>) {
        (self.slug, self.short_id.as_deref(), self.id)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn prefer(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Parse a store timestamp (`timestamp without time zone`, RFC 3339 or a bare date)
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    tracing::debug!(value = raw, "Unparseable timestamp treated as absent");
    None
}

/// Parse a store date; a full timestamp is truncated to its date
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|ts| ts.date()))
}

/// Accept integers, numeric strings and null for numeric identity columns
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_consumes_only_complete_link_pairs() {
        let row = ResourceRow {
            title: Some("Figma".to_string()),
            url_1: Some("https://figma.com".to_string()),
            url_title_1: Some("Site".to_string()),
            url_2: Some("https://figma.com/docs".to_string()),
            url_3: None,
            url_title_3: Some("Orphan title".to_string()),
            url_4: Some("https://figma.com/blog".to_string()),
            url_title_4: Some("  ".to_string()),
            url_5: Some("https://figma.com/community".to_string()),
            url_title_5: Some("Community".to_string()),
            ..Default::default()
        };

        let record = ResourceRecord::from(row);
        assert_eq!(
            record.links,
            vec![
                RelatedLink {
                    title: "Site".to_string(),
                    url: "https://figma.com".to_string()
                },
                RelatedLink {
                    title: "Community".to_string(),
                    url: "https://figma.com/community".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_row_accepts_every_generation() {
        let legacy: ResourceRow = serde_json::from_str(
            r#"{"id": "123e4567-e89b-12d3-a456-426614174000", "row_number": 101,
                "group_name": "Тренажёры", "title": "Grid Garden", "status_slug": "published"}"#,
        )
        .unwrap();
        let record = ResourceRecord::from(legacy);
        assert_eq!(record.slug, Some(101));
        assert!(record.id.is_some());
        assert_eq!(record.group_name.as_deref(), Some("Тренажёры"));

        let current: ResourceRow = serde_json::from_str(
            r#"{"slug": "42", "short_id": "aZ3k", "group_slug": "trainers",
                "title": "Flexbox Froggy", "status_slug": "mystery"}"#,
        )
        .unwrap();
        let record = ResourceRecord::from(current);
        assert_eq!(record.slug, Some(42));
        assert_eq!(record.short_id.as_deref(), Some("aZ3k"));
        assert_eq!(record.status, Status::Unknown("mystery".to_string()));
    }

    #[test]
    fn test_timestamps_are_lenient() {
        assert!(parse_timestamp("2024-03-01T10:15:00").is_some());
        assert!(parse_timestamp("2024-03-01 10:15:00.123").is_some());
        assert!(parse_timestamp("2024-03-01T10:15:00+03:00").is_some());
        assert!(parse_timestamp("2024-03-01").is_some());
        assert!(parse_timestamp("yesterday").is_none());
        assert_eq!(
            parse_date("2024-03-01T10:15:00"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_display_prefers_ai_overrides() {
        let mut record = ResourceRecord::new("Raw title");
        record.description = Some("Raw description".to_string());
        assert_eq!(record.display_title(), "Raw title");

        record.title_ai = Some("Better title".to_string());
        record.description_ai = Some("".to_string());
        assert_eq!(record.display_title(), "Better title");
        assert_eq!(record.display_description(), Some("Raw description"));
    }

    #[test]
    fn test_screenshot_fallbacks() {
        let base = Some("https://project.supabase.co/");

        let numbered = ResourceRecord::new("A").with_slug(7);
        assert_eq!(
            numbered.screenshot_url(base),
            "https://project.supabase.co/storage/v1/object/public/screenshots/7.webp"
        );

        let mut explicit = ResourceRecord::new("B");
        explicit.screenshot_url = Some("https://cdn.example/b.png".to_string());
        assert_eq!(explicit.screenshot_url(base), "https://cdn.example/b.png");

        let bare = ResourceRecord::new("C");
        assert_eq!(bare.screenshot_url(base), PLACEHOLDER_SCREENSHOT);
    }

    #[test]
    fn test_belongs_to_group_key() {
        let record = ResourceRecord::new("A")
            .with_group("trainers")
            .with_group_name("Тренажёры");

        assert!(record.belongs_to(&GroupKey::Slug("trainers".to_string())));
        assert!(record.belongs_to(&GroupKey::LegacyName("Тренажёры".to_string())));
        assert!(!record.belongs_to(&GroupKey::Slug("communities".to_string())));
    }
}

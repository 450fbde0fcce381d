//! Dimension records: groups, subgroups, statuses and release versions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which group column a deployment files resources under
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupScheme {
    /// `resources.group_slug` references `groups.slug`
    #[default]
    Slug,

    /// `resources.group_name` holds free text bridged by `group_translations`
    Legacy,
}

impl std::str::FromStr for GroupScheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "slug" => Ok(GroupScheme::Slug),
            "legacy" | "name" => Ok(GroupScheme::Legacy),
            _ => anyhow::bail!("Unknown group scheme: {}", s),
        }
    }
}

/// The group a request claims a resource belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Slug(String),
    LegacyName(String),
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupKey::Slug(slug) => write!(f, "slug:{}", slug),
            GroupKey::LegacyName(name) => write!(f, "name:{}", name),
        }
    }
}

/// A top-level group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub slug: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,

    /// Free-text name, set when the group was found through a translation
    #[serde(default)]
    pub original_name: Option<String>,
}

impl GroupRecord {
    pub fn new(slug: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            display_name: Some(display_name.into()),
            description: None,
            cover_url: None,
            original_name: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.slug)
    }

    /// Key resources must carry to belong here.
    ///
    /// Returns `None` for the legacy scheme when the group has no translation,
    /// since no resource can be matched against it.
    pub fn key(&self, scheme: GroupScheme) -> Option<GroupKey> {
        match scheme {
            GroupScheme::Slug => Some(GroupKey::Slug(self.slug.clone())),
            GroupScheme::Legacy => self.original_name.clone().map(GroupKey::LegacyName),
        }
    }
}

/// Legacy mapping from a free-text group name to its slug
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTranslation {
    pub original_name: String,
    pub slug: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl From<GroupTranslation> for GroupRecord {
    fn from(t: GroupTranslation) -> Self {
        Self {
            slug: t.slug,
            display_name: Some(t.display_name),
            description: t.description,
            cover_url: t.cover_url,
            original_name: Some(t.original_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgroupRecord {
    pub slug: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl SubgroupRecord {
    pub fn new(slug: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            display_name: Some(display_name.into()),
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsubgroupRecord {
    pub slug: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A release batch for the updates feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Numeric key (formerly `id`)
    pub slug: i64,
    pub version: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
}

impl VersionRecord {
    pub fn new(slug: i64, version: impl Into<String>) -> Self {
        Self {
            slug,
            version: version.into(),
            display_name: None,
            description: None,
            release_date: None,
        }
    }

    pub fn released(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }
}

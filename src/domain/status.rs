//! Publication lifecycle of a resource.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a resource (`status_slug` in the store)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// Visible in the public catalog
    Published,

    /// Listed and usable, but not part of the main feed
    Available,

    /// Announced, not yet usable
    ComingSoon,

    /// Kept for history, hidden from public views
    Archived,

    /// Scheduled for removal
    Trash,

    /// Anything the store holds outside the closed set; always unpublished
    Unknown(String),
}

impl Status {
    /// Every known status, in lifecycle order
    pub const KNOWN: [Status; 5] = [
        Status::Published,
        Status::Available,
        Status::ComingSoon,
        Status::Archived,
        Status::Trash,
    ];

    /// Parse a store slug. Never fails: unrecognized values become `Unknown`.
    pub fn from_slug(slug: &str) -> Self {
        match slug.trim() {
            "published" => Status::Published,
            "available" => Status::Available,
            "coming-soon" => Status::ComingSoon,
            "archived" => Status::Archived,
            "trash" => Status::Trash,
            other => Status::Unknown(other.to_string()),
        }
    }

    /// The slug as stored
    pub fn as_slug(&self) -> &str {
        match self {
            Status::Published => "published",
            Status::Available => "available",
            Status::ComingSoon => "coming-soon",
            Status::Archived => "archived",
            Status::Trash => "trash",
            Status::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Status::Unknown(_))
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        Status::from_slug(&s)
    }
}

impl From<Status> for String {
    fn from(s: Status) -> Self {
        s.as_slug().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

impl std::str::FromStr for Status {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match Status::from_slug(s) {
            Status::Unknown(raw) => anyhow::bail!("Unknown status: {}", raw),
            status => Ok(status),
        }
    }
}

/// Set of statuses a view accepts.
///
/// Only known statuses can be admitted; an `Unknown` status never passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFilter {
    allowed: Vec<Status>,
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::published_only()
    }
}

impl StatusFilter {
    /// The public view: published resources only
    pub fn published_only() -> Self {
        Self {
            allowed: vec![Status::Published],
        }
    }

    /// Every known status (admin views)
    pub fn any_known() -> Self {
        Self {
            allowed: Status::KNOWN.to_vec(),
        }
    }

    /// Accept exactly the given statuses; unknown ones are dropped
    pub fn only(statuses: impl IntoIterator<Item = Status>) -> Self {
        let mut allowed: Vec<Status> = statuses.into_iter().filter(Status::is_known).collect();
        allowed.sort();
        allowed.dedup();
        Self { allowed }
    }

    pub fn allows(&self, status: &Status) -> bool {
        status.is_known() && self.allowed.contains(status)
    }

    /// Slugs of the admitted statuses, for building store queries
    pub fn slugs(&self) -> Vec<&str> {
        self.allowed.iter().map(Status::as_slug).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

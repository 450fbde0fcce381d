//! Identifier schemes and the lookup cascade derived from a path segment.
//!
//! Four generations of resource URLs are still in circulation:
//!
//! | Scheme      | Example                                  | Lookup             |
//! |-------------|------------------------------------------|--------------------|
//! | `Uuid`      | `123e4567-e89b-12d3-a456-426614174000`   | primary key (UUID) |
//! | `Composite` | `grid-garden-302`                        | trailing id        |
//! | `Numeric`   | `302`                                    | primary key        |
//! | `ShortId`   | `aZ3k9`                                  | short id           |
//!
//! Classification is purely syntactic; whether a record exists is up to the
//! store.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::seo::extract_trailing_id;

/// How a segment was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    Uuid,
    Composite,
    Numeric,
    ShortId,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Uuid => write!(f, "uuid"),
            Scheme::Composite => write!(f, "composite"),
            Scheme::Numeric => write!(f, "numeric"),
            Scheme::ShortId => write!(f, "short_id"),
        }
    }
}

/// What the trailing id of a composite segment refers to in this deployment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingIdScheme {
    /// The numeric primary key (`slug`, formerly `row_number`)
    #[default]
    Numeric,

    /// The compact `short_id`
    ShortId,
}

impl std::str::FromStr for TrailingIdScheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "numeric" | "slug" => Ok(TrailingIdScheme::Numeric),
            "short_id" | "short" => Ok(TrailingIdScheme::ShortId),
            _ => anyhow::bail!("Unknown trailing id scheme: {}", s),
        }
    }
}

/// Primary key of a resource in either of its generations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimaryKey {
    Uuid(Uuid),
    Numeric(i64),
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimaryKey::Uuid(id) => write!(f, "{}", id),
            PrimaryKey::Numeric(n) => write!(f, "{}", n),
        }
    }
}

/// A single store query to try
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    PrimaryKey(PrimaryKey),
    ShortId(String),
}

impl Lookup {
    /// Canonical key the query is issued with
    pub fn key(&self) -> String {
        match self {
            Lookup::PrimaryKey(pk) => pk.to_string(),
            Lookup::ShortId(id) => id.clone(),
        }
    }
}

/// One step of the resolution cascade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub scheme: Scheme,
    pub lookup: Lookup,
}

impl Candidate {
    fn new(scheme: Scheme, lookup: Lookup) -> Self {
        Self { scheme, lookup }
    }
}

/// Canonical 8-4-4-4-12 hexadecimal form, any case
pub fn is_canonical_uuid(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 36
        && bytes.iter().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => *b == b'-',
            _ => b.is_ascii_hexdigit(),
        })
}

/// Digits only, fitting an `i64`
fn parse_numeric(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// First scheme the segment structurally matches, `None` when empty
pub fn classify(segment: &str) -> Option<Scheme> {
    let segment = segment.trim();
    if segment.is_empty() {
        None
    } else if is_canonical_uuid(segment) {
        Some(Scheme::Uuid)
    } else if segment.contains('-') {
        Some(Scheme::Composite)
    } else if parse_numeric(segment).is_some() {
        Some(Scheme::Numeric)
    } else {
        Some(Scheme::ShortId)
    }
}

/// Ordered store lookups for a segment.
///
/// - A UUID is looked up once, by primary key, and nothing else.
/// - A hyphenated segment tries its trailing id (per `trailing`), then the
///   whole segment as a short id, since short ids may contain hyphens.
/// - A bare numeric segment tries the numeric key, then the same text as a
///   short id.
/// - Anything else is a short id.
pub fn candidates(segment: &str, trailing: TrailingIdScheme) -> Vec<Candidate> {
    let segment = segment.trim();

    match classify(segment) {
        None => Vec::new(),
        Some(Scheme::Uuid) => match Uuid::parse_str(segment) {
            Ok(id) => vec![Candidate::new(
                Scheme::Uuid,
                Lookup::PrimaryKey(PrimaryKey::Uuid(id)),
            )],
            Err(_) => vec![Candidate::new(
                Scheme::ShortId,
                Lookup::ShortId(segment.to_string()),
            )],
        },
        Some(Scheme::Composite) => {
            let mut steps = Vec::with_capacity(2);
            let trailing_id = extract_trailing_id(segment);
            if !trailing_id.is_empty() {
                let lookup = match (trailing, parse_numeric(trailing_id)) {
                    (TrailingIdScheme::Numeric, Some(n)) => {
                        Lookup::PrimaryKey(PrimaryKey::Numeric(n))
                    }
                    _ => Lookup::ShortId(trailing_id.to_string()),
                };
                steps.push(Candidate::new(Scheme::Composite, lookup));
            }
            steps.push(Candidate::new(
                Scheme::ShortId,
                Lookup::ShortId(segment.to_string()),
            ));
            steps
        }
        Some(Scheme::Numeric) => {
            let mut steps = Vec::with_capacity(2);
            if let Some(n) = parse_numeric(segment) {
                steps.push(Candidate::new(
                    Scheme::Numeric,
                    Lookup::PrimaryKey(PrimaryKey::Numeric(n)),
                ));
            }
            steps.push(Candidate::new(
                Scheme::ShortId,
                Lookup::ShortId(segment.to_string()),
            ));
            steps
        }
        Some(Scheme::ShortId) => vec![Candidate::new(
            Scheme::ShortId,
            Lookup::ShortId(segment.to_string()),
        )],
    }
}

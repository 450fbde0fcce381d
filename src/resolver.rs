//! Resource resolution across identifier generations.
//!
//! A path segment is turned into an ordered list of store lookups
//! ([`crate::identifier::candidates`]) which are tried in turn; the first
//! record found wins. A record filed under a different group than the one
//! in the request path resolves to [`Resolution::NotFound`], the same outcome
//! as a missing record.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::domain::{GroupKey, GroupScheme, ResourceRecord};
use crate::identifier::{candidates, Lookup, Scheme, TrailingIdScheme};
use crate::store::{ResourceStore, StoreError};

/// Errors that can occur while resolving a resource
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Malformed identifier: {0:?}")]
    MalformedInput(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

/// A segment that resolved to a record in the requested group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedReference {
    /// Key the successful lookup was issued with
    pub key: String,

    /// Scheme the segment was interpreted under
    pub scheme: Scheme,

    pub resource: ResourceRecord,
}

/// Outcome of a resolution. Not finding a resource is an ordinary result.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(ResolvedReference),
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn found(self) -> Option<ResolvedReference> {
        match self {
            Resolution::Found(reference) => Some(reference),
            Resolution::NotFound => None,
        }
    }
}

/// Schema generation a deployment runs on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverSettings {
    pub group_scheme: GroupScheme,
    pub trailing_id: TrailingIdScheme,
}

/// Resolve `segment` to a resource of `group`.
///
/// Empty segments are `MalformedInput`; store failures are passed through.
pub async fn resolve_resource<S>(
    store: &S,
    segment: &str,
    group: &GroupKey,
    trailing_id: TrailingIdScheme,
) -> Result<Resolution, ResolveError>
where
    S: ResourceStore + ?Sized,
{
    let segment = segment.trim();
    if segment.is_empty() {
        return Err(ResolveError::MalformedInput(segment.to_string()));
    }

    for candidate in candidates(segment, trailing_id) {
        debug!(scheme = %candidate.scheme, key = %candidate.lookup.key(), "Trying lookup");

        let record = match &candidate.lookup {
            Lookup::PrimaryKey(key) => store.find_by_primary_key(key).await?,
            Lookup::ShortId(id) => store.find_by_short_id(id).await?,
        };

        let Some(resource) = record else {
            continue;
        };

        if !resource.belongs_to(group) {
            debug!(%group, "Resource found outside the requested group");
            return Ok(Resolution::NotFound);
        }

        return Ok(Resolution::Found(ResolvedReference {
            key: candidate.lookup.key(),
            scheme: candidate.scheme,
            resource,
        }));
    }

    Ok(Resolution::NotFound)
}

/// Resolver bound to a store and a schema generation
pub struct Resolver<'a, S: ResourceStore + ?Sized> {
    store: &'a S,
    settings: ResolverSettings,
}

impl<'a, S: ResourceStore + ?Sized> Resolver<'a, S> {
    pub fn new(store: &'a S, settings: ResolverSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> ResolverSettings {
        self.settings
    }

    /// Resolve a segment against an already-known group key
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn resolve_resource(
        &self,
        segment: &str,
        group: &GroupKey,
    ) -> Result<Resolution, ResolveError> {
        resolve_resource(self.store, segment, group, self.settings.trailing_id).await
    }

    /// Resolve a `/{group_slug}/{segment}` request path.
    ///
    /// The group is looked up by slug (or legacy translation) first; an
    /// unknown group is `NotFound`.
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn resolve_in_group(
        &self,
        group_slug: &str,
        segment: &str,
    ) -> Result<Resolution, ResolveError> {
        if segment.trim().is_empty() {
            return Err(ResolveError::MalformedInput(segment.to_string()));
        }

        let Some(group) = self
            .store
            .find_group_by_slug_or_translation(group_slug)
            .await?
        else {
            debug!("Unknown group");
            return Ok(Resolution::NotFound);
        };

        let Some(key) = group.key(self.settings.group_scheme) else {
            warn!(
                group = %group.slug,
                "Group has no legacy translation; nothing can resolve under it"
            );
            return Ok(Resolution::NotFound);
        };

        self.resolve_resource(segment, &key).await
    }
}

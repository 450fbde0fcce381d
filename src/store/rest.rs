//! Hosted catalog database over its PostgREST interface.
//!
//! Every query is a `GET {url}/rest/v1/{table}` with column filters in the
//! query string (`slug=eq.42`, `status_slug=in.(published)`), authenticated
//! with the project's API key.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{merge_translation, ResourceStore, StoreError};
use crate::domain::{
    GroupKey, GroupRecord, GroupTranslation, ResourceRecord, ResourceRow, StatusFilter,
    StatusRecord, SubgroupRecord, SubsubgroupRecord, VersionRecord,
};
use crate::identifier::PrimaryKey;

/// Connection settings for the hosted store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestStoreConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Anonymous (read-only) API key
    pub api_key: String,
}

type Query = Vec<(&'static str, String)>;

/// PostgreSQL `undefined_column`, returned when a filter names a column the
/// current schema generation dropped
const UNDEFINED_COLUMN: &str = "42703";

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
}

fn is_undefined_column(status: u16, body: &str) -> bool {
    status == StatusCode::BAD_REQUEST.as_u16()
        && serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.code)
            .as_deref()
            == Some(UNDEFINED_COLUMN)
}

/// REST client for the hosted catalog
pub struct RestStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RestStore {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: RestStoreConfig) -> Self {
        Self::new(config.url, config.api_key)
    }

    /// Build table URL
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&'static str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let url = self.table_url(table);
        debug!(table, ?query, "REST select");

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Select from a dimension table that older generations may not have
    async fn select_if_present<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&'static str, String)],
    ) -> Result<Vec<T>, StoreError> {
        match self.select(table, query).await {
            Err(StoreError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                debug!(table, "Table not present in this schema generation");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    async fn select_resources(&self, query: &[(&'static str, String)]) -> Result<Vec<ResourceRecord>, StoreError> {
        let rows: Vec<ResourceRow> = self.select("resources", query).await?;
        Ok(rows.into_iter().map(ResourceRecord::from).collect())
    }

    /// Single-resource lookup. A filter on a column this schema generation
    /// lacks matches nothing.
    async fn first_resource(&self, query: Query) -> Result<Option<ResourceRecord>, StoreError> {
        let mut query = query;
        query.push(("limit", "1".to_string()));
        match self.select_resources(&query).await {
            Ok(rows) => Ok(rows.into_iter().next()),
            Err(StoreError::Api { status, body }) if is_undefined_column(status, &body) => {
                debug!(?query, "Lookup column not present in this schema generation");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

fn select_all() -> Query {
    vec![("select", "*".to_string())]
}

fn status_param(filter: &StatusFilter) -> (&'static str, String) {
    ("status_slug", format!("in.({})", filter.slugs().join(",")))
}

fn primary_key_param(key: &PrimaryKey) -> (&'static str, String) {
    match key {
        PrimaryKey::Uuid(id) => ("id", eq(id)),
        PrimaryKey::Numeric(n) => ("slug", eq(n)),
    }
}

fn group_param(group: &GroupKey) -> (&'static str, String) {
    match group {
        GroupKey::Slug(slug) => ("group_slug", eq(slug)),
        GroupKey::LegacyName(name) => ("group_name", eq(name)),
    }
}

#[async_trait]
impl ResourceStore for RestStore {
    fn name(&self) -> &str {
        "rest"
    }

    async fn find_by_primary_key(
        &self,
        key: &PrimaryKey,
    ) -> Result<Option<ResourceRecord>, StoreError> {
        let mut query = select_all();
        query.push(primary_key_param(key));
        self.first_resource(query).await
    }

    async fn find_by_short_id(
        &self,
        short_id: &str,
    ) -> Result<Option<ResourceRecord>, StoreError> {
        let mut query = select_all();
        query.push(("short_id", eq(short_id)));
        self.first_resource(query).await
    }

    async fn list_by_group(
        &self,
        group: &GroupKey,
        filter: &StatusFilter,
    ) -> Result<Vec<ResourceRecord>, StoreError> {
        if filter.is_empty() {
            return Ok(Vec::new());
        }
        let mut query = select_all();
        query.push(group_param(group));
        query.push(status_param(filter));
        query.push(("order", "title.asc".to_string()));
        self.select_resources(&query).await
    }

    async fn find_group_by_slug_or_translation(
        &self,
        slug: &str,
    ) -> Result<Option<GroupRecord>, StoreError> {
        let query: Query = vec![
            ("select", "*".to_string()),
            ("slug", eq(slug)),
            ("limit", "1".to_string()),
        ];
        let group: Vec<GroupRecord> = self.select_if_present("groups", &query).await?;
        let translation: Vec<GroupTranslation> =
            self.select_if_present("group_translations", &query).await?;

        Ok(merge_translation(
            group.into_iter().next(),
            translation.into_iter().next(),
        ))
    }

    async fn list_resources(
        &self,
        filter: &StatusFilter,
    ) -> Result<Vec<ResourceRecord>, StoreError> {
        if filter.is_empty() {
            return Ok(Vec::new());
        }
        let mut query = select_all();
        query.push(status_param(filter));
        self.select_resources(&query).await
    }

    async fn list_all_resources(&self) -> Result<Vec<ResourceRecord>, StoreError> {
        self.select_resources(&select_all()).await
    }

    async fn list_by_version(
        &self,
        version: i64,
        filter: &StatusFilter,
    ) -> Result<Vec<ResourceRecord>, StoreError> {
        if filter.is_empty() {
            return Ok(Vec::new());
        }
        let mut query = select_all();
        query.push(("version_id", eq(version)));
        query.push(status_param(filter));
        query.push(("order", "title.asc".to_string()));
        self.select_resources(&query).await
    }

    async fn list_groups(&self) -> Result<Vec<GroupRecord>, StoreError> {
        self.select_if_present("groups", &select_all()).await
    }

    async fn list_translations(&self) -> Result<Vec<GroupTranslation>, StoreError> {
        let query: Query = vec![
            ("select", "*".to_string()),
            ("order", "display_name.asc".to_string()),
        ];
        self.select_if_present("group_translations", &query).await
    }

    async fn list_subgroups(&self) -> Result<Vec<SubgroupRecord>, StoreError> {
        self.select_if_present("subgroups", &select_all()).await
    }

    async fn list_subsubgroups(&self) -> Result<Vec<SubsubgroupRecord>, StoreError> {
        self.select_if_present("subsubgroups", &select_all()).await
    }

    async fn list_statuses(&self) -> Result<Vec<StatusRecord>, StoreError> {
        self.select_if_present("statuses", &select_all()).await
    }

    async fn list_versions(&self) -> Result<Vec<VersionRecord>, StoreError> {
        let query: Query = vec![
            ("select", "*".to_string()),
            ("order", "release_date.desc".to_string()),
        ];
        self.select_if_present("versions", &query).await
    }
}

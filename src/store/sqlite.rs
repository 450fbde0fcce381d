//! SQLite snapshot of the catalog tables.
//!
//! The schema is the union of every generation's columns, so snapshots taken
//! before and after the slug migration can be opened alike. The store never
//! writes resource data; [`SCHEMA`] is applied idempotently on open.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use tracing::{debug, warn};

use super::{merge_translation, ResourceStore, StoreError};
use crate::domain::{
    resource::parse_date, GroupKey, GroupRecord, GroupTranslation, ResourceRecord, ResourceRow,
    StatusFilter, StatusRecord, SubgroupRecord, SubsubgroupRecord, VersionRecord,
};
use crate::identifier::PrimaryKey;

/// Catalog tables
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS resources (
    id TEXT,
    slug INTEGER,
    row_number INTEGER,
    short_id TEXT,
    group_name TEXT,
    group_slug TEXT,
    subgroup_name TEXT,
    subgroup_slug TEXT,
    subsubgroup_slug TEXT,
    title TEXT NOT NULL DEFAULT '',
    description TEXT,
    author TEXT,
    title_ai TEXT,
    description_ai TEXT,
    author_ai TEXT,
    summary_ai TEXT,
    comment TEXT,
    url_1 TEXT, url_title_1 TEXT,
    url_2 TEXT, url_title_2 TEXT,
    url_3 TEXT, url_title_3 TEXT,
    url_4 TEXT, url_title_4 TEXT,
    url_5 TEXT, url_title_5 TEXT,
    start_date TEXT,
    end_date TEXT,
    published TEXT,
    created_at TEXT,
    updated_at TEXT,
    status_slug TEXT,
    version_id INTEGER,
    screenshot_url TEXT
);
CREATE UNIQUE INDEX IF NOT EXISTS resources_slug ON resources (slug);
CREATE UNIQUE INDEX IF NOT EXISTS resources_short_id ON resources (short_id);
CREATE INDEX IF NOT EXISTS resources_group_slug ON resources (group_slug);
CREATE INDEX IF NOT EXISTS resources_group_name ON resources (group_name);

CREATE TABLE IF NOT EXISTS groups (
    slug TEXT PRIMARY KEY,
    display_name TEXT,
    description TEXT,
    cover_url TEXT,
    updated_at TEXT
);

CREATE TABLE IF NOT EXISTS group_translations (
    original_name TEXT PRIMARY KEY,
    slug TEXT NOT NULL,
    display_name TEXT NOT NULL,
    description TEXT,
    cover_url TEXT
);

CREATE TABLE IF NOT EXISTS subgroups (
    slug TEXT PRIMARY KEY,
    display_name TEXT,
    description TEXT,
    updated_at TEXT
);

CREATE TABLE IF NOT EXISTS subsubgroups (
    slug TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    updated_at TEXT
);

CREATE TABLE IF NOT EXISTS statuses (
    slug TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    updated_at TEXT
);

CREATE TABLE IF NOT EXISTS versions (
    slug INTEGER PRIMARY KEY,
    version TEXT NOT NULL,
    display_name TEXT,
    description TEXT,
    release_date TEXT,
    created_at TEXT,
    updated_at TEXT
);
"#;

const RESOURCE_COLUMNS: &str = "id, slug, row_number, short_id, \
     group_name, group_slug, subgroup_name, subgroup_slug, subsubgroup_slug, \
     title, description, author, title_ai, description_ai, author_ai, summary_ai, comment, \
     url_1, url_title_1, url_2, url_title_2, url_3, url_title_3, \
     url_4, url_title_4, url_5, url_title_5, \
     start_date, end_date, published, created_at, updated_at, \
     status_slug, version_id, screenshot_url";

/// Log row-parse errors instead of silently discarding them
fn log_and_skip_err<T>(result: Result<T, rusqlite::Error>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Skipping unreadable row: {}", e);
            None
        }
    }
}

fn row_to_resource(row: &Row<'_>) -> rusqlite::Result<ResourceRecord> {
    let raw = ResourceRow {
        id: row.get("id")?,
        slug: row.get("slug")?,
        row_number: row.get("row_number")?,
        short_id: row.get("short_id")?,
        group_name: row.get("group_name")?,
        group_slug: row.get("group_slug")?,
        subgroup_name: row.get("subgroup_name")?,
        subgroup_slug: row.get("subgroup_slug")?,
        subsubgroup_slug: row.get("subsubgroup_slug")?,
        title: row.get("title")?,
        description: row.get("description")?,
        author: row.get("author")?,
        title_ai: row.get("title_ai")?,
        description_ai: row.get("description_ai")?,
        author_ai: row.get("author_ai")?,
        summary_ai: row.get("summary_ai")?,
        comment: row.get("comment")?,
        url_1: row.get("url_1")?,
        url_title_1: row.get("url_title_1")?,
        url_2: row.get("url_2")?,
        url_title_2: row.get("url_title_2")?,
        url_3: row.get("url_3")?,
        url_title_3: row.get("url_title_3")?,
        url_4: row.get("url_4")?,
        url_title_4: row.get("url_title_4")?,
        url_5: row.get("url_5")?,
        url_title_5: row.get("url_title_5")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
        published: row.get("published")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        status_slug: row.get("status_slug")?,
        version_id: row.get("version_id")?,
        screenshot_url: row.get("screenshot_url")?,
    };
    Ok(ResourceRecord::from(raw))
}

fn row_to_group(row: &Row<'_>) -> rusqlite::Result<GroupRecord> {
    Ok(GroupRecord {
        slug: row.get("slug")?,
        display_name: row.get("display_name")?,
        description: row.get("description")?,
        cover_url: row.get("cover_url")?,
        original_name: None,
    })
}

fn row_to_translation(row: &Row<'_>) -> rusqlite::Result<GroupTranslation> {
    Ok(GroupTranslation {
        original_name: row.get("original_name")?,
        slug: row.get("slug")?,
        display_name: row.get("display_name")?,
        description: row.get("description")?,
        cover_url: row.get("cover_url")?,
    })
}

fn row_to_version(row: &Row<'_>) -> rusqlite::Result<VersionRecord> {
    let release_date: Option<String> = row.get("release_date")?;
    Ok(VersionRecord {
        slug: row.get("slug")?,
        version: row.get("version")?,
        display_name: row.get("display_name")?,
        description: row.get("description")?,
        release_date: release_date.as_deref().and_then(parse_date),
    })
}

/// SQLite-backed catalog store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a snapshot database
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        debug!(path = %path.display(), "Opening SQLite catalog");
        Self::from_connection(Connection::open(path)?)
    }

    /// Empty in-memory catalog
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wrap an existing connection, ensuring the schema exists
    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        f(&conn)
    }

    fn find_one(
        &self,
        condition: &str,
        param: &dyn ToSql,
    ) -> Result<Option<ResourceRecord>, StoreError> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM resources WHERE {} LIMIT 1",
                RESOURCE_COLUMNS, condition
            );
            let mut stmt = conn.prepare(&sql)?;
            Ok(stmt.query_row([param], row_to_resource).optional()?)
        })
    }

    /// Resources matching `condition` whose status passes `filter`
    fn query_resources(
        &self,
        condition: Option<&str>,
        mut params_vec: Vec<Box<dyn ToSql + Send>>,
        filter: &StatusFilter,
    ) -> Result<Vec<ResourceRecord>, StoreError> {
        if filter.is_empty() {
            return Ok(Vec::new());
        }

        let slugs = filter.slugs();
        let placeholders = vec!["?"; slugs.len()].join(", ");
        let mut sql = format!(
            "SELECT {} FROM resources WHERE status_slug IN ({})",
            RESOURCE_COLUMNS, placeholders
        );
        if let Some(condition) = condition {
            sql.push_str(" AND ");
            sql.push_str(condition);
        }
        sql.push_str(" ORDER BY COALESCE(subgroup_name, subgroup_slug), title");

        let mut all_params: Vec<Box<dyn ToSql + Send>> = slugs
            .into_iter()
            .map(|s| Box::new(s.to_string()) as Box<dyn ToSql + Send>)
            .collect();
        all_params.append(&mut params_vec);

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let refs: Vec<&dyn ToSql> = all_params
                .iter()
                .map(|p| p.as_ref() as &dyn ToSql)
                .collect();
            let rows = stmt.query_map(refs.as_slice(), row_to_resource)?;
            let resources: Vec<ResourceRecord> = rows.filter_map(log_and_skip_err).collect();
            debug!(count = resources.len(), "Listed resources");
            Ok(resources)
        })
    }

    fn query_all<T>(
        &self,
        sql: &str,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map([], map)?;
            Ok(rows.filter_map(log_and_skip_err).collect())
        })
    }
}

#[async_trait]
impl ResourceStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn find_by_primary_key(
        &self,
        key: &PrimaryKey,
    ) -> Result<Option<ResourceRecord>, StoreError> {
        match key {
            // stored ids may use either case
            PrimaryKey::Uuid(id) => self.find_one("lower(id) = ?1", &id.to_string()),
            PrimaryKey::Numeric(n) => self.find_one("COALESCE(slug, row_number) = ?1", n),
        }
    }

    async fn find_by_short_id(
        &self,
        short_id: &str,
    ) -> Result<Option<ResourceRecord>, StoreError> {
        self.find_one("short_id = ?1", &short_id)
    }

    async fn list_by_group(
        &self,
        group: &GroupKey,
        filter: &StatusFilter,
    ) -> Result<Vec<ResourceRecord>, StoreError> {
        let (condition, value) = match group {
            GroupKey::Slug(slug) => ("group_slug = ?", slug.clone()),
            GroupKey::LegacyName(name) => ("group_name = ?", name.clone()),
        };
        self.query_resources(
            Some(condition),
            vec![Box::new(value) as Box<dyn ToSql + Send>],
            filter,
        )
    }

    async fn find_group_by_slug_or_translation(
        &self,
        slug: &str,
    ) -> Result<Option<GroupRecord>, StoreError> {
        self.with_conn(|conn| {
            let group = conn
                .query_row(
                    "SELECT slug, display_name, description, cover_url FROM groups WHERE slug = ?1",
                    params![slug],
                    row_to_group,
                )
                .optional()?;

            let translation = conn
                .query_row(
                    "SELECT original_name, slug, display_name, description, cover_url \
                     FROM group_translations WHERE slug = ?1",
                    params![slug],
                    row_to_translation,
                )
                .optional()?;

            Ok(merge_translation(group, translation))
        })
    }

    async fn list_resources(
        &self,
        filter: &StatusFilter,
    ) -> Result<Vec<ResourceRecord>, StoreError> {
        self.query_resources(None, Vec::new(), filter)
    }

    async fn list_all_resources(&self) -> Result<Vec<ResourceRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM resources ORDER BY COALESCE(slug, row_number)",
            RESOURCE_COLUMNS
        );
        self.query_all(&sql, row_to_resource)
    }

    async fn list_by_version(
        &self,
        version: i64,
        filter: &StatusFilter,
    ) -> Result<Vec<ResourceRecord>, StoreError> {
        self.query_resources(
            Some("version_id = ?"),
            vec![Box::new(version) as Box<dyn ToSql + Send>],
            filter,
        )
    }

    async fn list_groups(&self) -> Result<Vec<GroupRecord>, StoreError> {
        self.query_all(
            "SELECT slug, display_name, description, cover_url FROM groups ORDER BY slug",
            row_to_group,
        )
    }

    async fn list_translations(&self) -> Result<Vec<GroupTranslation>, StoreError> {
        self.query_all(
            "SELECT original_name, slug, display_name, description, cover_url \
             FROM group_translations ORDER BY display_name",
            row_to_translation,
        )
    }

    async fn list_subgroups(&self) -> Result<Vec<SubgroupRecord>, StoreError> {
        self.query_all(
            "SELECT slug, display_name, description FROM subgroups ORDER BY slug",
            |row| {
                Ok(SubgroupRecord {
                    slug: row.get("slug")?,
                    display_name: row.get("display_name")?,
                    description: row.get("description")?,
                })
            },
        )
    }

    async fn list_subsubgroups(&self) -> Result<Vec<SubsubgroupRecord>, StoreError> {
        self.query_all(
            "SELECT slug, display_name FROM subsubgroups ORDER BY slug",
            |row| {
                Ok(SubsubgroupRecord {
                    slug: row.get("slug")?,
                    display_name: row.get("display_name")?,
                })
            },
        )
    }

    async fn list_statuses(&self) -> Result<Vec<StatusRecord>, StoreError> {
        self.query_all(
            "SELECT slug, name, description FROM statuses ORDER BY slug",
            |row| {
                Ok(StatusRecord {
                    slug: row.get("slug")?,
                    name: row.get("name")?,
                    description: row.get("description")?,
                })
            },
        )
    }

    async fn list_versions(&self) -> Result<Vec<VersionRecord>, StoreError> {
        self.query_all(
            "SELECT slug, version, display_name, description, release_date FROM versions \
             ORDER BY release_date DESC",
            row_to_version,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;

    const SEED: &str = r#"
        INSERT INTO resources (slug, short_id, group_slug, subgroup_slug, title, status_slug,
                               url_1, url_title_1, url_2, version_id)
        VALUES (302, 'gG302', 'trainers', 'css', 'Grid Garden', 'published',
                'https://cssgridgarden.com', 'Play', 'https://orphan.example', 1);
        INSERT INTO resources (id, row_number, group_name, subgroup_name, title, status_slug)
        VALUES ('123E4567-E89B-12D3-A456-426614174000', 101, 'Насмотренность',
                'Графический дизайн', 'Behance', 'published');
        INSERT INTO resources (slug, group_slug, title, status_slug)
        VALUES (303, 'trainers', 'Old Trainer', 'archived');
        INSERT INTO groups (slug, display_name) VALUES ('trainers', 'Тренажёры');
        INSERT INTO group_translations (original_name, slug, display_name)
        VALUES ('Насмотренность', 'inspiration', 'Насмотренность');
    "#;

    fn seeded() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(SEED).unwrap();
        SqliteStore::from_connection(conn).unwrap()
    }

    #[tokio::test]
    async fn test_find_by_numeric_key_and_row_number() {
        let store = seeded();

        let grid = store
            .find_by_primary_key(&PrimaryKey::Numeric(302))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(grid.title, "Grid Garden");
        assert_eq!(grid.links.len(), 1);

        let legacy = store
            .find_by_primary_key(&PrimaryKey::Numeric(101))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(legacy.slug, Some(101));
    }

    #[tokio::test]
    async fn test_find_by_uuid_ignores_case() {
        let store = seeded();
        let id = uuid::Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap();

        let found = store
            .find_by_primary_key(&PrimaryKey::Uuid(id))
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.title), Some("Behance".to_string()));
    }

    #[tokio::test]
    async fn test_find_by_short_id() {
        let store = seeded();
        assert!(store.find_by_short_id("gG302").await.unwrap().is_some());
        assert!(store.find_by_short_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_group_applies_status_filter() {
        let store = seeded();
        let group = GroupKey::Slug("trainers".to_string());

        let public = store
            .list_by_group(&group, &StatusFilter::published_only())
            .await
            .unwrap();
        assert_eq!(public.len(), 1);

        let admin = store
            .list_by_group(&group, &StatusFilter::any_known())
            .await
            .unwrap();
        assert_eq!(admin.len(), 2);
        assert!(admin.iter().any(|r| r.status == Status::Archived));

        let none = store
            .list_by_group(&group, &StatusFilter::only(Vec::<Status>::new()))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_group_lookup_uses_translations() {
        let store = seeded();

        let plain = store
            .find_group_by_slug_or_translation("trainers")
            .await
            .unwrap()
            .unwrap();
        assert!(plain.original_name.is_none());

        let legacy = store
            .find_group_by_slug_or_translation("inspiration")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(legacy.original_name.as_deref(), Some("Насмотренность"));

        assert!(store
            .find_group_by_slug_or_translation("nowhere")
            .await
            .unwrap()
            .is_none());
    }
}

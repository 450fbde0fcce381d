//! Shared catalog fixture for integration tests.

#![allow(dead_code)]

use std::path::Path;

use bibliotechka::store::sqlite::SCHEMA;
use bibliotechka::SqliteStore;
use rusqlite::Connection;

pub const BEHANCE_UUID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Two slug-scheme groups, one legacy group, three versions
pub const SEED: &str = r#"
    INSERT INTO groups (slug, display_name, description)
    VALUES ('trainers', 'Тренажёры', 'Игры и упражнения'),
           ('tools', 'Инструменты', NULL);

    INSERT INTO group_translations (original_name, slug, display_name, description)
    VALUES ('Насмотренность', 'inspiration', 'Насмотренность', 'Галереи и подборки');

    INSERT INTO subgroups (slug, display_name)
    VALUES ('css', 'CSS'), ('js', 'JavaScript'), ('graphics', 'Графика');

    INSERT INTO versions (slug, version, display_name, release_date)
    VALUES (1, '1.0', 'Запуск', '2024-01-10'),
           (2, '1.1', NULL, '2024-03-05'),
           (3, 'next', NULL, NULL);

    INSERT INTO resources (slug, short_id, group_slug, subgroup_slug, title, status_slug,
                           url_1, url_title_1, version_id)
    VALUES (302, 'gG302', 'trainers', 'css', 'Grid Garden', 'published',
            'https://cssgridgarden.com', 'Играть', 2),
           (303, 'fF303', 'trainers', 'css', 'Flexbox Froggy', 'published',
            'https://flexboxfroggy.com', 'Играть', 2);

    INSERT INTO resources (slug, group_slug, subgroup_slug, title, status_slug)
    VALUES (304, 'trainers', 'js', 'Ёлочка', 'published'),
           (306, 'trainers', 'js', 'Hidden', 'draft');

    INSERT INTO resources (slug, group_slug, title, status_slug, version_id)
    VALUES (305, 'trainers', 'Old Trainer', 'archived', 3);

    INSERT INTO resources (slug, short_id, group_slug, title, status_slug)
    VALUES (307, 'x-Y_9', 'trainers', 'Клавиатурный тренажёр', 'published');

    INSERT INTO resources (slug, group_slug, subgroup_slug, title, title_ai, status_slug,
                           version_id)
    VALUES (401, 'tools', 'graphics', 'figma', 'Figma', 'published', 1);

    INSERT INTO resources (id, row_number, group_name, subgroup_name, title, status_slug)
    VALUES ('123E4567-E89B-12D3-A456-426614174000', 101, 'Насмотренность',
            'Графический дизайн', 'Behance', 'published'),
           ('9b2f1c1e-0a4d-4e8b-9a55-0c1f7e3d2a10', 102, 'Насмотренность',
            'Графический дизайн', 'Dribbble', 'published');
"#;

pub fn seed(conn: &Connection) {
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(SEED).unwrap();
}

/// In-memory store with [`SEED`] loaded
pub fn seeded_store() -> SqliteStore {
    let conn = Connection::open_in_memory().unwrap();
    seed(&conn);
    SqliteStore::from_connection(conn).unwrap()
}

/// Write [`SEED`] into a database file
pub fn seed_file(path: &Path) {
    let conn = Connection::open(path).unwrap();
    seed(&conn);
}

/// Tag model
///
/// Tags are shared labels. Names are stored trimmed and lowercased, and the
/// `UNIQUE` constraint on `tags.name` guarantees one row per name.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tags (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(64) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use std::collections::HashSet;
use uuid::Uuid;

/// Longest tag name the schema accepts, in characters
pub const MAX_TAG_LENGTH: usize = 64;

/// A shared, deduplicated label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: Uuid,

    /// Lowercase, trimmed, non-empty
    pub name: String,
}

impl Tag {
    /// Canonical form of a user-supplied tag: trimmed and lowercased
    ///
    /// Returns `None` when nothing is left after trimming.
    ///
    /// ```
    /// use quillpress_shared::models::tag::Tag;
    ///
    /// assert_eq!(Tag::normalize_name("  Rust "), Some("rust".to_string()));
    /// assert_eq!(Tag::normalize_name("   "), None);
    /// ```
    pub fn normalize_name(raw: &str) -> Option<String> {
        let name = raw.trim().to_lowercase();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Normalizes a list of raw tags, dropping blanks and duplicates
    ///
    /// First occurrence wins, so the result keeps the caller's order.
    pub fn normalize_names<I, S>(raw: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        raw.into_iter()
            .filter_map(|tag| Self::normalize_name(tag.as_ref()))
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }

    /// Returns the tag row for `name`, inserting it if it does not exist
    ///
    /// `name` must already be normalized. Runs on the caller's connection so
    /// it can take part in a transaction. The upsert lets two writers racing
    /// on the same new name both end up with the same row.
    ///
    /// The upsert row-locks the tag until the transaction ends. Callers
    /// resolving several names must do so in sorted order.
    pub async fn find_or_create(conn: &mut PgConnection, name: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(conn)
        .await
    }

    /// Finds a tag by its normalized name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Tags linked to an article, by name
    pub async fn list_for_article(pool: &PgPool, article_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name
            FROM tags t
            JOIN article_tags at ON at.tag_id = t.id
            WHERE at.article_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(article_id)
        .fetch_all(pool)
        .await
    }

    /// Every tag, by name
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY name")
            .fetch_all(pool)
            .await
    }
}

/// Article/tag join rows
///
/// # Schema
///
/// ```sql
/// CREATE TABLE article_tags (
///     article_id UUID NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
///     tag_id UUID NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
///     PRIMARY KEY (article_id, tag_id)
/// );
/// ```
///
/// A link has no identity beyond the pair. Deleting an article removes its
/// links; the tags stay.

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// One article/tag link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArticleTag {
    pub article_id: Uuid,
    pub tag_id: Uuid,
}

impl ArticleTag {
    /// Makes `tag_ids` the complete link set of an article
    ///
    /// Existing links are removed first, so tags missing from `tag_ids` are
    /// unlinked. Duplicate ids link once. Call this inside the same
    /// transaction as the article write.
    ///
    /// Returns the number of links inserted.
    pub async fn replace_links(
        conn: &mut PgConnection,
        article_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<u64, sqlx::Error> {
        sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
            .bind(article_id)
            .execute(&mut *conn)
            .await?;

        if tag_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO article_tags (article_id, tag_id)
            SELECT $1, tag_id FROM UNNEST($2::uuid[]) AS tag_id
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(article_id)
        .bind(tag_ids.to_vec())
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Links of one article
    pub async fn list_for_article(pool: &PgPool, article_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ArticleTag>(
            "SELECT article_id, tag_id FROM article_tags WHERE article_id = $1",
        )
        .bind(article_id)
        .fetch_all(pool)
        .await
    }
}

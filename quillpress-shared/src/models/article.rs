/// Article model and the article write transaction
///
/// Creating or updating an article also resolves its tags and rewrites its
/// links. All of that happens in one database transaction, so a failure at
/// any step leaves neither a half-written article nor a partial tag set.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE article_category AS ENUM ('Tech', 'AI', 'Backend', 'Frontend', 'DevOps');
///
/// CREATE TABLE articles (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     content TEXT NOT NULL,
///     summary TEXT,
///     category article_category NOT NULL,
///     author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use quillpress_shared::models::article::{Article, Category, CreateArticle, UpdateArticle};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, author_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let article = Article::create_with_tags(&pool, author_id, CreateArticle {
///     title: "Hello".to_string(),
///     content: "<p>First post</p>".to_string(),
///     summary: None,
///     category: Category::Tech,
///     tags: vec!["Rust".to_string(), " rust ".to_string()],
/// })
/// .await?;
/// assert_eq!(article.tags.len(), 1);
///
/// // Replace the tag set
/// Article::update_with_tags(&pool, article.article.id, author_id, UpdateArticle {
///     tags: Some(vec!["axum".to_string()]),
///     ..Default::default()
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use std::{collections::HashMap, fmt, str::FromStr};
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    article_tag::ArticleTag,
    tag::{Tag, MAX_TAG_LENGTH},
};
use crate::auth::authorization::{require_owner, AuthzError};

/// Longest title the schema accepts, in characters
pub const MAX_TITLE_LENGTH: usize = 255;

/// Error type for article operations
#[derive(Debug, thiserror::Error)]
pub enum ArticleError {
    /// No article with the requested id
    #[error("Article not found")]
    NotFound,

    /// Caller is not the author
    #[error(transparent)]
    Forbidden(#[from] AuthzError),

    /// Input failed validation
    #[error("{0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Article category
///
/// Stored as the `article_category` Postgres enum; the wire and database
/// spellings are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "article_category")]
pub enum Category {
    Tech,
    #[serde(rename = "AI")]
    #[sqlx(rename = "AI")]
    Ai,
    Backend,
    Frontend,
    DevOps,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 5] = [
        Category::Tech,
        Category::Ai,
        Category::Backend,
        Category::Frontend,
        Category::DevOps,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tech => "Tech",
            Category::Ai => "AI",
            Category::Backend => "Backend",
            Category::Frontend => "Frontend",
            Category::DevOps => "DevOps",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ArticleError;

    /// Parses the exact wire spelling (`"Tech"`, `"AI"`, ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                ArticleError::Validation(format!(
                    "Invalid category '{}'. Expected one of: Tech, AI, Backend, Frontend, DevOps",
                    s
                ))
            })
    }
}

/// An article row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: Uuid,
    pub title: String,

    /// Rich text (HTML) body
    pub content: String,

    pub summary: Option<String>,
    pub category: Category,

    /// Owner; set at creation and never changed
    pub author_id: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author fields embedded in article responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
}

/// An article with its author and tags, as served by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,

    pub author: AuthorSummary,

    /// Linked tags, by name
    pub tags: Vec<Tag>,
}

impl ArticleDetail {
    /// Names of the linked tags
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}

/// Input for creating an article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArticle {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub category: Category,

    /// Raw tag strings; normalized and deduplicated on write
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input for updating an article
///
/// `None` fields keep their stored value. `tags: None` leaves the links
/// alone; `tags: Some(..)` replaces them, and `Some(vec![])` clears them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub category: Option<Category>,
    pub tags: Option<Vec<String>>,
}

/// Filters for listing articles
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    /// Exact category match
    pub category: Option<Category>,

    /// Case-insensitive substring of title or content
    pub search: Option<String>,

    /// Only articles by this author
    pub author_id: Option<Uuid>,
}

impl CreateArticle {
    fn validate(&self) -> Result<Vec<String>, ArticleError> {
        validate_title(&self.title)?;
        validate_content(&self.content)?;
        if let Some(summary) = &self.summary {
            reject_nul("Summary", summary)?;
        }
        prepare_tags(&self.tags)
    }
}

impl UpdateArticle {
    fn validate(&self) -> Result<Option<Vec<String>>, ArticleError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(content) = &self.content {
            validate_content(content)?;
        }
        if let Some(summary) = &self.summary {
            reject_nul("Summary", summary)?;
        }
        self.tags.as_deref().map(prepare_tags).transpose()
    }
}

/// Postgres text columns cannot store NUL
fn reject_nul(field: &str, value: &str) -> Result<(), ArticleError> {
    if value.contains('\0') {
        return Err(ArticleError::Validation(format!(
            "{} must not contain NUL characters",
            field
        )));
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), ArticleError> {
    if title.trim().is_empty() {
        return Err(ArticleError::Validation("Title is required".to_string()));
    }
    reject_nul("Title", title)?;
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ArticleError::Validation(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), ArticleError> {
    if content.trim().is_empty() {
        return Err(ArticleError::Validation("Content is required".to_string()));
    }
    reject_nul("Content", content)
}

/// Normalizes raw tags and rejects names the schema cannot hold
fn prepare_tags(raw: &[String]) -> Result<Vec<String>, ArticleError> {
    let names = Tag::normalize_names(raw);

    for name in &names {
        reject_nul("Tag", name)?;
    }

    if let Some(long) = names.iter().find(|n| n.chars().count() > MAX_TAG_LENGTH) {
        return Err(ArticleError::Validation(format!(
            "Tag '{}' is longer than {} characters",
            long, MAX_TAG_LENGTH
        )));
    }

    Ok(names)
}

/// Escapes `%`, `_` and `\` so user input matches literally inside ILIKE
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Resolves every name to a tag row and makes them the article's link set
///
/// Tag rows are upserted in name order. Every writer locks shared tags in
/// the same order, so concurrent writes with overlapping tags cannot
/// deadlock.
async fn link_tags(
    conn: &mut PgConnection,
    article_id: Uuid,
    names: &[String],
) -> Result<(), sqlx::Error> {
    let mut names = names.to_vec();
    names.sort_unstable();

    let mut tag_ids = Vec::with_capacity(names.len());
    for name in &names {
        let tag = Tag::find_or_create(&mut *conn, name).await?;
        tag_ids.push(tag.id);
    }

    let linked = ArticleTag::replace_links(conn, article_id, &tag_ids).await?;
    debug!(%article_id, linked, "Replaced article tag links");
    Ok(())
}

/// Article row joined with its author's username
#[derive(sqlx::FromRow)]
struct ArticleRow {
    id: Uuid,
    title: String,
    content: String,
    summary: Option<String>,
    category: Category,
    author_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_username: String,
}

impl ArticleRow {
    fn into_detail(self, tags: Vec<Tag>) -> ArticleDetail {
        ArticleDetail {
            author: AuthorSummary {
                id: self.author_id,
                username: self.author_username,
            },
            article: Article {
                id: self.id,
                title: self.title,
                content: self.content,
                summary: self.summary,
                category: self.category,
                author_id: self.author_id,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            tags,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TagLinkRow {
    article_id: Uuid,
    id: Uuid,
    name: String,
}

const ARTICLE_COLUMNS: &str =
    "id, title, content, summary, category, author_id, created_at, updated_at";

const DETAIL_SELECT: &str = r#"
    SELECT a.id, a.title, a.content, a.summary, a.category, a.author_id,
           a.created_at, a.updated_at, u.username AS author_username
    FROM articles a
    JOIN users u ON u.id = a.author_id
"#;

impl Article {
    /// Creates an article and links its tags in one transaction
    ///
    /// # Errors
    ///
    /// - `ArticleError::Validation` for a blank title or content, or an
    ///   over-long tag
    /// - `ArticleError::Database` if any statement fails; nothing is written
    pub async fn create_with_tags(
        pool: &PgPool,
        author_id: Uuid,
        data: CreateArticle,
    ) -> Result<ArticleDetail, ArticleError> {
        let tag_names = data.validate()?;

        let mut tx = pool.begin().await?;

        let query = format!(
            r#"
            INSERT INTO articles (title, content, summary, category, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ARTICLE_COLUMNS
        );
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(data.title)
            .bind(data.content)
            .bind(data.summary)
            .bind(data.category)
            .bind(author_id)
            .fetch_one(&mut *tx)
            .await?;

        link_tags(&mut tx, article.id, &tag_names).await?;

        tx.commit().await?;

        info!(
            article_id = %article.id,
            %author_id,
            tags = tag_names.len(),
            "Article created"
        );

        Self::find_detail(pool, article.id)
            .await?
            .ok_or(ArticleError::NotFound)
    }

    /// Updates an article owned by `requester_id` in one transaction
    ///
    /// The row is locked while ownership is checked, so the check and the
    /// write see the same author. See [`UpdateArticle`] for which fields
    /// change.
    ///
    /// # Errors
    ///
    /// - `ArticleError::NotFound` if the article does not exist
    /// - `ArticleError::Forbidden` if `requester_id` is not the author
    /// - `ArticleError::Validation` for invalid input
    /// - `ArticleError::Database` if any statement fails; nothing is written
    pub async fn update_with_tags(
        pool: &PgPool,
        id: Uuid,
        requester_id: Uuid,
        data: UpdateArticle,
    ) -> Result<ArticleDetail, ArticleError> {
        let tag_names = data.validate()?;

        let mut tx = pool.begin().await?;

        let author_id: Uuid =
            sqlx::query_scalar("SELECT author_id FROM articles WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(ArticleError::NotFound)?;

        require_owner(author_id, requester_id)?;

        sqlx::query(
            r#"
            UPDATE articles
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                summary = COALESCE($4, summary),
                category = COALESCE($5, category),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.content)
        .bind(data.summary)
        .bind(data.category)
        .execute(&mut *tx)
        .await?;

        if let Some(names) = &tag_names {
            link_tags(&mut tx, id, names).await?;
        }

        tx.commit().await?;

        info!(
            article_id = %id,
            retagged = tag_names.is_some(),
            "Article updated"
        );

        Self::find_detail(pool, id)
            .await?
            .ok_or(ArticleError::NotFound)
    }

    /// Deletes an article owned by `requester_id`
    ///
    /// Its tag links go with it (cascade); the tags remain.
    ///
    /// # Errors
    ///
    /// - `ArticleError::NotFound` if the article does not exist
    /// - `ArticleError::Forbidden` if `requester_id` is not the author
    pub async fn delete_owned(
        pool: &PgPool,
        id: Uuid,
        requester_id: Uuid,
    ) -> Result<(), ArticleError> {
        let mut tx = pool.begin().await?;

        let author_id: Uuid =
            sqlx::query_scalar("SELECT author_id FROM articles WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(ArticleError::NotFound)?;

        require_owner(author_id, requester_id)?;

        sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(article_id = %id, "Article deleted");
        Ok(())
    }

    /// Finds a bare article row by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM articles WHERE id = $1", ARTICLE_COLUMNS);

        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds an article with its author and tags
    pub async fn find_detail(pool: &PgPool, id: Uuid) -> Result<Option<ArticleDetail>, sqlx::Error> {
        let query = format!("{} WHERE a.id = $1", DETAIL_SELECT);

        let row = sqlx::query_as::<_, ArticleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => {
                let tags = Tag::list_for_article(pool, id).await?;
                Ok(Some(row.into_detail(tags)))
            }
            None => Ok(None),
        }
    }

    /// Lists articles newest first
    ///
    /// Tags for the whole page are loaded with a single extra query.
    pub async fn list(pool: &PgPool, filter: ArticleFilter) -> Result<Vec<ArticleDetail>, sqlx::Error> {
        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let query = format!(
            r#"{}
            WHERE ($1::article_category IS NULL OR a.category = $1)
              AND ($2::text IS NULL OR a.title ILIKE $2 OR a.content ILIKE $2)
              AND ($3::uuid IS NULL OR a.author_id = $3)
            ORDER BY a.created_at DESC, a.id
            "#,
            DETAIL_SELECT
        );

        let rows = sqlx::query_as::<_, ArticleRow>(&query)
            .bind(filter.category)
            .bind(pattern)
            .bind(filter.author_id)
            .fetch_all(pool)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut tags_by_article = Self::tags_for_articles(pool, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let tags = tags_by_article.remove(&row.id).unwrap_or_default();
                row.into_detail(tags)
            })
            .collect())
    }

    /// Articles written by one author, newest first
    pub async fn list_by_author(
        pool: &PgPool,
        author_id: Uuid,
    ) -> Result<Vec<ArticleDetail>, sqlx::Error> {
        Self::list(
            pool,
            ArticleFilter {
                author_id: Some(author_id),
                ..Default::default()
            },
        )
        .await
    }

    async fn tags_for_articles(
        pool: &PgPool,
        article_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Tag>>, sqlx::Error> {
        if article_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = sqlx::query_as::<_, TagLinkRow>(
            r#"
            SELECT at.article_id, t.id, t.name
            FROM article_tags at
            JOIN tags t ON t.id = at.tag_id
            WHERE at.article_id = ANY($1)
            ORDER BY t.name
            "#,
        )
        .bind(article_ids.to_vec())
        .fetch_all(pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for link in links {
            grouped.entry(link.article_id).or_default().push(Tag {
                id: link.id,
                name: link.name,
            });
        }
        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&Category::Ai).unwrap(), "\"AI\"");
        assert_eq!(serde_json::to_string(&Category::DevOps).unwrap(), "\"DevOps\"");
        assert_eq!(
            serde_json::from_str::<Category>("\"AI\"").unwrap(),
            Category::Ai
        );
        assert!(serde_json::from_str::<Category>("\"Ai\"").is_err());
    }

    #[test]
    fn test_category_parse_rejects_unknown() {
        assert!(matches!(
            "Cooking".parse::<Category>(),
            Err(ArticleError::Validation(_))
        ));
        assert!("tech".parse::<Category>().is_err());
    }

    #[test]
    fn test_create_validation() {
        let mut data = CreateArticle {
            title: "Title".to_string(),
            content: "<p>Body</p>".to_string(),
            summary: None,
            category: Category::Tech,
            tags: vec!["AI".to_string(), "ai".to_string(), " AI ".to_string()],
        };
        assert_eq!(data.validate().unwrap(), vec!["ai".to_string()]);

        data.title = "   ".to_string();
        assert!(matches!(data.validate(), Err(ArticleError::Validation(m)) if m == "Title is required"));

        data.title = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert!(data.validate().is_err());

        data.title = "Title".to_string();
        data.content = String::new();
        assert!(matches!(data.validate(), Err(ArticleError::Validation(m)) if m == "Content is required"));
    }

    #[test]
    fn test_update_validation() {
        assert_eq!(UpdateArticle::default().validate().unwrap(), None);

        let clear = UpdateArticle {
            tags: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(clear.validate().unwrap(), Some(vec![]));

        let blank_title = UpdateArticle {
            title: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(blank_title.validate().is_err());
    }

    #[test]
    fn test_prepare_tags_rejects_long_names() {
        let long = "a".repeat(MAX_TAG_LENGTH + 1);
        assert!(prepare_tags(&[long]).is_err());

        let exact = "a".repeat(MAX_TAG_LENGTH);
        assert_eq!(prepare_tags(&[exact.clone()]).unwrap(), vec![exact]);
    }

    #[test]
    fn test_nul_bytes_are_rejected() {
        let base = CreateArticle {
            title: "Title".to_string(),
            content: "Body".to_string(),
            summary: None,
            category: Category::Tech,
            tags: vec![],
        };

        let cases = [
            CreateArticle { title: "a\0b".to_string(), ..base.clone() },
            CreateArticle { content: "a\0b".to_string(), ..base.clone() },
            CreateArticle { summary: Some("a\0b".to_string()), ..base.clone() },
            CreateArticle { tags: vec!["ok".to_string(), "a\0b".to_string()], ..base.clone() },
        ];
        for data in cases {
            assert!(matches!(data.validate(), Err(ArticleError::Validation(_))));
        }

        let update = UpdateArticle {
            summary: Some("\0".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(base.validate().is_ok());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("rust"), "rust");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_detail_serializes_flat() {
        let author_id = Uuid::new_v4();
        let detail = ArticleDetail {
            article: Article {
                id: Uuid::new_v4(),
                title: "Hello".to_string(),
                content: "<p>x</p>".to_string(),
                summary: None,
                category: Category::Ai,
                author_id,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            author: AuthorSummary {
                id: author_id,
                username: "ada".to_string(),
            },
            tags: vec![Tag {
                id: Uuid::new_v4(),
                name: "ai".to_string(),
            }],
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["title"], "Hello");
        assert_eq!(json["category"], "AI");
        assert_eq!(json["author"]["username"], "ada");
        assert_eq!(json["tags"][0]["name"], "ai");
        assert_eq!(detail.tag_names(), vec!["ai"]);
    }
}

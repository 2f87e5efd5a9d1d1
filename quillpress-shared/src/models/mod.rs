/// Database models
///
/// # Models
///
/// - `user`: Accounts that author articles
/// - `article`: Articles, categories, and the article write transaction
/// - `tag`: Shared, case-normalized labels
/// - `article_tag`: Join rows between articles and tags
///
/// Every function takes a `&PgPool`, except the pieces of the article write
/// transaction that must run on the transaction's own connection.

pub mod article;
pub mod article_tag;
pub mod tag;
pub mod user;

/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Signup, login and the current user
/// - `articles`: Article CRUD with tags
/// - `tags`: Tag listing
/// - `ai`: Writing-assistant pass-through

pub mod ai;
pub mod articles;
pub mod auth;
pub mod health;
pub mod tags;

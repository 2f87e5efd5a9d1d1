/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use quillpress_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = quillpress_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use quillpress_shared::{ai::AiAssistant, auth::middleware::authenticate};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Writing assistant; `None` when no AI provider is configured
    pub ai: Option<AiAssistant>,
}

impl AppState {
    /// Creates application state without an AI provider
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            ai: None,
        }
    }

    /// Attaches the writing assistant
    pub fn with_ai(mut self, ai: AiAssistant) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /api/
///     ├── /auth/
///     │   ├── POST /signup
///     │   ├── POST /login
///     │   └── GET  /me              (auth)
///     ├── /articles/
///     │   ├── GET    /              ?category=&search=
///     │   ├── POST   /              (auth)
///     │   ├── GET    /my            (auth)
///     │   ├── GET    /:id
///     │   ├── PUT    /:id           (auth, owner)
///     │   └── DELETE /:id           (auth, owner)
///     ├── /tags/
///     │   └── GET    /
///     └── /ai/                      (auth)
///         ├── POST /improve
///         ├── POST /summary
///         ├── POST /suggest-title
///         └── POST /suggest-tags
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. Response compression (gzip, brotli)
/// 3. CORS (tower-http CorsLayer)
/// 4. Security headers
/// 5. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_layer = || axum::middleware::from_fn_with_state(state.clone(), jwt_auth_layer);

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/me", get(routes::auth::me))
        .route_layer(auth_layer())
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login));

    // Reads are public, writes need a token
    let article_routes = Router::new()
        .route("/", post(routes::articles::create_article))
        .route("/my", get(routes::articles::list_my_articles))
        .route(
            "/:id",
            axum::routing::put(routes::articles::update_article)
                .delete(routes::articles::delete_article),
        )
        .route_layer(auth_layer())
        .route("/", get(routes::articles::list_articles))
        .route("/:id", get(routes::articles::get_article));

    let tag_routes = Router::new().route("/", get(routes::tags::list_tags));

    let ai_routes = Router::new()
        .route("/improve", post(routes::ai::improve))
        .route("/summary", post(routes::ai::summary))
        .route("/suggest-title", post(routes::ai::suggest_title))
        .route("/suggest-tags", post(routes::ai::suggest_tags))
        .route_layer(auth_layer());

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/articles", article_routes)
        .nest("/tags", tag_routes)
        .nest("/ai", ai_routes);

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// JWT authentication middleware layer
///
/// Validates the bearer token and injects an `AuthContext` into the request
/// extensions for handlers to extract.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(req.headers(), state.jwt_secret())?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

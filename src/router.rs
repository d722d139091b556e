use axum::Router;
use axum::routing::{get, post};

use crate::auth::AuthService;
use crate::catalog::CatalogRepository;
use crate::handlers;
use crate::media::MediaStore;

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogRepository,
    pub auth: AuthService,
    pub media: MediaStore,
    /// Skip the `Secure` cookie attribute; local development only.
    pub insecure_cookie: bool,
}

impl AppState {
    pub fn new(
        catalog: CatalogRepository,
        auth: AuthService,
        media: MediaStore,
        insecure_cookie: bool,
    ) -> Self {
        Self {
            catalog,
            auth,
            media,
            insecure_cookie,
        }
    }
}

pub fn comic_router(state: AppState) -> Router {
    Router::new()
        // Auth surface
        .route("/api/auth", post(handlers::auth::login))
        .route("/api/auth/verify", get(handlers::auth::verify))
        .route("/api/auth/logout", post(handlers::auth::logout))
        // Reader surface
        .route(
            "/api/issues",
            get(handlers::issues::list).post(handlers::issues::create),
        )
        .route("/api/issues/featured", get(handlers::issues::featured))
        .route(
            "/api/issues/{id}",
            get(handlers::issues::detail)
                .put(handlers::issues::update)
                .delete(handlers::issues::delete),
        )
        .route("/api/search", get(handlers::issues::search))
        .route("/api/tags", get(handlers::issues::tags))
        .route("/api/stats", get(handlers::issues::stats))
        // Media bucket
        .route("/api/uploads", post(handlers::uploads::upload))
        .route("/media/{*path}", get(handlers::uploads::serve_media))
        // Page-level route interception
        .route("/dashboard", get(handlers::pages::dashboard))
        .route("/dashboard/{*rest}", get(handlers::pages::dashboard))
        .route("/auth", get(handlers::pages::auth_page))
        .with_state(state)
}

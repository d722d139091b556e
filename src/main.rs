use comic_press::auth::AuthService;
use comic_press::catalog::{CatalogRepository, seed};
use comic_press::db::sqlite::{AuthStorage, CatalogStorage};
use comic_press::media::MediaStore;
use comic_press::router::{AppState, comic_router};
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &comic_press::config::CONFIG;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        bind_addr = %cfg.basic.bind_addr,
        media_root = %cfg.media.root.display(),
        loglevel = %cfg.basic.loglevel
    );

    let pool = comic_press::db::connect(&cfg.basic.database_url).await?;
    let catalog_storage = CatalogStorage::new(pool.clone());
    catalog_storage.init_schema().await?;

    let auth = AuthService::new(AuthStorage::new(pool));
    auth.seed_admin(&cfg.admin.email, cfg.admin.password.as_deref())
        .await?;
    match auth.purge_expired().await {
        Ok(0) => {}
        Ok(n) => info!(count = n, "purged expired sessions"),
        Err(e) => warn!(error = %e, "failed to purge expired sessions"),
    }

    let catalog = CatalogRepository::new(catalog_storage);
    seed_catalog(&catalog, cfg).await;

    let media = MediaStore::new(
        cfg.media.root.clone(),
        cfg.media.public_prefix.clone(),
        cfg.media.base_url.clone(),
    );
    let state = AppState::new(catalog, auth, media, cfg.basic.insecure_cookie);
    let app = comic_router(state);

    let listener = TcpListener::bind(&cfg.basic.bind_addr).await?;
    info!("HTTP server listening on {}", cfg.basic.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// First-run convenience: when the catalog is empty and a seed directory is
/// configured, load its JSON issue files.
async fn seed_catalog(catalog: &CatalogRepository, cfg: &comic_press::config::Config) {
    let Some(seed_path) = cfg.basic.seed_path.as_ref() else {
        return;
    };
    match catalog.storage().count().await {
        Ok(0) => {}
        Ok(_) => return,
        Err(e) => {
            warn!(error = %e, "could not check catalog size; skipping seed");
            return;
        }
    }
    match seed::load_from_dir(seed_path) {
        Ok(issues) if !issues.is_empty() => {
            info!(
                path = %seed_path.display(),
                count = issues.len(),
                "seeding catalog from filesystem"
            );
            for issue in issues {
                if let Err(e) = catalog.create(issue).await {
                    warn!(error = %e, "failed to insert seed issue");
                }
            }
        }
        Ok(_) => {
            info!(path = %seed_path.display(), "no seed issues discovered");
        }
        Err(e) => {
            warn!(
                path = %seed_path.display(),
                error = %e,
                "failed to load seed issues"
            );
        }
    }
}

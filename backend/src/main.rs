use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use benefitsdesk_backend::{
    config::Config,
    db::{create_pool, init_schema},
    docs, handlers, middleware,
    state::AppState,
    uploads::UploadStore,
};

// Multipart bodies carry the 5 MiB attachment cap plus form fields; the
// transport limit sits above it so oversized files get the intake error,
// not a bare 413 from the extractor.
const MAX_BODY_BYTES: usize = 12 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "benefitsdesk_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        db_host = %config.db_host,
        db_name = %config.db_name,
        port = config.port,
        frontend_url = %config.frontend_url,
        upload_dir = %config.upload_dir,
        "Loaded configuration from environment/.env"
    );

    // Initialize database; a failed schema init kills the process.
    let pool = create_pool(&config.database_url()).await?;
    init_schema(&pool).await?;
    tracing::info!("Database initialized");

    let uploads = UploadStore::new(&config.upload_dir);
    let state = AppState::new(pool, config.clone(), uploads);

    let public_dir = PathBuf::from(&config.public_dir);

    let app = Router::new()
        .route(
            "/api/requests",
            post(handlers::requests::create_request).get(handlers::requests::list_requests),
        )
        .route(
            "/api/requests/emp/{emp_id}",
            get(handlers::requests::list_requests_by_employee),
        )
        .route(
            "/api/requests/{id}",
            put(handlers::requests::update_request_status),
        )
        .route(
            "/download/{filename}",
            get(handlers::downloads::download_file),
        )
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", docs::ApiDoc::openapi()))
        .route_service("/", ServeFile::new(public_dir.join("index.html")))
        .route_service("/hr", ServeFile::new(public_dir.join("hr.html")))
        .nest_service("/Uploads", ServeDir::new(&config.upload_dir))
        .fallback_service(ServeDir::new(&public_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(axum_middleware::from_fn(middleware::log_error_responses))
                .layer(cors_layer(&config)),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Fixed allow-list CORS: credentials are enabled, so origins must be
/// enumerated rather than wildcarded.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allow_origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

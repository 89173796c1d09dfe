mod core;
mod features;
mod modules;
mod shared;

use std::sync::Arc;

use axum::Router;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::{Config, StorageConfig};
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::identity::AnonymousIdentityProvider;
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::features::reports::services::PhotoUploadBackend;
use crate::modules::capture::FsPhotoSource;
use crate::modules::storage::{
    DocumentStore, MemoryDocumentStore, PgDocumentStore, S3PhotoStore,
};

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Initialize the storage backend. The creation service takes its handles
    // at construction, so nothing can submit a report before the backend is
    // actually connected.
    let (store, photo_backend): (Arc<dyn DocumentStore>, Option<PhotoUploadBackend>) =
        match &config.storage {
            StorageConfig::Local { seed_file } => {
                let store = MemoryDocumentStore::new();
                if let Some(path) = seed_file {
                    let loaded = store
                        .load_seed_file(path, &config.report.app_id)
                        .await
                        .map_err(|e| anyhow::anyhow!("Failed to load seed file: {}", e))?;
                    tracing::info!("Local store seeded with {} reports", loaded);
                }
                tracing::info!("Storage mode: local (in-memory, photos kept as local refs)");
                (Arc::new(store), None)
            }
            StorageConfig::Remote { database, minio } => {
                let pool = database::create_pool(database).await?;
                tracing::info!("Database connection pool created");

                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
                tracing::info!("Database migrations completed successfully");

                let photo_store = S3PhotoStore::new(minio.clone())
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to initialize photo store: {}", e))?;
                tracing::info!("Storage mode: remote (Postgres + S3 photo uploads)");

                (
                    Arc::new(PgDocumentStore::new(pool)),
                    Some(PhotoUploadBackend {
                        blob_store: Arc::new(photo_store),
                        photo_source: Arc::new(FsPhotoSource),
                    }),
                )
            }
        };

    // One anonymous identity per process, like the mobile client's anonymous
    // sign-in at app start.
    let identity = Arc::new(AnonymousIdentityProvider::new());
    tracing::info!("Anonymous identity provider initialized");

    // Initialize Report Service
    let report_service = Arc::new(ReportService::new(
        store,
        photo_backend,
        identity,
        config.report.app_id.clone(),
    ));
    tracing::info!("Report service initialized (app_id: {})", config.report.app_id);

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    // Simple health check endpoint
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(reports_routes::routes(report_service))
        .merge(health_route)
        .layer(axum::extract::DefaultBodyLimit::max(
            config.app.max_request_body_size,
        ))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}

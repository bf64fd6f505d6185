//! temperament_server: REST server for the temperament test.
//!
//! See [`temperament_server::config`] for the environment variables read.

use std::net::SocketAddr;
use std::sync::Arc;

use temperament_core::ReportService;
use temperament_postgres::PgStores;
use temperament_server::config::AppConfig;
use temperament_server::pdf::LopdfBackend;
use temperament_server::router::build_router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "temperament_server=debug,temperament_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let layout = config.layout()?;
    if !config.font_path.exists() {
        tracing::warn!(
            "Font {} not found; report generation will fail until it is installed",
            config.font_path.display()
        );
    }

    let pool = match temperament_postgres::connect(&config.database).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(
                "Please check DATABASE_URL environment variable and ensure PostgreSQL is running"
            );
            return Err(anyhow::anyhow!("Database connection failed: {}", e));
        }
    };
    temperament_postgres::run_migrations(&pool).await?;

    let stores = PgStores::new(pool);
    let service = Arc::new(
        ReportService::new(
            stores.results,
            stores.references,
            stores.templates,
            Arc::new(LopdfBackend),
            config.font_path.clone(),
        )
        .with_layout(layout),
    );

    let app = build_router(service, config.cors_origin.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Temperament server running on http://{}", addr);
    tracing::info!("  POST /salvar-resultado          - store a completed test");
    tracing::info!("  GET  /gerar-pdf/:id?lang=pt|en  - download the report");
    tracing::info!("  GET  /gerar-pdf/:id/layout      - composed draw instructions");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!("Port {} is already in use", config.port);
            }
            return Err(anyhow::anyhow!("Failed to bind to {}: {}", addr, e));
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        return Err(anyhow::anyhow!("Server error: {}", e));
    }
    Ok(())
}

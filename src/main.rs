use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use vehicle_rental::config::{database::DatabaseConfig, EnvironmentConfig};
use vehicle_rental::database::DatabaseConnection;
use vehicle_rental::repositories::PgEntityStore;
use vehicle_rental::routes::create_router;
use vehicle_rental::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚗 Vehicle Rental API");
    info!("================================================");
    info!("🌍 Entorno: {}", config.environment);

    // Inicializar base de datos
    let db_config = DatabaseConfig::from_env()?;
    let db_connection = match DatabaseConnection::new(&db_config).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {:#}", e);
            return Err(e);
        }
    };

    let store = PgEntityStore::new(db_connection.pool().clone(), config.lock_timeout);
    info!(
        "🔒 lock_timeout {:?}, operation_timeout {:?}",
        config.lock_timeout, config.operation_timeout
    );

    if config.cors_origins.is_empty() && !config.is_development() {
        warn!("⚠️ CORS_ORIGINS vacío fuera de desarrollo: CORS permisivo");
    }

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_router(AppState::new(Arc::new(store), config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /api/ping - Health check");
    info!("📝 Alquileres:");
    info!("   GET/POST   /api/rentals");
    info!("   POST       /api/rentals/request");
    info!("   GET/PUT/DELETE /api/rentals/:id");
    info!("   POST       /api/rentals/:id/{{approve,reject,cancel,pay,return}}");
    info!("🚗 Vehículos:");
    info!("   GET/POST   /api/vehicles");
    info!("   GET/PUT/DELETE /api/vehicles/:id");
    info!("   PATCH      /api/vehicles/:id/status");
    info!("📊 Reportes:");
    info!("   GET        /api/reports/active");
    info!("   GET        /api/reports/history");
    info!("   DELETE     /api/reports/history/clear");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal SIGTERM recibida, apagando servidor...");
        },
    }
}

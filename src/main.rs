use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use dotenvy::dotenv;

use usuario_cache::{
    api::create_api_router,
    cache::{CacheBackend, CacheStore, MemoryCache, RedisClient},
    config::EnvironmentConfig,
    database::DatabaseConnection,
    repositories::UserRepository,
    state::AppState,
    services::status_line,
    UsuarioService,
};

/// Modo de ejecución elegido por argumentos
enum Command {
    Serve,
    Lookup(i32),
}

fn parse_command() -> Result<Command> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["serve"] => Ok(Command::Serve),
        ["lookup", id] => Ok(Command::Lookup(id.parse().map_err(|_| {
            anyhow::anyhow!("El id debe ser un número entero, recibido '{}'", id)
        })?)),
        _ => Err(anyhow::anyhow!("Uso: usuario-cache [serve | lookup <id>]")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let command = parse_command()?;
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("👤 Usuario Cache - PostgreSQL + Redis");
    info!("=====================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new(&config.database).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Inicializar cache
    let cache: Arc<dyn CacheStore> = match config.cache.backend {
        CacheBackend::Redis => Arc::new(RedisClient::connect_or_disabled(&config.cache).await),
        CacheBackend::Memory => {
            info!("🧠 Usando cache en memoria");
            Arc::new(MemoryCache::new())
        }
    };

    let store = Arc::new(UserRepository::new(db_connection.pool().clone()));
    let service = UsuarioService::new(cache, store);

    let result = match command {
        Command::Lookup(id) => run_lookup(&service, id).await,
        Command::Serve => run_server(service, &config).await,
    };

    // El pool se cierra siempre, termine bien o mal
    db_connection.close().await;
    result
}

/// Ejecutar una sola consulta e imprimir el resultado
async fn run_lookup(service: &UsuarioService, id: i32) -> Result<()> {
    let outcome = service.get_usuario(id).await?;
    println!("{}", status_line(&outcome, id));
    Ok(())
}

async fn run_server(service: UsuarioService, config: &EnvironmentConfig) -> Result<()> {
    let app = create_api_router(AppState::new(service));
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado de PostgreSQL y cache");
    info!("   GET  /api/usuarios/:id - Obtener usuario (cache-aside)");
    info!("   GET  /api/cache/stats - Estadísticas de consultas");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}

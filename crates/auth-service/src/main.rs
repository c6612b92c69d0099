use auth_service::config::Config;
use auth_service::crypto::{BcryptHasher, JwtTokenIssuer};
use auth_service::repositories::{InMemoryUserStore, PgUserStore, UserStore};
use auth_service::routes::{self, AppState};
use auth_service::services::AuthService;
use common::secret::ExposeSecret;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// `DATABASE_URL` value selecting the process-local store.
const IN_MEMORY_DATABASE_URL: &str = "memory";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Auth Service");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bcrypt_cost = config.bcrypt_cost,
        jwt_expiry_seconds = config.jwt_expiry_seconds,
        equalize_login_timing = config.equalize_login_timing,
        "Configuration loaded successfully"
    );

    // Must be installed before any metric is recorded
    let metrics_handle = routes::init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics recorder: {}", e);
        e
    })?;

    let users = connect_user_store(&config.database_url).await?;

    let hasher = Arc::new(BcryptHasher::new(config.bcrypt_cost)?);
    let issuer = Arc::new(JwtTokenIssuer::new(
        config.jwt_secret.expose_secret(),
        config.jwt_expiry_seconds,
    ));

    let mut auth = AuthService::new(users, hasher, issuer);
    if config.equalize_login_timing {
        auth = auth.with_login_timing_equalization().await.map_err(|e| {
            error!("Failed to prepare login timing equalization: {}", e);
            e
        })?;
        info!("Login timing equalization enabled");
    }

    let state = Arc::new(AppState {
        auth: Arc::new(auth),
    });

    let app = routes::build_routes(state, metrics_handle);

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Auth Service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Auth Service stopped");
    Ok(())
}

/// Plain text by default, JSON lines when `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "auth_service=debug,auth_server=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn connect_user_store(
    database_url: &str,
) -> Result<Arc<dyn UserStore>, Box<dyn std::error::Error>> {
    if database_url == IN_MEMORY_DATABASE_URL {
        warn!("Using in-memory user store; users are lost on restart");
        return Ok(Arc::new(InMemoryUserStore::new()));
    }

    info!("Connecting to database...");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(|e| {
            error!("Failed to run migrations: {}", e);
            e
        })?;

    info!("Database connection established");
    Ok(Arc::new(PgUserStore::new(pool)))
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await;
}

/// Resolves when `signal` fires. If the handler could not be installed the
/// server keeps running until the process is killed.
async fn wait_for_shutdown<F>(signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

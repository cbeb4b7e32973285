use std::sync::Arc;
use std::time::{Duration, Instant};
use std::{env, io};

use hrms_auth::middleware::AuthState;
use hrms_auth::{AuthService, TokenService};
use hrms_postgres::PostgresStorage;
use hrms_server::cache::CacheStore;
use hrms_server::config::loader::load_config;
use hrms_server::rate_limit::RateLimiter;
use hrms_server::state::AppState;
use hrms_server::{ServerBuilder, create_cache_backend};

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From HRMS_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (hrms.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (HRMS_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    // Initialize tracing early with the default level
    hrms_server::observability::init_tracing();

    let (config_path, source) = resolve_config_path();

    let cfg = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        path = %config_path,
        source = %source,
        "Configuration loaded"
    );

    hrms_server::observability::apply_logging_level(&cfg.logging.level);
    hrms_server::metrics::init_metrics();

    let storage = match PostgresStorage::new(cfg.storage.postgres.to_postgres_config()).await {
        Ok(s) => Arc::new(s),
        Err(e) => {
            eprintln!("PostgreSQL initialization failed: {e}");
            std::process::exit(2);
        }
    };
    tracing::info!("PostgreSQL storage ready");

    let backend = create_cache_backend(&cfg.redis).await;
    let cache = CacheStore::new(backend.clone(), Duration::from_secs(cfg.cache.ttl_secs));

    let tokens = match TokenService::from_config(&cfg.auth) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            eprintln!("Auth configuration error: {e}");
            std::process::exit(2);
        }
    };

    let auth = Arc::new(AuthService::new(
        storage.clone(),
        storage.clone(),
        storage.clone(),
        Arc::new(cache.clone()),
        tokens.clone(),
    ));

    let state = AppState {
        storage: storage.clone(),
        cache,
        auth,
        auth_state: AuthState::new(tokens),
        rate_limiter: RateLimiter::new(cfg.rate_limit.clone(), backend),
        db_pool: Some(storage.pool().clone()),
        started_at: Instant::now(),
    };

    let server = ServerBuilder::new(state).with_config(cfg).build();
    if let Err(err) = server.run().await {
        eprintln!("Server error: {err}");
    }
}

/// Resolve the configuration file path.
///
/// Priority order:
/// 1. CLI argument: --config <path>
/// 2. Environment variable: HRMS_CONFIG
/// 3. Default: hrms.toml
fn resolve_config_path() -> (String, ConfigSource) {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(path) = args.next() {
                return (path, ConfigSource::CliArgument);
            }
        } else if let Some(path) = arg.strip_prefix("--config=") {
            return (path.to_string(), ConfigSource::CliArgument);
        }
    }

    if let Ok(path) = env::var("HRMS_CONFIG") {
        if !path.is_empty() {
            return (path, ConfigSource::EnvironmentVariable);
        }
    }

    ("hrms.toml".to_string(), ConfigSource::Default)
}

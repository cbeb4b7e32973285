//! PostgreSQL implementation of the HRMS storage traits.

use sqlx_postgres::PgPool;

use hrms_storage::StorageError;

use crate::config::PostgresConfig;
use crate::pool;
use crate::schema;

/// PostgreSQL storage backend for the HRMS data model.
///
/// Implements every entity trait from `hrms-storage`, so one instance can
/// be carried behind `Arc<dyn HrmsStorage>`. The entity implementations
/// live in their own modules (`user`, `session`, `company`, `employee`,
/// `department`, `leave`).
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Creates a new `PostgresStorage` with the given configuration.
    ///
    /// This will:
    /// 1. Create a connection pool
    /// 2. Bootstrap the schema (if configured)
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created
    /// or if schema bootstrap fails.
    pub async fn new(config: PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(&config).await?;

        if config.ensure_schema {
            schema::ensure_schema(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Creates a new `PostgresStorage` from an existing connection pool.
    ///
    /// This allows sharing a connection pool between multiple components.
    /// The schema is not bootstrapped when using this constructor.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::redirect_url::ensure_redirect_url;
use crate::utils::db_error::is_unique_violation_on_code;

/// Default bound on a single store operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL mapping store.
///
/// Every mutation is a single statement, so PostgreSQL's row locks provide the
/// atomicity guarantees: the `UNIQUE (code)` constraint arbitrates concurrent
/// creates and `access_count = access_count + 1` serializes concurrent
/// resolutions of one code.
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
    operation_timeout: Duration,
}

#[derive(sqlx::FromRow)]
struct MappingRow {
    id: i64,
    code: String,
    url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    access_count: i64,
}

impl TryFrom<MappingRow> for Mapping {
    type Error = AppError;

    fn try_from(row: MappingRow) -> Result<Self, Self::Error> {
        let access_count = u64::try_from(row.access_count).map_err(|_| {
            AppError::internal(
                "Stored access count is negative",
                json!({ "code": row.code, "access_count": row.access_count }),
            )
        })?;

        Ok(Mapping::new(
            row.id,
            row.code,
            row.url,
            row.created_at,
            row.updated_at,
            access_count,
        ))
    }
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Overrides the per-operation timeout.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Runs a store operation under the configured timeout.
    ///
    /// A timed-out statement is abandoned; PostgreSQL still commits or rolls it
    /// back as a whole.
    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>> + Send,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.operation_timeout.as_millis() as u64,
                    "Store operation timed out"
                );
                Err(AppError::store_unavailable(
                    "Store operation timed out",
                    json!({ "operation": operation }),
                ))
            }
        }
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Mapping not found", json!({ "code": code }))
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn create(&self, new_mapping: NewMapping) -> Result<Mapping, AppError> {
        ensure_redirect_url(&new_mapping.url)?;

        self.bounded("create", async {
            let result = sqlx::query_as::<_, MappingRow>(
                r#"
                INSERT INTO mappings (code, url)
                VALUES ($1, $2)
                RETURNING id, code, url, created_at, updated_at, access_count
                "#,
            )
            .bind(&new_mapping.code)
            .bind(&new_mapping.url)
            .fetch_one(self.pool.as_ref())
            .await;

            match result {
                Ok(row) => Mapping::try_from(row),
                Err(e) if is_unique_violation_on_code(&e) => {
                    Err(AppError::duplicate_code(new_mapping.code.clone()))
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn resolve_and_touch(&self, code: &str) -> Result<Mapping, AppError> {
        self.bounded("resolve_and_touch", async {
            let row = sqlx::query_as::<_, MappingRow>(
                r#"
                UPDATE mappings
                SET access_count = access_count + 1
                WHERE code = $1
                RETURNING id, code, url, created_at, updated_at, access_count
                "#,
            )
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

            Mapping::try_from(row.ok_or_else(|| not_found(code))?)
        })
        .await
    }

    async fn update(&self, code: &str, url: &str) -> Result<Mapping, AppError> {
        ensure_redirect_url(url)?;

        self.bounded("update", async {
            let row = sqlx::query_as::<_, MappingRow>(
                r#"
                UPDATE mappings
                SET url = $2,
                    updated_at = GREATEST(NOW(), created_at)
                WHERE code = $1
                RETURNING id, code, url, created_at, updated_at, access_count
                "#,
            )
            .bind(code)
            .bind(url)
            .fetch_optional(self.pool.as_ref())
            .await?;

            Mapping::try_from(row.ok_or_else(|| not_found(code))?)
        })
        .await
    }

    async fn delete(&self, code: &str) -> Result<(), AppError> {
        self.bounded("delete", async {
            let result = sqlx::query("DELETE FROM mappings WHERE code = $1")
                .bind(code)
                .execute(self.pool.as_ref())
                .await?;

            if result.rows_affected() == 0 {
                return Err(not_found(code));
            }
            Ok(())
        })
        .await
    }

    async fn get(&self, code: &str) -> Result<Mapping, AppError> {
        self.bounded("get", async {
            let row = sqlx::query_as::<_, MappingRow>(
                r#"
                SELECT id, code, url, created_at, updated_at, access_count
                FROM mappings
                WHERE code = $1
                "#,
            )
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

            Mapping::try_from(row.ok_or_else(|| not_found(code))?)
        })
        .await
    }

    async fn list(&self) -> Result<Vec<Mapping>, AppError> {
        self.bounded("list", async {
            let rows = sqlx::query_as::<_, MappingRow>(
                r#"
                SELECT id, code, url, created_at, updated_at, access_count
                FROM mappings
                ORDER BY id
                "#,
            )
            .fetch_all(self.pool.as_ref())
            .await?;

            rows.into_iter()
                .map(Mapping::try_from)
                .collect::<Result<Vec<_>, AppError>>()
        })
        .await
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        self.bounded("exists", async {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM mappings WHERE code = $1)")
                    .bind(code)
                    .fetch_one(self.pool.as_ref())
                    .await?;
            Ok::<_, AppError>(exists)
        })
        .await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.bounded("ping", async {
            sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
            Ok::<_, AppError>(())
        })
        .await
    }
}

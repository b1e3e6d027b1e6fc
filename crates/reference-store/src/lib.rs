//! Reference document store backed by PostgreSQL.
//!
//! Each document holds the per-cell reference series for one grid cell,
//! keyed by the `"<normalized_longitude>_<latitude>"` cell key. Lookup is
//! a point read; absence is a valid outcome, since reference coverage is
//! sparse (land cells have no documents).

use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool, Row};
use tracing::debug;

use audit_common::{AuditError, AuditResult};

/// Database schema, executed statement by statement on `migrate`.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS cell_series (
    cell_key   TEXT PRIMARY KEY,
    series     JSONB NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

/// One cell's stored reference series: `data[batch_index][time_offset]`.
///
/// JSON cannot encode NaN, so `null` entries carry the not-a-number marker
/// and decode to `None` here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesDocument {
    pub data: Vec<Vec<Option<f64>>>,
}

impl SeriesDocument {
    /// The reference series for one batch, with the not-a-number marker
    /// restored. A missing batch means the store and the configured archive
    /// list are out of sync, which is structural.
    pub fn reference_series(&self, batch_index: usize) -> AuditResult<Vec<f64>> {
        let batch = self.data.get(batch_index).ok_or_else(|| {
            AuditError::ShapeMismatch(format!(
                "document has {} batches, batch {} requested",
                self.data.len(),
                batch_index
            ))
        })?;
        Ok(batch.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }
}

/// Connection pool and point-read operations over the series documents.
pub struct SeriesStore {
    pool: PgPool,
}

impl SeriesStore {
    /// Create a new store connection from a database URL.
    pub async fn connect(database_url: &str) -> AuditResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect(database_url)
            .await
            .map_err(|e| AuditError::Store(format!("Connection failed: {}", e)))?;

        Ok(Self { pool })
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> AuditResult<()> {
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| AuditError::Store(format!("Migration failed: {}", e)))?;
            }
        }

        Ok(())
    }

    /// Fetch the document for a cell key. `Ok(None)` when no document
    /// exists; only query failures are errors.
    pub async fn fetch(&self, cell_key: &str) -> AuditResult<Option<SeriesDocument>> {
        let row = sqlx::query("SELECT series FROM cell_series WHERE cell_key = $1")
            .bind(cell_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuditError::Store(format!("Query failed: {}", e)))?;

        match row {
            Some(row) => {
                let Json(doc): Json<SeriesDocument> = row
                    .try_get("series")
                    .map_err(|e| AuditError::Store(format!("Malformed document for {}: {}", cell_key, e)))?;
                Ok(Some(doc))
            }
            None => {
                debug!(cell_key, "no series document");
                Ok(None)
            }
        }
    }

    /// Insert or replace a document. Used by fixtures and backfill tooling;
    /// the audit engine itself never writes.
    pub async fn put(&self, cell_key: &str, document: &SeriesDocument) -> AuditResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cell_series (cell_key, series, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (cell_key)
            DO UPDATE SET series = EXCLUDED.series, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(cell_key)
        .bind(Json(document))
        .execute(&self.pool)
        .await
        .map_err(|e| AuditError::Store(format!("Insert failed: {}", e)))?;

        Ok(())
    }
}

//! Dispatch log repository implementation
//!
//! Log rows are append-only; there is no update path.

use sqlx::PgPool;
use chrono::Utc;
use crate::models::log::{LogEntry, CreateLogRequest, ReportSummary};
use crate::utils::errors::ZapOfertasError;

#[derive(Debug, Clone)]
pub struct LogRepository {
    pool: PgPool,
}

impl LogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a log entry
    pub async fn append(&self, request: CreateLogRequest) -> Result<LogEntry, ZapOfertasError> {
        let entry = sqlx::query_as::<_, LogEntry>(
            r#"
            INSERT INTO dispatch_logs (group_name, product_title, price, status, error_message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, group_name, product_title, price, status, error_message, created_at
            "#
        )
        .bind(request.group_name)
        .bind(request.product_title)
        .bind(request.price)
        .bind(request.status)
        .bind(request.error_message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    /// List log entries, newest first
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<LogEntry>, ZapOfertasError> {
        let entries = sqlx::query_as::<_, LogEntry>(
            r#"
            SELECT id, group_name, product_title, price, status, error_message, created_at
            FROM dispatch_logs ORDER BY created_at DESC LIMIT $1 OFFSET $2
            "#
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Aggregate counts by status plus the most recent error message
    pub async fn report_summary(&self) -> Result<ReportSummary, ZapOfertasError> {
        let counts: (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE status = 'SENT'),
                   COUNT(*) FILTER (WHERE status = 'ERROR'),
                   COUNT(*) FILTER (WHERE status = 'PENDING')
            FROM dispatch_logs
            "#
        )
        .fetch_one(&self.pool)
        .await?;

        let last_error: Option<(Option<String>,)> = sqlx::query_as(
            r#"
            SELECT error_message FROM dispatch_logs
            WHERE status = 'ERROR' ORDER BY created_at DESC LIMIT 1
            "#
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(ReportSummary {
            sent: counts.0,
            errors: counts.1,
            pending: counts.2,
            last_error: last_error.and_then(|row| row.0),
        })
    }

    /// Count total log entries
    pub async fn count(&self) -> Result<i64, ZapOfertasError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM dispatch_logs")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

//! Automation configuration repository implementation
//!
//! The automation record is a single row holding the global active flag and
//! the scheduler interval. It is read at the top of each tick rather than
//! cached, so toggles take effect before the next batch starts.

use sqlx::PgPool;
use chrono::Utc;
use crate::config::ALLOWED_INTERVALS;
use crate::models::automation::AutomationConfig;
use crate::utils::errors::ZapOfertasError;

#[derive(Debug, Clone)]
pub struct AutomationRepository {
    pool: PgPool,
}

impl AutomationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the automation record, creating it with defaults if missing
    pub async fn get_or_init(&self, default_interval: i32) -> Result<AutomationConfig, ZapOfertasError> {
        if let Some(config) = sqlx::query_as::<_, AutomationConfig>(
            "SELECT id, active, interval_minutes, updated_at FROM automation_config WHERE id = 1"
        )
        .fetch_optional(&self.pool)
        .await?
        {
            return Ok(config);
        }

        let config = sqlx::query_as::<_, AutomationConfig>(
            r#"
            INSERT INTO automation_config (id, active, interval_minutes, updated_at)
            VALUES (1, false, $1, $2)
            ON CONFLICT (id) DO UPDATE SET id = automation_config.id
            RETURNING id, active, interval_minutes, updated_at
            "#
        )
        .bind(default_interval)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(config)
    }

    /// Enable or disable the scheduled automation
    pub async fn set_active(&self, active: bool) -> Result<AutomationConfig, ZapOfertasError> {
        let config = sqlx::query_as::<_, AutomationConfig>(
            r#"
            UPDATE automation_config SET active = $1, updated_at = $2 WHERE id = 1
            RETURNING id, active, interval_minutes, updated_at
            "#
        )
        .bind(active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(config)
    }

    /// Set the scheduler interval; only 5/15/30/60 minutes are accepted
    pub async fn set_interval(&self, minutes: i32) -> Result<AutomationConfig, ZapOfertasError> {
        if !ALLOWED_INTERVALS.contains(&minutes) {
            return Err(ZapOfertasError::InvalidInput(
                format!("Invalid interval: {}. Valid intervals: {:?}", minutes, ALLOWED_INTERVALS)
            ));
        }

        let config = sqlx::query_as::<_, AutomationConfig>(
            r#"
            UPDATE automation_config SET interval_minutes = $1, updated_at = $2 WHERE id = 1
            RETURNING id, active, interval_minutes, updated_at
            "#
        )
        .bind(minutes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(config)
    }
}

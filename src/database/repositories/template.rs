//! Message template repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::template::{MessageTemplate, SaveTemplateRequest};
use crate::utils::errors::ZapOfertasError;

#[derive(Debug, Clone)]
pub struct TemplateRepository {
    pool: PgPool,
}

impl TemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the active template, if one is configured
    pub async fn get_active(&self) -> Result<Option<MessageTemplate>, ZapOfertasError> {
        let template = sqlx::query_as::<_, MessageTemplate>(
            r#"
            SELECT id, name, content, is_active, created_at, updated_at
            FROM message_templates WHERE is_active = true
            ORDER BY updated_at DESC LIMIT 1
            "#
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(template)
    }

    /// Save a template; activating one deactivates the others
    pub async fn save(&self, request: SaveTemplateRequest) -> Result<MessageTemplate, ZapOfertasError> {
        let mut tx = self.pool.begin().await?;

        if request.is_active {
            sqlx::query("UPDATE message_templates SET is_active = false WHERE is_active = true")
                .execute(&mut *tx)
                .await?;
        }

        let template = sqlx::query_as::<_, MessageTemplate>(
            r#"
            INSERT INTO message_templates (name, content, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO UPDATE
            SET content = EXCLUDED.content,
                is_active = EXCLUDED.is_active,
                updated_at = EXCLUDED.updated_at
            RETURNING id, name, content, is_active, created_at, updated_at
            "#
        )
        .bind(request.name)
        .bind(request.content)
        .bind(request.is_active)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(template)
    }

    /// List all templates
    pub async fn list(&self) -> Result<Vec<MessageTemplate>, ZapOfertasError> {
        let templates = sqlx::query_as::<_, MessageTemplate>(
            r#"
            SELECT id, name, content, is_active, created_at, updated_at
            FROM message_templates ORDER BY created_at ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(templates)
    }

    /// Delete a template
    pub async fn delete(&self, id: i64) -> Result<(), ZapOfertasError> {
        sqlx::query("DELETE FROM message_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

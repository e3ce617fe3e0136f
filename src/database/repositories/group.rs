//! Group repository implementation

use sqlx::PgPool;
use sqlx::types::Json;
use chrono::Utc;
use crate::models::group::{Group, CategoryRef, RotationState, SortType, CreateGroupRequest, UpdateGroupRequest};
use crate::utils::errors::ZapOfertasError;

#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new group
    pub async fn create(&self, request: CreateGroupRequest) -> Result<Group, ZapOfertasError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (name, invite_link, keywords, blacklist, category_label,
                                product_categories, sort_type, rotation_state, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, name, invite_link, chat_id, is_active, keywords, blacklist,
                      category_label, product_categories, sort_type, min_discount, min_rating,
                      min_sales, rotation_enabled, rotation_empty_threshold,
                      rotation_cooldown_minutes, rotation_state, last_sent_at, created_at, updated_at
            "#
        )
        .bind(request.name)
        .bind(request.invite_link)
        .bind(Json(request.keywords.unwrap_or_default()))
        .bind(Json(request.blacklist.unwrap_or_default()))
        .bind(request.category_label)
        .bind(Json(request.product_categories.unwrap_or_default()))
        .bind(request.sort_type.unwrap_or(SortType::SalesDesc))
        .bind(Json(RotationState::default()))
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    /// Find group by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Group>, ZapOfertasError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, name, invite_link, chat_id, is_active, keywords, blacklist,
                   category_label, product_categories, sort_type, min_discount, min_rating,
                   min_sales, rotation_enabled, rotation_empty_threshold,
                   rotation_cooldown_minutes, rotation_state, last_sent_at, created_at, updated_at
            FROM groups WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Update group settings
    pub async fn update(&self, id: i64, request: UpdateGroupRequest) -> Result<Group, ZapOfertasError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            UPDATE groups
            SET name = COALESCE($2, name),
                invite_link = COALESCE($3, invite_link),
                chat_id = COALESCE($4, chat_id),
                is_active = COALESCE($5, is_active),
                keywords = COALESCE($6, keywords),
                blacklist = COALESCE($7, blacklist),
                category_label = COALESCE($8, category_label),
                product_categories = COALESCE($9, product_categories),
                sort_type = COALESCE($10, sort_type),
                min_discount = COALESCE($11, min_discount),
                min_rating = COALESCE($12, min_rating),
                min_sales = COALESCE($13, min_sales),
                rotation_enabled = COALESCE($14, rotation_enabled),
                rotation_empty_threshold = COALESCE($15, rotation_empty_threshold),
                rotation_cooldown_minutes = COALESCE($16, rotation_cooldown_minutes),
                updated_at = $17
            WHERE id = $1
            RETURNING id, name, invite_link, chat_id, is_active, keywords, blacklist,
                      category_label, product_categories, sort_type, min_discount, min_rating,
                      min_sales, rotation_enabled, rotation_empty_threshold,
                      rotation_cooldown_minutes, rotation_state, last_sent_at, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(request.name)
        .bind(request.invite_link)
        .bind(request.chat_id)
        .bind(request.is_active)
        .bind(request.keywords.map(Json))
        .bind(request.blacklist.map(Json))
        .bind(request.category_label)
        .bind(request.product_categories.map(Json))
        .bind(request.sort_type)
        .bind(request.min_discount)
        .bind(request.min_rating)
        .bind(request.min_sales)
        .bind(request.rotation_enabled)
        .bind(request.rotation_empty_threshold)
        .bind(request.rotation_cooldown_minutes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    /// Delete group (the embedded rotation state goes with the row)
    pub async fn delete(&self, id: i64) -> Result<(), ZapOfertasError> {
        sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List all groups with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Group>, ZapOfertasError> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, name, invite_link, chat_id, is_active, keywords, blacklist,
                   category_label, product_categories, sort_type, min_discount, min_rating,
                   min_sales, rotation_enabled, rotation_empty_threshold,
                   rotation_cooldown_minutes, rotation_state, last_sent_at, created_at, updated_at
            FROM groups ORDER BY created_at DESC LIMIT $1 OFFSET $2
            "#
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    /// Get groups eligible for dispatch, in creation order
    pub async fn get_active_groups(&self) -> Result<Vec<Group>, ZapOfertasError> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, name, invite_link, chat_id, is_active, keywords, blacklist,
                   category_label, product_categories, sort_type, min_discount, min_rating,
                   min_sales, rotation_enabled, rotation_empty_threshold,
                   rotation_cooldown_minutes, rotation_state, last_sent_at, created_at, updated_at
            FROM groups WHERE is_active = true ORDER BY created_at ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    /// Persist the rotation state mutated by the rotation engine
    pub async fn update_rotation_state(&self, id: i64, state: &RotationState) -> Result<(), ZapOfertasError> {
        sqlx::query(
            "UPDATE groups SET rotation_state = $2, updated_at = $3 WHERE id = $1"
        )
        .bind(id)
        .bind(Json(state))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist rotation state and last-sent timestamp after a successful dispatch
    pub async fn record_dispatch(&self, id: i64, state: &RotationState) -> Result<(), ZapOfertasError> {
        sqlx::query(
            "UPDATE groups SET rotation_state = $2, last_sent_at = $3, updated_at = $3 WHERE id = $1"
        )
        .bind(id)
        .bind(Json(state))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replace a group's category list with canonical numeric ids
    ///
    /// Configuration-save time is where named categories are resolved, so
    /// the hot path never type-sniffs.
    pub async fn save_resolved_categories(&self, id: i64, categories: &[CategoryRef]) -> Result<(), ZapOfertasError> {
        sqlx::query(
            "UPDATE groups SET product_categories = $2, updated_at = $3 WHERE id = $1"
        )
        .bind(id)
        .bind(Json(categories))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Count total groups
    pub async fn count(&self) -> Result<i64, ZapOfertasError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM groups")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

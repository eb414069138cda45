//! Repository for the `video_group` table.

use sqlx::PgPool;
use vcat_core::types::DbId;

use crate::models::video_group::{VideoGroup, VideoGroupInput, GROUP_VISIBLE};

/// Column list for `video_group` queries.
const COLUMNS: &str = "id, title, is_hide, created_at, updated_at";

/// Provides lookup-or-create access for video groups.
pub struct VideoGroupRepo;

impl VideoGroupRepo {
    /// Find a live group by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<VideoGroup>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM video_group WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, VideoGroup>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Return the live group with this title, creating it when absent.
    ///
    /// New groups take `is_hide` from the input or default to visible. An
    /// existing group is returned unchanged.
    pub async fn find_or_create_by_title(
        pool: &PgPool,
        input: &VideoGroupInput,
    ) -> Result<VideoGroup, sqlx::Error> {
        let query = format!(
            "INSERT INTO video_group (title, is_hide) \
             VALUES ($1, $2) \
             ON CONFLICT (title) WHERE deleted_at IS NULL \
             DO UPDATE SET title = EXCLUDED.title \
             RETURNING {COLUMNS}"
        );
        let group = sqlx::query_as::<_, VideoGroup>(&query)
            .bind(input.title.trim())
            .bind(input.is_hide.unwrap_or(GROUP_VISIBLE))
            .fetch_one(pool)
            .await?;

        tracing::debug!(group_id = group.id, title = %group.title, "Video group resolved");
        Ok(group)
    }
}

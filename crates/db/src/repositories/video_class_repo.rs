//! Repository for the `video_class` table.

use sqlx::PgPool;
use vcat_core::types::DbId;

use crate::models::video_class::{VideoClass, VideoClassInput, VideoClassTree};

/// Column list for `video_class` queries.
const COLUMNS: &str = "id, type_id, type_name, type_pid, created_at, updated_at";

/// Provides upsert and tree access for video classes.
pub struct VideoClassRepo;

impl VideoClassRepo {
    /// Find a live class by its external `type_id`.
    pub async fn find_by_type_id(
        pool: &PgPool,
        type_id: DbId,
    ) -> Result<Option<VideoClass>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM video_class WHERE type_id = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, VideoClass>(&query)
            .bind(type_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or update the class keyed by `type_id`.
    ///
    /// Returns `None` without touching the table when `type_id` is 0. An
    /// empty `type_name` never overwrites a stored one.
    pub async fn upsert_by_type_id(
        pool: &PgPool,
        input: &VideoClassInput,
    ) -> Result<Option<VideoClass>, sqlx::Error> {
        if input.type_id == 0 {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO video_class (type_id, type_name, type_pid) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (type_id) WHERE deleted_at IS NULL \
             DO UPDATE SET \
                 type_name = COALESCE(NULLIF(EXCLUDED.type_name, ''), video_class.type_name), \
                 type_pid = EXCLUDED.type_pid \
             RETURNING {COLUMNS}"
        );
        let class = sqlx::query_as::<_, VideoClass>(&query)
            .bind(input.type_id)
            .bind(input.type_name.trim())
            .bind(input.type_pid)
            .fetch_one(pool)
            .await?;

        tracing::debug!(type_id = class.type_id, type_pid = class.type_pid, "Video class upserted");
        Ok(Some(class))
    }

    /// Top-level classes (`type_pid = 0`) with their direct children.
    pub async fn list_tree(pool: &PgPool) -> Result<Vec<VideoClassTree>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM video_class \
             WHERE deleted_at IS NULL \
             ORDER BY type_pid, type_id"
        );
        let classes = sqlx::query_as::<_, VideoClass>(&query)
            .fetch_all(pool)
            .await?;

        let (roots, children): (Vec<_>, Vec<_>) =
            classes.into_iter().partition(|c| c.type_pid == 0);

        let tree = roots
            .into_iter()
            .map(|class| {
                let video_class_son = children
                    .iter()
                    .filter(|c| c.type_pid == class.type_id)
                    .cloned()
                    .collect();
                VideoClassTree {
                    class,
                    video_class_son,
                }
            })
            .collect();

        Ok(tree)
    }
}

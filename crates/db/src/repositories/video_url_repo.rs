//! Repository for the `video_url` table.

use sqlx::{PgExecutor, PgPool};
use vcat_core::types::DbId;

use crate::models::video_url::{VideoUrl, VideoUrlInput};

/// Column list for `video_url` queries.
const COLUMNS: &str = "id, video_id, url, proxy, proxy_name, created_at, updated_at";

/// Provides playback URL persistence.
pub struct VideoUrlRepo;

impl VideoUrlRepo {
    /// List the live URL variants of a video, oldest first.
    pub async fn list_by_video(pool: &PgPool, video_id: DbId) -> Result<Vec<VideoUrl>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM video_url \
             WHERE video_id = $1 AND deleted_at IS NULL \
             ORDER BY id"
        );
        sqlx::query_as::<_, VideoUrl>(&query)
            .bind(video_id)
            .fetch_all(pool)
            .await
    }

    /// Insert or refresh the variant keyed by `(video_id, proxy_name)`.
    ///
    /// Returns `None` when the input lacks a URL or proxy.
    pub async fn upsert<'e, E>(
        executor: E,
        video_id: DbId,
        input: &VideoUrlInput,
    ) -> Result<Option<VideoUrl>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if !input.is_usable() {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO video_url (video_id, url, proxy, proxy_name) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT ON CONSTRAINT uq_video_url_video_proxy_name \
             DO UPDATE SET url = EXCLUDED.url, proxy = EXCLUDED.proxy, deleted_at = NULL \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, VideoUrl>(&query)
            .bind(video_id)
            .bind(input.url.trim())
            .bind(input.proxy.trim())
            .bind(input.proxy_name.trim())
            .fetch_one(executor)
            .await?;
        Ok(Some(row))
    }
}

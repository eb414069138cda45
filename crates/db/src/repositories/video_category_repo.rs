//! Repository for the `video_category` junction table.
//!
//! The junction is owned by [`VideoCategoryRepo::reconcile`]: rows are only
//! ever inserted or deleted, never updated.

use sqlx::PgPool;
use vcat_core::reconcile;
use vcat_core::types::DbId;

use crate::models::video_category::{ReconcileOutcome, VideoCategory};

/// Column list for `video_category` queries.
const COLUMNS: &str = "id, video_id, category_id, created_at, updated_at";

/// Provides read access and set reconciliation for video/category links.
pub struct VideoCategoryRepo;

impl VideoCategoryRepo {
    /// List junction rows for a video, oldest first.
    pub async fn list_by_video(
        pool: &PgPool,
        video_id: DbId,
    ) -> Result<Vec<VideoCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM video_category \
             WHERE video_id = $1 \
             ORDER BY id"
        );
        sqlx::query_as::<_, VideoCategory>(&query)
            .bind(video_id)
            .fetch_all(pool)
            .await
    }

    /// Category ids currently linked to a video.
    pub async fn category_ids(pool: &PgPool, video_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT category_id FROM video_category WHERE video_id = $1 ORDER BY id",
        )
        .bind(video_id)
        .fetch_all(pool)
        .await
    }

    /// Make the set of categories linked to `video_id` exactly `requested`.
    ///
    /// Reads the current links, inserts the missing ones in one statement and
    /// deletes the surplus ones in another, all inside a single transaction.
    /// Identical sets issue no writes. Any failure rolls the whole thing back.
    pub async fn reconcile(
        pool: &PgPool,
        video_id: DbId,
        requested: &[DbId],
    ) -> Result<ReconcileOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing = sqlx::query_scalar::<_, DbId>(
            "SELECT category_id FROM video_category WHERE video_id = $1 ORDER BY id",
        )
        .bind(video_id)
        .fetch_all(&mut *tx)
        .await?;

        let plan = reconcile::plan(&existing, requested);
        let mut outcome = ReconcileOutcome::default();

        if plan.is_noop() {
            tracing::debug!(video_id, "Video categories already in sync");
            return Ok(outcome);
        }

        if !plan.to_create.is_empty() {
            let result = sqlx::query(
                "INSERT INTO video_category (video_id, category_id) \
                 SELECT $1, UNNEST($2::BIGINT[])",
            )
            .bind(video_id)
            .bind(&plan.to_create)
            .execute(&mut *tx)
            .await?;
            outcome.created = result.rows_affected();
        }

        if !plan.to_delete.is_empty() {
            let result = sqlx::query(
                "DELETE FROM video_category \
                 WHERE video_id = $1 AND category_id = ANY($2)",
            )
            .bind(video_id)
            .bind(&plan.to_delete)
            .execute(&mut *tx)
            .await?;
            outcome.deleted = result.rows_affected();
        }

        tx.commit().await?;

        tracing::debug!(
            video_id,
            created = outcome.created,
            deleted = outcome.deleted,
            "Video categories reconciled",
        );

        Ok(outcome)
    }
}

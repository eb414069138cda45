//! Fire-and-forget browse counter increments.

use sqlx::PgPool;
use tokio::task::JoinHandle;
use vcat_core::types::DbId;
use vcat_db::repositories::VideoRepo;

/// Bump the browse counter of `video_id` on a detached task.
///
/// The caller does not wait for the update; errors are logged at `warn`.
/// The handle is returned so tests can await completion.
pub fn spawn_increment(pool: PgPool, video_id: DbId) -> JoinHandle<()> {
    tokio::spawn(async move {
        match VideoRepo::increment_browse(&pool, video_id).await {
            Ok(true) => tracing::debug!(video_id, "Browse counter incremented"),
            Ok(false) => tracing::debug!(video_id, "Browse increment skipped: video not live"),
            Err(e) => {
                tracing::warn!(video_id, error = %e, "Browse increment failed");
            }
        }
    })
}

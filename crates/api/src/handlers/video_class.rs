use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use vcat_db::repositories::VideoClassRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/video_class/list
///
/// Top-level video classes with their children.
pub async fn list_classes(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tree = VideoClassRepo::list_tree(&state.pool).await?;

    Ok(Json(DataResponse { data: tree }))
}

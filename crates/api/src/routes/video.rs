//! Route definitions for videos, mounted at `/video`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::video;
use crate::state::AppState;

/// ```text
/// GET    /list      -> list_videos
/// GET    /get       -> get_video
/// POST   /create    -> create_video
/// POST   /update    -> update_video
/// POST   /delete    -> delete_video
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", get(video::list_videos))
        .route("/get", get(video::get_video))
        .route("/create", post(video::create_video))
        .route("/update", post(video::update_video))
        .route("/delete", post(video::delete_video))
}

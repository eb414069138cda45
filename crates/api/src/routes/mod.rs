pub mod category;
pub mod health;
pub mod video;
pub mod video_class;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /video/list                  search list (GET)
/// /video/get                   detail by ?Id= (GET)
/// /video/create                create or update by title (POST)
/// /video/update                not implemented (POST)
/// /video/delete                soft delete (POST)
///
/// /category/list               home trees (GET)
///
/// /video_class/list            class tree (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/video", video::router())
        .nest("/category", category::router())
        .nest("/video_class", video_class::router())
}

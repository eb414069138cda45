use axum::routing::get;
use axum::Router;

use crate::handlers::video_class;
use crate::state::AppState;

/// Video class routes mounted at `/video_class`.
///
/// ```text
/// GET    /list      -> list_classes
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/list", get(video_class::list_classes))
}

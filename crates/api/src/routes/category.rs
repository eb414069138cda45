use axum::routing::get;
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

/// Category routes mounted at `/category`.
///
/// ```text
/// GET    /list      -> list_categories
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/list", get(category::list_categories))
}

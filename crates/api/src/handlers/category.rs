//! Handlers for the category trees.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use vcat_db::repositories::CategoryRepo;

use crate::error::AppResult;
use crate::query::TypeIdParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/category/list
///
/// The three home-page trees (type, year, region). `TypeId` narrows the
/// type tree to one parent class.
pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<TypeIdParams>,
) -> AppResult<impl IntoResponse> {
    let type_id = params.type_id()?;
    let trees = CategoryRepo::home_trees(&state.pool, type_id).await?;

    Ok(Json(DataResponse { data: trees }))
}

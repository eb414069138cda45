//! Handlers for videos: search list, detail, create-or-update and delete.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use vcat_core::error::CoreError;
use vcat_core::types::{DbId, CATEGORY_TYPE_MOVIE};
use vcat_db::models::category::ClassStamp;
use vcat_db::models::video::{CreateVideoRequest, DeleteVideoRequest, UpsertVideo};
use vcat_db::repositories::{
    CategoryRepo, VideoCategoryRepo, VideoClassRepo, VideoGroupRepo, VideoRepo,
};

use crate::background::browse;
use crate::error::{AppError, AppResult};
use crate::query::{IdParams, VideoListParams};
use crate::response::{DataResponse, DetailResponse, ListResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/video/list
///
/// Keyword search, category intersection and parent-type filter with
/// offset or cursor pagination.
pub async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<VideoListParams>,
) -> AppResult<impl IntoResponse> {
    let search = params.into_search()?;
    let page = VideoRepo::list(&state.pool, &search).await?;
    let last_id = page.last_id();

    Ok(Json(ListResponse {
        data: page.videos,
        last_id,
        total: page.total,
    }))
}

/// GET /api/v1/video/get
///
/// Video detail with playback URLs, group episodes and the category tree
/// limited to the video's own categories. Bumps the browse counter in the
/// background.
pub async fn get_video(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> AppResult<impl IntoResponse> {
    let id = params.id()?;

    let detail = VideoRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }))?;
    let category = CategoryRepo::tree_for_video(&state.pool, id).await?;

    browse::spawn_increment(state.pool.clone(), id);

    Ok(Json(DetailResponse {
        data: detail,
        category,
    }))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /api/v1/video/create
///
/// Upsert a video by `(Title, TypePid)` together with everything it
/// references, in dependency order:
///
/// 1. video class (by `TypeId`)
/// 2. category taxonomy (dimension nodes and leaves, usage counters)
/// 3. video group (by title)
/// 4. the video row and its playback URL
/// 5. video/category links, reconciled to exactly the built set
pub async fn create_video(
    State(state): State<AppState>,
    Json(input): Json<CreateVideoRequest>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title must not be empty".to_string(),
        )));
    }

    let class = match &input.video_class {
        Some(class_input) => VideoClassRepo::upsert_by_type_id(&state.pool, class_input).await?,
        None => None,
    };
    let stamp = ClassStamp {
        type_id: first_nonzero(input.type_id, class.as_ref().map(|c| c.type_id)),
        type_pid: first_nonzero(input.type_pid, class.as_ref().map(|c| c.type_pid)),
    };

    let category_ids = CategoryRepo::build_taxonomy(
        &state.pool,
        category_kind(&input),
        &input.category,
        stamp,
        state.config.taxonomy_policy,
    )
    .await?;

    let group_id = match input
        .video_group
        .as_ref()
        .filter(|g| !g.title.trim().is_empty())
    {
        Some(group) => Some(VideoGroupRepo::find_or_create_by_title(&state.pool, group).await?.id),
        None => None,
    };

    let upsert = UpsertVideo {
        title: input.title.trim().to_string(),
        alias: non_empty(&input.alias),
        describe: non_empty(&input.describe),
        connection: input.connection,
        url: non_empty(&input.url),
        cover: non_empty(&input.cover),
        video_group_id: group_id,
        kind: input.kind,
        keywords: non_empty(&input.keywords),
        type_pid: stamp.type_pid,
        type_id: (stamp.type_id != 0).then_some(stamp.type_id),
    };
    let (video, _) =
        VideoRepo::save_with_url(&state.pool, &upsert, input.video_url.as_ref()).await?;

    let outcome = VideoCategoryRepo::reconcile(&state.pool, video.id, &category_ids).await?;

    tracing::info!(
        video_id = video.id,
        title = %video.title,
        categories = category_ids.len(),
        links_created = outcome.created,
        links_deleted = outcome.deleted,
        "Video saved",
    );

    Ok(Json(DataResponse { data: video }))
}

/// POST /api/v1/video/update
///
/// Routed for client compatibility; updates go through `create`.
pub async fn update_video() -> AppResult<Json<DataResponse<()>>> {
    Err(AppError::NotImplemented("Video update"))
}

/// POST /api/v1/video/delete
///
/// Soft-delete a video. Its category links are left for reconciliation.
pub async fn delete_video(
    State(state): State<AppState>,
    Json(input): Json<DeleteVideoRequest>,
) -> AppResult<impl IntoResponse> {
    let deleted = VideoRepo::soft_delete(&state.pool, input.id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id: input.id,
        }));
    }

    tracing::info!(video_id = input.id, "Video deleted");

    Ok(Json(DataResponse { data: input.id }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Category `type` discriminator: the first group's `Type`, else the
/// video's own `Type`, else movie.
fn category_kind(input: &CreateVideoRequest) -> i16 {
    input
        .category
        .first()
        .and_then(|g| g.kind)
        .or(input.kind)
        .unwrap_or(CATEGORY_TYPE_MOVIE)
}

fn first_nonzero(value: DbId, fallback: Option<DbId>) -> DbId {
    if value != 0 {
        value
    } else {
        fallback.unwrap_or(0)
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

//! Repository for the `video` table.
//!
//! Besides plain lookups this owns the title-keyed upsert used by the create
//! endpoint and the search list, whose filter and relevance score are built
//! from a [`KeywordPlan`].

use sqlx::{PgExecutor, PgPool};
use vcat_core::search::{
    KeywordPlan, FULLTEXT_RANK_WEIGHT, SCORE_ALIAS_MATCH, SCORE_EXACT_TITLE,
    SCORE_KEYWORDS_MATCH, SCORE_TITLE_MATCH, TS_CONFIG,
};
use vcat_core::types::DbId;

use crate::models::video::{UpsertVideo, Video, VideoDetail, VideoPage, VideoSearch};
use crate::models::video_url::{VideoUrl, VideoUrlInput};
use crate::repositories::VideoUrlRepo;

/// Column list for `video` queries.
const COLUMNS: &str = "\
    id, title, alias, describe, connection, url, cover, video_group_id, type, \
    keywords, type_pid, type_id, browse, created_at, updated_at, deleted_at";

/// Provides CRUD and search operations for videos.
pub struct VideoRepo;

impl VideoRepo {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a video or update the live row sharing its `(title, type_pid)`.
    ///
    /// `None` fields keep the stored value on update and fall back to the
    /// column default on insert. The caller is responsible for rejecting an
    /// empty title.
    pub async fn upsert_by_title<'e, E>(executor: E, input: &UpsertVideo) -> Result<Video, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO video \
                 (title, alias, describe, connection, url, cover, video_group_id, type, \
                  keywords, type_pid, type_id) \
             VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), $4, COALESCE($5, ''), \
                     COALESCE($6, ''), COALESCE($7, 0), $8, COALESCE($9, ''), $10, \
                     COALESCE($11, 0)) \
             ON CONFLICT (title, type_pid) WHERE deleted_at IS NULL \
             DO UPDATE SET \
                 alias = COALESCE($2, video.alias), \
                 describe = COALESCE($3, video.describe), \
                 connection = COALESCE($4, video.connection), \
                 url = COALESCE($5, video.url), \
                 cover = COALESCE($6, video.cover), \
                 video_group_id = COALESCE($7, video.video_group_id), \
                 type = COALESCE($8, video.type), \
                 keywords = COALESCE($9, video.keywords), \
                 type_id = COALESCE($11, video.type_id) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(input.title.trim())
            .bind(input.alias.as_deref())
            .bind(input.describe.as_deref())
            .bind(input.connection)
            .bind(input.url.as_deref())
            .bind(input.cover.as_deref())
            .bind(input.video_group_id)
            .bind(input.kind)
            .bind(input.keywords.as_deref())
            .bind(input.type_pid)
            .bind(input.type_id)
            .fetch_one(executor)
            .await
    }

    /// Upsert the video and its playback URL in one transaction.
    pub async fn save_with_url(
        pool: &PgPool,
        input: &UpsertVideo,
        url: Option<&VideoUrlInput>,
    ) -> Result<(Video, Option<VideoUrl>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let video = Self::upsert_by_title(&mut *tx, input).await?;
        let video_url = match url {
            Some(url) => VideoUrlRepo::upsert(&mut *tx, video.id, url).await?,
            None => None,
        };

        tx.commit().await?;

        tracing::debug!(
            video_id = video.id,
            has_url = video_url.is_some(),
            "Video saved",
        );

        Ok((video, video_url))
    }

    /// Soft-delete a video. Returns `true` if a live row was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE video SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bump the browse counter of a live video by one.
    pub async fn increment_browse(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE video SET browse = browse + 1 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find a live video by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM video WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Live videos of a group, oldest first. Group 0 means "no group".
    pub async fn list_by_group(pool: &PgPool, group_id: DbId) -> Result<Vec<Video>, sqlx::Error> {
        if group_id == 0 {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {COLUMNS} FROM video \
             WHERE video_group_id = $1 AND deleted_at IS NULL \
             ORDER BY id"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(group_id)
            .fetch_all(pool)
            .await
    }

    /// A live video with its playback URLs and group episodes.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<VideoDetail>, sqlx::Error> {
        let Some(video) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let video_url_arr = VideoUrlRepo::list_by_video(pool, video.id).await?;
        let video_list = Self::list_by_group(pool, video.video_group_id).await?;

        Ok(Some(VideoDetail {
            video,
            video_url_arr,
            video_list,
        }))
    }

    /// Search, filter and page the catalog.
    ///
    /// The count runs first with the same predicate; when nothing matches
    /// the page query is skipped.
    pub async fn list(pool: &PgPool, search: &VideoSearch) -> Result<VideoPage, sqlx::Error> {
        let filter = build_video_filter(search);

        let count_query = format!("SELECT COUNT(*)::BIGINT FROM video {}", filter.where_clause);
        let total = bind_video_values_scalar(
            sqlx::query_scalar::<_, i64>(&count_query),
            &filter.bind_values,
        )
        .fetch_one(pool)
        .await?;

        if total == 0 {
            return Ok(VideoPage::default());
        }

        let mut bind_values = filter.bind_values;
        let mut bind_idx = filter.next_idx;
        let mut conditions = vec![filter.where_clause];

        let order_by = match filter.keyword_params {
            Some(params) => {
                bind_values.push(BindValue::Text(plan_keyword(&search.plan).to_string()));
                let score = score_expression(&search.plan, params, bind_idx);
                bind_idx += 1;
                format!("({score}) DESC, browse DESC, id DESC")
            }
            None if search.category_ids.is_empty() => "id DESC".to_string(),
            None => "browse DESC, id DESC".to_string(),
        };

        if let Some(cursor) = search.pagination.cursor {
            conditions.push(format!("id > ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::BigInt(cursor));
        }

        let query = format!(
            "SELECT {COLUMNS} FROM video {} \
             ORDER BY {order_by} \
             LIMIT ${bind_idx} OFFSET ${}",
            conditions.join(" AND "),
            bind_idx + 1
        );

        let videos = bind_video_values(sqlx::query_as::<_, Video>(&query), &bind_values)
            .bind(search.pagination.limit)
            .bind(search.pagination.offset)
            .fetch_all(pool)
            .await?;

        tracing::debug!(
            total,
            returned = videos.len(),
            keyword_active = search.plan.is_active(),
            categories = search.category_ids.len(),
            "Video list query",
        );

        Ok(VideoPage { videos, total })
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built video queries.
enum BindValue {
    BigInt(i64),
    BigIntArray(Vec<i64>),
    Text(String),
}

/// Placeholder positions of the keyword parameters inside the filter.
#[derive(Clone, Copy)]
struct KeywordParams {
    pattern_idx: u32,
    tsquery_idx: Option<u32>,
}

/// WHERE clause shared by the count and page queries.
struct VideoFilter {
    /// Always starts with `WHERE ` since soft-deleted rows are never listed.
    where_clause: String,
    bind_values: Vec<BindValue>,
    next_idx: u32,
    keyword_params: Option<KeywordParams>,
}

/// Build the WHERE clause and bind values from the search filters.
fn build_video_filter(search: &VideoSearch) -> VideoFilter {
    let mut conditions: Vec<String> = vec!["deleted_at IS NULL".to_string()];
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();
    let mut keyword_params = None;

    match &search.plan {
        KeywordPlan::None => {}
        KeywordPlan::Substring { pattern, .. } => {
            let p = bind_idx;
            conditions.push(format!(
                "(title ILIKE ${p} OR alias ILIKE ${p} OR keywords ILIKE ${p})"
            ));
            bind_idx += 1;
            bind_values.push(BindValue::Text(pattern.clone()));
            keyword_params = Some(KeywordParams {
                pattern_idx: p,
                tsquery_idx: None,
            });
        }
        KeywordPlan::Token {
            pattern, tsquery, ..
        } => {
            let q = bind_idx;
            let p = bind_idx + 1;
            let func = tsquery.sql_function();
            conditions.push(format!(
                "(to_tsvector('{TS_CONFIG}', title) @@ {func}('{TS_CONFIG}', ${q}) \
                 OR title ILIKE ${p} OR alias ILIKE ${p} OR keywords ILIKE ${p})"
            ));
            bind_idx += 2;
            bind_values.push(BindValue::Text(tsquery.text().to_string()));
            bind_values.push(BindValue::Text(pattern.clone()));
            keyword_params = Some(KeywordParams {
                pattern_idx: p,
                tsquery_idx: Some(q),
            });
        }
    }

    if !search.category_ids.is_empty() {
        conditions.push(format!(
            "id IN (SELECT video_id FROM video_category \
                    WHERE category_id = ANY(${bind_idx}) \
                    GROUP BY video_id \
                    HAVING COUNT(DISTINCT category_id) = ${})",
            bind_idx + 1
        ));
        bind_idx += 2;
        bind_values.push(BindValue::BigIntArray(search.category_ids.clone()));
        bind_values.push(BindValue::BigInt(search.category_ids.len() as i64));
    }

    if let Some(type_pid) = search.type_pid.filter(|t| *t > 0) {
        conditions.push(format!("type_pid = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(type_pid));
    }

    VideoFilter {
        where_clause: format!("WHERE {}", conditions.join(" AND ")),
        bind_values,
        next_idx: bind_idx,
        keyword_params,
    }
}

fn plan_keyword(plan: &KeywordPlan) -> &str {
    match plan {
        KeywordPlan::None => "",
        KeywordPlan::Substring { keyword, .. } | KeywordPlan::Token { keyword, .. } => keyword,
    }
}

/// Relevance score for a keyword search; `keyword_idx` holds the raw keyword.
///
/// Substring mode scores the best matching tier. Token mode adds the
/// weighted full-text rank, the exact-title bonus and the tier bonus.
fn score_expression(plan: &KeywordPlan, params: KeywordParams, keyword_idx: u32) -> String {
    let p = params.pattern_idx;
    let k = keyword_idx;
    let tier = format!(
        "CASE WHEN title ILIKE ${p} THEN {SCORE_TITLE_MATCH} \
              WHEN alias ILIKE ${p} THEN {SCORE_ALIAS_MATCH} \
              WHEN keywords ILIKE ${p} THEN {SCORE_KEYWORDS_MATCH} \
              ELSE 0 END"
    );

    match (plan, params.tsquery_idx) {
        (KeywordPlan::Token { tsquery, .. }, Some(q)) => {
            let func = tsquery.sql_function();
            format!(
                "ts_rank(to_tsvector('{TS_CONFIG}', title), {func}('{TS_CONFIG}', ${q})) \
                     * {FULLTEXT_RANK_WEIGHT} \
                 + (CASE WHEN title = ${k} THEN {SCORE_EXACT_TITLE} ELSE 0 END) \
                 + ({tier})"
            )
        }
        _ => format!(
            "CASE WHEN title = ${k} THEN {SCORE_EXACT_TITLE} \
                  WHEN title ILIKE ${p} THEN {SCORE_TITLE_MATCH} \
                  WHEN alias ILIKE ${p} THEN {SCORE_ALIAS_MATCH} \
                  WHEN keywords ILIKE ${p} THEN {SCORE_KEYWORDS_MATCH} \
                  ELSE 0 END"
        ),
    }
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_video_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::BigIntArray(v) => q = q.bind(v.as_slice()),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_video_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::BigIntArray(v) => q = q.bind(v.as_slice()),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

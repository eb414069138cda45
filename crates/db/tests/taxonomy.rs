//! Integration tests for the category taxonomy builder and tree projections.
//!
//! - Dimension nodes created once and reused by exact name
//! - Leaf upsert bumps `video_count` and stamps class ids on type leaves only
//! - Year/region filtering and alias collapse
//! - Groups without labels contribute their dimension id
//! - Home trees and per-video trees

use sqlx::PgPool;
use vcat_core::taxonomy::TaxonomyPolicy;
use vcat_core::types::{DbId, CATEGORY_TYPE_MOVIE, CATEGORY_TYPE_SERIES};
use vcat_db::models::category::{CategoryGroupInput, CategoryLabelInput, ClassStamp};
use vcat_db::models::video::UpsertVideo;
use vcat_db::repositories::{CategoryRepo, VideoCategoryRepo, VideoRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn group(name: &str, labels: &[&str]) -> CategoryGroupInput {
    CategoryGroupInput {
        name: name.to_string(),
        kind: Some(1),
        category: labels
            .iter()
            .map(|l| CategoryLabelInput {
                name: l.to_string(),
            })
            .collect(),
    }
}

const STAMP: ClassStamp = ClassStamp {
    type_id: 6,
    type_pid: 1,
};

async fn build(pool: &PgPool, groups: &[CategoryGroupInput]) -> Vec<DbId> {
    CategoryRepo::build_taxonomy(pool, 1, groups, STAMP, TaxonomyPolicy::FailFast)
        .await
        .unwrap()
}

async fn leaf_names(pool: &PgPool, ids: &[DbId]) -> Vec<String> {
    let mut names = Vec::new();
    for id in ids {
        names.push(CategoryRepo::find_by_id(pool, *id).await.unwrap().unwrap().name);
    }
    names
}

// ---------------------------------------------------------------------------
// Test: builder
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_type_labels_create_leaves_under_dimension(pool: PgPool) {
    let ids = build(&pool, &[group("类型", &["动作,喜剧"])]).await;
    assert_eq!(ids.len(), 2);
    assert_eq!(leaf_names(&pool, &ids).await, vec!["动作", "喜剧"]);

    let dimension = CategoryRepo::find_dimension(&pool, "类型")
        .await
        .unwrap()
        .expect("dimension created");
    assert_eq!(dimension.parent_id, 0);

    for id in &ids {
        let leaf = CategoryRepo::find_by_id(&pool, *id).await.unwrap().unwrap();
        assert_eq!(leaf.parent_id, dimension.id);
        assert_eq!(leaf.video_count, 1);
        assert_eq!(leaf.type_id, STAMP.type_id);
        assert_eq!(leaf.type_pid, STAMP.type_pid);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_repeat_build_bumps_counter_and_reuses_rows(pool: PgPool) {
    let first = build(&pool, &[group("类型", &["动作"])]).await;
    let second = CategoryRepo::build_taxonomy(
        &pool,
        1,
        &[group("类型", &["动作"])],
        ClassStamp {
            type_id: 7,
            type_pid: 2,
        },
        TaxonomyPolicy::FailFast,
    )
    .await
    .unwrap();
    assert_eq!(first, second);

    let leaf = CategoryRepo::find_by_id(&pool, first[0]).await.unwrap().unwrap();
    assert_eq!(leaf.video_count, 2);
    // Type leaves follow the latest class.
    assert_eq!(leaf.type_id, 7);
    assert_eq!(leaf.type_pid, 2);

    let dimensions: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM category WHERE parent_id = 0 AND name = '类型'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(dimensions, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_type_leaves_are_not_stamped(pool: PgPool) {
    let ids = build(&pool, &[group("地区", &["美国"])]).await;
    let leaf = CategoryRepo::find_by_id(&pool, ids[0]).await.unwrap().unwrap();
    assert_eq!(leaf.type_id, 0);
    assert_eq!(leaf.type_pid, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_year_filter_and_region_aliases(pool: PgPool) {
    let years = build(&pool, &[group("年代", &["2019,1990年代,2020"])]).await;
    assert_eq!(leaf_names(&pool, &years).await, vec!["2019", "2020"]);

    let regions = build(&pool, &[group("地区", &["中国香港/美国"])]).await;
    assert_eq!(leaf_names(&pool, &regions).await, vec!["香港", "美国"]);

    // The alias lands on the same leaf as the canonical name.
    let again = build(&pool, &[group("地区", &["香港地区"])]).await;
    assert_eq!(again[0], regions[0]);
    let hk = CategoryRepo::find_by_id(&pool, regions[0]).await.unwrap().unwrap();
    assert_eq!(hk.video_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_labels_count_once(pool: PgPool) {
    let ids = build(&pool, &[group("类型", &["动作", "动作,喜剧"])]).await;
    assert_eq!(ids.len(), 2);
    let action = CategoryRepo::find_by_id(&pool, ids[0]).await.unwrap().unwrap();
    assert_eq!(action.video_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_group_without_labels_returns_dimension_id(pool: PgPool) {
    let ids = build(&pool, &[group("语言", &[])]).await;
    assert_eq!(ids.len(), 1);

    let node = CategoryRepo::find_by_id(&pool, ids[0]).await.unwrap().unwrap();
    assert_eq!(node.name, "语言");
    assert_eq!(node.parent_id, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_best_effort_matches_fail_fast_on_clean_input(pool: PgPool) {
    let ids = CategoryRepo::build_taxonomy(
        &pool,
        1,
        &[group("类型", &["动作"]), group("地区", &["美国 英国"])],
        STAMP,
        TaxonomyPolicy::BestEffort,
    )
    .await
    .unwrap();
    assert_eq!(leaf_names(&pool, &ids).await, vec!["动作", "美国", "英国"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_best_effort_skips_failing_label(pool: PgPool) {
    // Postgres rejects NUL bytes in text, so the middle leaf insert fails.
    let ids = CategoryRepo::build_taxonomy(
        &pool,
        CATEGORY_TYPE_MOVIE,
        &[group("类型", &["动作,坏\0标签,喜剧"])],
        STAMP,
        TaxonomyPolicy::BestEffort,
    )
    .await
    .unwrap();
    assert_eq!(leaf_names(&pool, &ids).await, vec!["动作", "喜剧"]);

    for name in ["动作", "喜剧"] {
        let leaf = CategoryRepo::find_leaf(&pool, name, CATEGORY_TYPE_MOVIE)
            .await
            .unwrap()
            .expect("good leaf persisted");
        assert!(ids.contains(&leaf.id));
        assert_eq!(leaf.video_count, 1);
    }

    let leaves: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM category WHERE parent_id <> 0")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(leaves, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_fail_fast_rolls_back_whole_build(pool: PgPool) {
    let result = CategoryRepo::build_taxonomy(
        &pool,
        CATEGORY_TYPE_MOVIE,
        &[group("类型", &["动作,坏\0标签,喜剧"])],
        STAMP,
        TaxonomyPolicy::FailFast,
    )
    .await;
    assert!(result.is_err());

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM category")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_same_label_under_series_is_a_separate_leaf(pool: PgPool) {
    let movie = build(&pool, &[group("类型", &["剧情"])]).await;
    let series = CategoryRepo::build_taxonomy(
        &pool,
        CATEGORY_TYPE_SERIES,
        &[group("类型", &["剧情"])],
        STAMP,
        TaxonomyPolicy::FailFast,
    )
    .await
    .unwrap();
    assert_ne!(movie, series);

    let movie_leaf = CategoryRepo::find_leaf(&pool, "剧情", CATEGORY_TYPE_MOVIE)
        .await
        .unwrap()
        .unwrap();
    let series_leaf = CategoryRepo::find_leaf(&pool, "剧情", CATEGORY_TYPE_SERIES)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(movie_leaf.id, movie[0]);
    assert_eq!(series_leaf.id, series[0]);
    // Both leaves hang off the single dimension node.
    assert_eq!(movie_leaf.parent_id, series_leaf.parent_id);
    assert_eq!(series_leaf.video_count, 1);
}

// ---------------------------------------------------------------------------
// Test: tree projections
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_home_trees_have_fixed_shape(pool: PgPool) {
    // Nothing exists yet: three placeholders.
    let trees = CategoryRepo::home_trees(&pool, 0).await.unwrap();
    let names: Vec<&str> = trees.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["类型", "年代", "地区"]);
    assert!(trees.iter().all(|t| t.id == 0 && t.son_category.is_empty()));

    build(&pool, &[group("年代", &["2019,2021,2020"])]).await;
    build(&pool, &[group("地区", &["美国"])]).await;
    build(&pool, &[group("地区", &["美国,日本"])]).await;

    let trees = CategoryRepo::home_trees(&pool, 0).await.unwrap();
    let years: Vec<&str> = trees[1].son_category.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(years, vec!["2021", "2020", "2019"]);
    let regions: Vec<&str> = trees[2].son_category.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(regions, vec!["美国", "日本"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_home_type_tree_filters_by_class(pool: PgPool) {
    let stamp_movie = ClassStamp {
        type_id: 6,
        type_pid: 1,
    };
    let stamp_series = ClassStamp {
        type_id: 13,
        type_pid: 2,
    };
    for (label, stamp) in [("动作", stamp_movie), ("古装", stamp_series)] {
        CategoryRepo::build_taxonomy(
            &pool,
            1,
            &[group("类型", &[label])],
            stamp,
            TaxonomyPolicy::FailFast,
        )
        .await
        .unwrap();
    }

    let all = CategoryRepo::home_trees(&pool, 0).await.unwrap();
    assert_eq!(all[0].son_category.len(), 2);

    let series = CategoryRepo::home_trees(&pool, 2).await.unwrap();
    let names: Vec<&str> = series[0].son_category.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["古装"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tree_for_video_lists_only_linked_leaves(pool: PgPool) {
    let video = VideoRepo::upsert_by_title(
        &pool,
        &UpsertVideo {
            title: "Linked".to_string(),
            type_pid: 1,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let linked = build(&pool, &[group("类型", &["动作"]), group("地区", &["美国"])]).await;
    build(&pool, &[group("类型", &["喜剧"])]).await;
    VideoCategoryRepo::reconcile(&pool, video.id, &linked)
        .await
        .unwrap();

    let trees = CategoryRepo::tree_for_video(&pool, video.id).await.unwrap();
    assert_eq!(trees.len(), 2);
    assert_eq!(trees[0].name, "类型");
    assert_eq!(trees[0].son_category.len(), 1);
    assert_eq!(trees[0].son_category[0].name, "动作");
    assert_eq!(trees[1].name, "地区");
    assert_eq!(trees[1].son_category[0].name, "美国");
}

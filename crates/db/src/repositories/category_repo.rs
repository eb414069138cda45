//! Repository for the `category` table.
//!
//! Owns the taxonomy builder (dimension and leaf upserts with usage
//! counters) and the read-side tree projections used by the category list
//! and video detail endpoints.

use std::collections::HashSet;

use sqlx::{Connection, PgPool, Postgres, Transaction};
use vcat_core::taxonomy::{
    labels_to_tokens, Dimension, TaxonomyPolicy, DIMENSION_REGION, DIMENSION_TYPE, DIMENSION_YEAR,
};
use vcat_core::types::{DbId, CATEGORY_TYPE_MOVIE};

use crate::models::category::{Category, CategoryGroupInput, CategoryTree, ClassStamp};

/// Column list for `category` queries.
const COLUMNS: &str = "\
    id, name, parent_id, type, is_hide, type_id, type_pid, video_count, \
    created_at, updated_at";

/// Maximum children returned for the year and region home trees.
const HOME_TREE_LIMIT: i64 = 40;

/// Sort order for the children of a dimension node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOrder {
    /// Most used first.
    Popular,
    /// Reverse lexical name order (newest year first).
    NameDesc,
}

impl ChildOrder {
    fn sql(self) -> &'static str {
        match self {
            Self::Popular => "video_count DESC, id",
            Self::NameDesc => "name DESC, id",
        }
    }
}

/// Provides taxonomy building and tree queries for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Find a category by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM category WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a live dimension node by exact name.
    pub async fn find_dimension(pool: &PgPool, name: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM category \
             WHERE parent_id = 0 AND name = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Find a leaf by `(name, type)`.
    pub async fn find_leaf(
        pool: &PgPool,
        name: &str,
        kind: i16,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM category \
             WHERE parent_id <> 0 AND name = $1 AND type = $2"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .bind(kind)
            .fetch_optional(pool)
            .await
    }

    /// List the live children of a dimension node.
    ///
    /// `type_pid` narrows the children to one parent class; `limit = None`
    /// returns every child.
    pub async fn list_children(
        pool: &PgPool,
        parent_id: DbId,
        type_pid: Option<DbId>,
        order: ChildOrder,
        limit: Option<i64>,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM category \
             WHERE parent_id = $1 AND deleted_at IS NULL \
               AND ($2::BIGINT IS NULL OR type_pid = $2) \
             ORDER BY {} \
             LIMIT $3",
            order.sql()
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(parent_id)
            .bind(type_pid)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Tree projections
    // -----------------------------------------------------------------------

    /// The three fixed home-page trees: type, year and region.
    ///
    /// Type children are filtered by `type_pid` when `type_id > 0` and sorted
    /// by popularity; year children are sorted newest first; region children
    /// by popularity. Year and region are capped at 40 entries. A missing
    /// dimension is returned as an empty placeholder.
    pub async fn home_trees(pool: &PgPool, type_id: DbId) -> Result<Vec<CategoryTree>, sqlx::Error> {
        let type_filter = (type_id > 0).then_some(type_id);
        let specs = [
            (DIMENSION_TYPE, type_filter, ChildOrder::Popular, None),
            (DIMENSION_YEAR, None, ChildOrder::NameDesc, Some(HOME_TREE_LIMIT)),
            (DIMENSION_REGION, None, ChildOrder::Popular, Some(HOME_TREE_LIMIT)),
        ];

        let mut trees = Vec::with_capacity(specs.len());
        for (name, type_pid, order, limit) in specs {
            let tree = match Self::find_dimension(pool, name).await? {
                Some(node) => {
                    let children =
                        Self::list_children(pool, node.id, type_pid, order, limit).await?;
                    CategoryTree::new(node, children)
                }
                None => CategoryTree::placeholder(name, CATEGORY_TYPE_MOVIE),
            };
            trees.push(tree);
        }

        Ok(trees)
    }

    /// Dimension nodes holding the categories linked to a video, each with
    /// only the linked leaves as children.
    ///
    /// A dimension linked directly (a group that had no labels) appears with
    /// no children.
    pub async fn tree_for_video(
        pool: &PgPool,
        video_id: DbId,
    ) -> Result<Vec<CategoryTree>, sqlx::Error> {
        let linked = sqlx::query_as::<_, Category>(
            "SELECT c.id, c.name, c.parent_id, c.type, c.is_hide, c.type_id, c.type_pid, \
                    c.video_count, c.created_at, c.updated_at \
             FROM video_category vc \
             JOIN category c ON c.id = vc.category_id \
             WHERE vc.video_id = $1 AND c.deleted_at IS NULL \
             ORDER BY vc.id",
        )
        .bind(video_id)
        .fetch_all(pool)
        .await?;

        let mut dimension_ids: Vec<DbId> = Vec::new();
        let mut seen = HashSet::new();
        for c in &linked {
            let dim = if c.parent_id == 0 { c.id } else { c.parent_id };
            if seen.insert(dim) {
                dimension_ids.push(dim);
            }
        }

        if dimension_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {COLUMNS} FROM category WHERE id = ANY($1)");
        let dimensions = sqlx::query_as::<_, Category>(&query)
            .bind(&dimension_ids)
            .fetch_all(pool)
            .await?;

        // Keep the order in which dimensions were first linked.
        let trees = dimension_ids
            .iter()
            .filter_map(|id| dimensions.iter().find(|d| d.id == *id))
            .map(|dim| {
                let children = linked
                    .iter()
                    .filter(|c| c.parent_id == dim.id)
                    .cloned()
                    .collect();
                CategoryTree::new(dim.clone(), children)
            })
            .collect();

        Ok(trees)
    }

    // -----------------------------------------------------------------------
    // Taxonomy builder
    // -----------------------------------------------------------------------

    /// Ensure every category referenced by `groups` exists and count the usage.
    ///
    /// For each group the dimension node is looked up by exact name (created
    /// on first use); each label is split and filtered per dimension, and each
    /// surviving token is upserted as a leaf under the dimension with its
    /// `video_count` bumped. Only the type dimension stamps the class ids.
    ///
    /// Returns the leaf ids in processing order; a group without any label
    /// contributes its dimension id instead. The whole build runs in one
    /// transaction. Under [`TaxonomyPolicy::BestEffort`] each upsert runs in a
    /// savepoint and failures are logged and skipped.
    pub async fn build_taxonomy(
        pool: &PgPool,
        kind: i16,
        groups: &[CategoryGroupInput],
        stamp: ClassStamp,
        policy: TaxonomyPolicy,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut ids = Vec::new();

        for group in groups {
            let dimension_id = match policy {
                TaxonomyPolicy::FailFast => {
                    Self::upsert_dimension(&mut tx, &group.name, kind).await?
                }
                TaxonomyPolicy::BestEffort => {
                    let mut savepoint = Connection::begin(&mut *tx).await?;
                    match Self::upsert_dimension(&mut savepoint, &group.name, kind).await {
                        Ok(id) => {
                            savepoint.commit().await?;
                            id
                        }
                        Err(e) => {
                            savepoint.rollback().await?;
                            tracing::warn!(
                                dimension = %group.name,
                                error = %e,
                                "Skipping category dimension after upsert failure",
                            );
                            continue;
                        }
                    }
                }
            };

            if group.category.is_empty() {
                ids.push(dimension_id);
                continue;
            }

            let dimension = Dimension::from_name(&group.name);
            let labels: Vec<&str> = group.category.iter().map(|c| c.name.as_str()).collect();
            let leaf_stamp = dimension.stamps_class().then_some(stamp);

            for token in labels_to_tokens(dimension, &labels) {
                match policy {
                    TaxonomyPolicy::FailFast => {
                        let id =
                            Self::upsert_leaf(&mut tx, &token, kind, dimension_id, leaf_stamp)
                                .await?;
                        ids.push(id);
                    }
                    TaxonomyPolicy::BestEffort => {
                        let mut savepoint = Connection::begin(&mut *tx).await?;
                        match Self::upsert_leaf(
                            &mut savepoint,
                            &token,
                            kind,
                            dimension_id,
                            leaf_stamp,
                        )
                        .await
                        {
                            Ok(id) => {
                                savepoint.commit().await?;
                                ids.push(id);
                            }
                            Err(e) => {
                                savepoint.rollback().await?;
                                tracing::warn!(
                                    dimension = %group.name,
                                    label = %token,
                                    error = %e,
                                    "Skipping category label after upsert failure",
                                );
                            }
                        }
                    }
                }
            }
        }

        tx.commit().await?;

        tracing::debug!(
            kind,
            groups = groups.len(),
            categories = ids.len(),
            policy = %policy,
            "Category taxonomy built",
        );

        Ok(ids)
    }

    /// Look up a dimension node by exact name, creating it on first use.
    async fn upsert_dimension(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        kind: i16,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO category (name, parent_id, type) \
             VALUES ($1, 0, $2) \
             ON CONFLICT (name) WHERE parent_id = 0 \
             DO UPDATE SET name = EXCLUDED.name \
             RETURNING id",
        )
        .bind(name)
        .bind(kind)
        .fetch_one(&mut **tx)
        .await
    }

    /// Create a leaf with `video_count = 1` or bump the existing one.
    ///
    /// With a stamp, `type_id` / `type_pid` are written on insert and
    /// refreshed on update; without one they are left alone.
    async fn upsert_leaf(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        kind: i16,
        parent_id: DbId,
        stamp: Option<ClassStamp>,
    ) -> Result<DbId, sqlx::Error> {
        let class = stamp.unwrap_or_default();
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO category (name, parent_id, type, type_id, type_pid, video_count) \
             VALUES ($1, $2, $3, $4, $5, 1) \
             ON CONFLICT (name, type) WHERE parent_id <> 0 \
             DO UPDATE SET \
                 video_count = category.video_count + 1, \
                 type_id = CASE WHEN $6 THEN EXCLUDED.type_id ELSE category.type_id END, \
                 type_pid = CASE WHEN $6 THEN EXCLUDED.type_pid ELSE category.type_pid END \
             RETURNING id",
        )
        .bind(name)
        .bind(parent_id)
        .bind(kind)
        .bind(class.type_id)
        .bind(class.type_pid)
        .bind(stamp.is_some())
        .fetch_one(&mut **tx)
        .await
    }
}

//! Diff computation for the `video_category` junction table.
//!
//! Given the category ids currently linked to a video and the ids the caller
//! wants linked, [`plan`] produces the minimal insert and delete sets. The
//! repository applies the plan inside a single transaction.

use std::collections::HashSet;

use crate::types::DbId;

/// Junction rows to insert and delete for one video.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Requested ids with no existing row, in request order.
    pub to_create: Vec<DbId>,
    /// Existing ids absent from the request, in stored order.
    pub to_delete: Vec<DbId>,
}

impl ReconcilePlan {
    /// `true` when the persisted set already matches the request.
    pub fn is_noop(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }
}

/// Compute `requested - existing` and `existing - requested`.
///
/// Duplicate ids on either side are collapsed, so the resulting inserts never
/// collide with each other on the `(video_id, category_id)` unique key.
///
/// # Examples
///
/// ```
/// use vcat_core::reconcile::plan;
///
/// let p = plan(&[1, 2, 3], &[2, 3, 4]);
/// assert_eq!(p.to_create, vec![4]);
/// assert_eq!(p.to_delete, vec![1]);
/// ```
pub fn plan(existing: &[DbId], requested: &[DbId]) -> ReconcilePlan {
    let existing_set: HashSet<DbId> = existing.iter().copied().collect();
    let requested_set: HashSet<DbId> = requested.iter().copied().collect();

    let mut seen = HashSet::new();
    let to_create = requested
        .iter()
        .copied()
        .filter(|id| !existing_set.contains(id) && seen.insert(*id))
        .collect();

    let mut seen = HashSet::new();
    let to_delete = existing
        .iter()
        .copied()
        .filter(|id| !requested_set.contains(id) && seen.insert(*id))
        .collect();

    ReconcilePlan {
        to_create,
        to_delete,
    }
}

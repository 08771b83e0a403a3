//! Product tag reconciliation.
//!
//! Computes the junction-row writes needed to make a product's persisted
//! tag associations equal a desired set. Planning is pure; applying the plan
//! is the persistence layer's job (see `ProductTagRepository::sync_for_product`).

use std::collections::HashSet;

use serde::Deserialize;

use crate::models::{ProductTag, ProductTagId, TagId};

/// The `tagIds` field of a product update.
///
/// An absent (or `null`) field must not touch existing associations, while
/// an empty list clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<Vec<TagId>>")]
pub enum TagSelection {
    /// Field not supplied: leave associations untouched.
    #[default]
    Unchanged,
    /// Empty list supplied: remove every association.
    Clear,
    /// Non-empty list supplied: converge to exactly these tags.
    Replace(Vec<TagId>),
}

impl TagSelection {
    /// Desired tag ids, or `None` when reconciliation should be skipped.
    pub fn desired(&self) -> Option<&[TagId]> {
        match self {
            TagSelection::Unchanged => None,
            TagSelection::Clear => Some(&[]),
            TagSelection::Replace(ids) => Some(ids),
        }
    }
}

impl From<Option<Vec<TagId>>> for TagSelection {
    fn from(value: Option<Vec<TagId>>) -> Self {
        match value {
            None => TagSelection::Unchanged,
            Some(ids) if ids.is_empty() => TagSelection::Clear,
            Some(ids) => TagSelection::Replace(ids),
        }
    }
}

/// Writes required to converge a product's tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSyncPlan {
    /// Tag ids needing a new junction row, in first-requested order.
    pub to_add: Vec<TagId>,
    /// Junction row ids to delete.
    pub to_remove: Vec<ProductTagId>,
}

impl TagSyncPlan {
    /// True when the persisted associations already match.
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Plan the inserts and deletes that turn `current` into `desired`.
///
/// Duplicates in `desired` are collapsed. Rows in `current` whose tag is not
/// desired are removed; rows whose tag is desired are kept as they are.
pub fn plan_tag_sync(current: &[ProductTag], desired: &[TagId]) -> TagSyncPlan {
    let current_tag_ids: HashSet<TagId> = current.iter().map(|row| row.tag_id).collect();
    let desired_set: HashSet<TagId> = desired.iter().copied().collect();

    let mut queued = HashSet::new();
    let to_add = desired
        .iter()
        .copied()
        .filter(|tag_id| !current_tag_ids.contains(tag_id) && queued.insert(*tag_id))
        .collect();

    let to_remove = current
        .iter()
        .filter(|row| !desired_set.contains(&row.tag_id))
        .map(|row| row.id)
        .collect();

    TagSyncPlan { to_add, to_remove }
}

//! browse::query
//!
//! Turns a selected bin (or parent) into a range query against the store.
//!
//! # Behavior
//!
//! - Root-level browse (`parent = None`): filters `depth == 0` within the
//!   field and narrows by the bin's labels as an inclusive normalized-name
//!   range. A name equal to, or extending, the end label is inside the
//!   range, so every name a bin covered is reachable from its labels.
//! - Child browse (`parent = Some(..)`): lists the parent's children with
//!   no letter-range narrowing. Whether that asymmetry is intentional in
//!   the original design is an open question; the reference behavior is
//!   preserved.
//! - Zero-count nodes are excluded unless the administrative "show empty"
//!   mode is requested.
//! - Results are always ordered by full name ascending.

use crate::core::types::{normalize_browse_key, FieldId, NodeId};
use crate::store::{TaxonomyNode, TaxonomyStore};

/// A built browse range query.
///
/// Pure description of the filter; execute it with [`RangeQuery::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    field: FieldId,
    parent: Option<NodeId>,
    start: Option<String>,
    end: Option<String>,
    include_empty: bool,
}

impl RangeQuery {
    /// Build a range query from a selected bin.
    ///
    /// Labels are normalized before use; empty labels impose no bound.
    /// With a parent, labels are accepted but not applied (see module
    /// docs).
    pub fn build(
        field: FieldId,
        parent: Option<NodeId>,
        start_label: Option<&str>,
        end_label: Option<&str>,
        include_empty: bool,
    ) -> Self {
        let normalize_bound = |label: Option<&str>| {
            label
                .map(normalize_browse_key)
                .filter(|key| !key.is_empty())
        };
        let (start, end) = if parent.is_some() {
            (None, None)
        } else {
            (normalize_bound(start_label), normalize_bound(end_label))
        };
        Self {
            field,
            parent,
            start,
            end,
            include_empty,
        }
    }

    /// Whether a node satisfies the filter.
    fn matches(&self, node: &TaxonomyNode) -> bool {
        if !self.include_empty && node.resource_count == 0 {
            return false;
        }
        match self.parent {
            Some(_) => true,
            None => {
                if node.depth != 0 {
                    return false;
                }
                let key = node.browse_key();
                if let Some(start) = &self.start {
                    if key.as_str() < start.as_str() {
                        return false;
                    }
                }
                if let Some(end) = &self.end {
                    if key.as_str() > end.as_str() && !key.starts_with(end.as_str()) {
                        return false;
                    }
                }
                true
            }
        }
    }

    /// Execute the query, ordered by full name ascending.
    pub fn run<'a>(&self, store: &'a TaxonomyStore) -> Vec<&'a TaxonomyNode> {
        store
            .children(self.field, self.parent)
            .into_iter()
            .filter(|node| self.matches(node))
            .collect()
    }
}

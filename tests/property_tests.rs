//! Property-based tests for the taxonomy and the browse partitioner.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use vocabtree::browse::partition::{partition, Partition};
use vocabtree::core::types::{normalize_browse_key, FieldId, ItemId, NodeId, SegmentName};
use vocabtree::maintain;
use vocabtree::store::TaxonomyStore;
use vocabtree::verify::verify_field;

const FIELD: FieldId = FieldId(1);

/// Strategy for normalized browse keys (lowercase alphanumerics).
fn browse_key() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![prop::char::range('a', 'z'), prop::char::range('0', '9')],
        1..8,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Strategy for a sorted partitioner input.
fn sorted_keys(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(browse_key(), 1..max_len).prop_map(|mut keys| {
        keys.sort();
        keys
    })
}

/// Strategy for valid (possibly multi-word) segment names.
fn segment_name() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            prop::char::range('a', 'z'),
            prop::char::range('A', 'Z'),
            prop::char::range('0', '9'),
            Just(' '),
        ],
        1..20,
    )
    .prop_filter_map("must survive trimming and normalization", |chars| {
        let name: String = chars.into_iter().collect();
        if name.trim().is_empty() || normalize_browse_key(&name).is_empty() {
            None
        } else {
            Some(name)
        }
    })
}

/// One step of a random mutation sequence.
///
/// Indexes select among live nodes modulo the current population, so any
/// u8 is a valid instruction.
#[derive(Debug, Clone)]
enum Op {
    Create { parent_ix: u8, name: String },
    CreateRoot { name: String },
    Rename { node_ix: u8, name: String },
    Reparent { node_ix: u8, parent_ix: u8 },
    Attach { node_ix: u8, item: u8 },
    DetachAttached { node_ix: u8 },
    DestroyLeaf { node_ix: u8 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<u8>(), segment_name()).prop_map(|(parent_ix, name)| Op::Create { parent_ix, name }),
        segment_name().prop_map(|name| Op::CreateRoot { name }),
        (any::<u8>(), segment_name()).prop_map(|(node_ix, name)| Op::Rename { node_ix, name }),
        (any::<u8>(), any::<u8>()).prop_map(|(node_ix, parent_ix)| Op::Reparent {
            node_ix,
            parent_ix
        }),
        (any::<u8>(), any::<u8>()).prop_map(|(node_ix, item)| Op::Attach { node_ix, item }),
        any::<u8>().prop_map(|node_ix| Op::DetachAttached { node_ix }),
        any::<u8>().prop_map(|node_ix| Op::DestroyLeaf { node_ix }),
    ]
}

/// Apply a random op sequence; validation errors are expected and skipped.
fn apply_ops(ops: &[Op]) -> TaxonomyStore {
    let mut store = TaxonomyStore::new();
    let mut live: Vec<NodeId> = Vec::new();
    let mut next_item = 0u64;

    for op in ops {
        match op {
            Op::CreateRoot { name } => {
                let name = SegmentName::new(name.clone()).expect("strategy yields valid names");
                if let Ok(id) = store.create_node(FIELD, None, name, None) {
                    live.push(id);
                }
            }
            Op::Create { parent_ix, name } => {
                if live.is_empty() {
                    continue;
                }
                let parent = live[*parent_ix as usize % live.len()];
                let name = SegmentName::new(name.clone()).expect("strategy yields valid names");
                if let Ok(id) = store.create_node(FIELD, Some(parent), name, None) {
                    live.push(id);
                }
            }
            Op::Rename { node_ix, name } => {
                if live.is_empty() {
                    continue;
                }
                let node = live[*node_ix as usize % live.len()];
                let name = SegmentName::new(name.clone()).expect("strategy yields valid names");
                let _ = store.rename(node, name);
            }
            Op::Reparent { node_ix, parent_ix } => {
                if live.is_empty() {
                    continue;
                }
                let node = live[*node_ix as usize % live.len()];
                let parent = live[*parent_ix as usize % live.len()];
                let _ = store.reparent(node, Some(parent));
            }
            Op::Attach { node_ix, item } => {
                if live.is_empty() {
                    continue;
                }
                let node = live[*node_ix as usize % live.len()];
                // Unique item ids, so attach never degenerates to a no-op.
                let _ = store.associate_item(node, ItemId(u64::from(*item) + next_item * 256));
                next_item += 1;
            }
            Op::DetachAttached { node_ix } => {
                if live.is_empty() {
                    continue;
                }
                let node = live[*node_ix as usize % live.len()];
                let first = store.items(node).next();
                if let Some(item) = first {
                    let _ = store.dissociate_item(node, item);
                }
            }
            Op::DestroyLeaf { node_ix } => {
                if live.is_empty() {
                    continue;
                }
                let node = live[*node_ix as usize % live.len()];
                if store.destroy(node, false).is_ok() {
                    live.retain(|n| *n != node);
                }
            }
        }
    }

    store
}

proptest! {
    /// Identical input yields identical bins.
    #[test]
    fn partition_is_deterministic(keys in sorted_keys(120), max in 2usize..20) {
        prop_assert_eq!(partition(&keys, max), partition(&keys, max));
    }

    /// Bins cover every input name exactly once, in order, no gaps.
    #[test]
    fn partition_covers_input(keys in sorted_keys(120), max in 2usize..20) {
        if let Partition::Bins(bins) = partition(&keys, max) {
            prop_assert!(bins.len() >= 2);
            let total: usize = bins.iter().map(|b| b.len).sum();
            prop_assert_eq!(total, keys.len());

            let mut offset = 0;
            for bin in &bins {
                prop_assert_eq!(&bin.first_name, &keys[offset]);
                offset += bin.len;
                prop_assert_eq!(&bin.last_name, &keys[offset - 1]);
            }
        }
    }

    /// A run of names sharing a 2-char prefix never straddles a boundary.
    #[test]
    fn partition_never_splits_prefix_runs(keys in sorted_keys(120), max in 2usize..20) {
        if let Partition::Bins(bins) = partition(&keys, max) {
            for pair in bins.windows(2) {
                let last = &pair[0].last_name;
                let first = &pair[1].first_name;
                let p = |s: &str| s[..s.len().min(2)].to_string();
                prop_assert_ne!(p(last), p(first));
            }
        }
    }

    /// Begin labels are the shortest prefix distinguishing a bin from the
    /// previous bin's last name: the label differs at its own length, and
    /// one character shorter would be ambiguous.
    #[test]
    fn partition_labels_are_minimal(keys in sorted_keys(120), max in 2usize..20) {
        if let Partition::Bins(bins) = partition(&keys, max) {
            for pair in bins.windows(2) {
                let prev_last = &pair[0].last_name;
                let begin = &pair[1].begin_label;
                let first = &pair[1].first_name;

                let l = begin.len();
                prop_assert_eq!(begin.as_str(), &first[..l.min(first.len())]);
                prop_assert_ne!(begin.as_str(), &prev_last[..l.min(prev_last.len())]);
                if l > 1 {
                    prop_assert_eq!(&first[..l - 1], &prev_last[..(l - 1).min(prev_last.len())]);
                }
            }
        }
    }

    /// After any mutation sequence, every structural and count invariant
    /// holds: depth, full-name join, aggregates, sibling uniqueness.
    #[test]
    fn mutations_preserve_invariants(ops in proptest::collection::vec(op(), 1..60)) {
        let store = apply_ops(&ops);
        let result = verify_field(&store, FIELD);
        prop_assert!(result.ok, "issues: {:?}", result.issues);
    }

    /// Re-running the full-name maintainer on a consistent tree is a no-op.
    #[test]
    fn fullname_maintainer_is_idempotent(ops in proptest::collection::vec(op(), 1..40)) {
        let mut store = apply_ops(&ops);

        let snapshot = |s: &TaxonomyStore| {
            let mut rows: Vec<(NodeId, String, u32)> = s
                .root_nodes(FIELD)
                .iter()
                .map(|n| (n.id, n.full_name.clone(), n.depth))
                .collect();
            let mut stack: Vec<NodeId> = rows.iter().map(|r| r.0).collect();
            while let Some(id) = stack.pop() {
                for child in s.children(FIELD, Some(id)) {
                    rows.push((child.id, child.full_name.clone(), child.depth));
                    stack.push(child.id);
                }
            }
            rows.sort();
            rows
        };

        let before = snapshot(&store);
        maintain::fullname::refresh_field(&mut store, FIELD).unwrap();
        prop_assert_eq!(before, snapshot(&store));
    }

    /// Recount never changes an already-consistent store.
    #[test]
    fn recount_is_noop_on_consistent_store(ops in proptest::collection::vec(op(), 1..40)) {
        let mut store = apply_ops(&ops);
        prop_assume!(verify_field(&store, FIELD).ok);

        maintain::counts::recount(&mut store, FIELD).unwrap();
        let result = verify_field(&store, FIELD);
        prop_assert!(result.ok, "issues: {:?}", result.issues);
    }
}

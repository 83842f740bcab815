//! End-to-end scenarios exercising the store, maintainers, and
//! partitioner together, the way a metadata editor drives them.

use vocabtree::browse::partition::{partition, Partition};
use vocabtree::browse::sibling_keys;
use vocabtree::core::types::{FieldId, ItemId, NodeId, SegmentName};
use vocabtree::store::{StoreError, TaxonomyStore};
use vocabtree::verify::verify_field;

const FIELD: FieldId = FieldId(1);

fn name(s: &str) -> SegmentName {
    SegmentName::new(s.to_string()).unwrap()
}

fn add(store: &mut TaxonomyStore, parent: Option<NodeId>, s: &str) -> NodeId {
    store.create_node(FIELD, parent, name(s), None).unwrap()
}

#[test]
fn shared_prefix_runs_stay_in_one_bin() {
    let mut store = TaxonomyStore::new();
    for s in ["Apple", "Apricot", "Banana", "Blueberry", "Cherry"] {
        add(&mut store, None, s);
    }

    let keys = sibling_keys(&store, FIELD, None);
    assert_eq!(keys, vec!["apple", "apricot", "banana", "blueberry", "cherry"]);

    // max=2 with the default fill factor gives a soft limit below the
    // run length, but "apple"/"apricot" share a 2-char prefix and must
    // not be separated.
    let bins = match partition(&keys, 2) {
        Partition::Bins(bins) => bins,
        Partition::SinglePage => panic!("expected multiple bins"),
    };

    assert_eq!(bins.len(), 3);
    assert_eq!(bins[0].first_name, "apple");
    assert_eq!(bins[0].last_name, "apricot");
    assert_eq!(bins[1].first_name, "banana");
    assert_eq!(bins[1].last_name, "blueberry");
    assert_eq!(bins[2].first_name, "cherry");

    assert_eq!(bins[0].display_label(), "a");
    assert_eq!(bins[1].display_label(), "b");
    assert_eq!(bins[2].display_label(), "c");
}

#[test]
fn destroy_without_cascade_rejects_internal_nodes() {
    let mut store = TaxonomyStore::new();
    let animals = add(&mut store, None, "Animals");
    let mammals = add(&mut store, Some(animals), "Mammals");

    let err = store.destroy(animals, false).unwrap_err();
    assert!(matches!(err, StoreError::HasChildren(id) if id == animals));

    // The failed destroy left everything in place.
    assert_eq!(store.len(), 2);
    assert!(store.node(animals).is_ok());
    assert!(store.node(mammals).is_ok());
    assert!(verify_field(&store, FIELD).ok);

    // With cascade the whole subtree goes.
    store.destroy(animals, true).unwrap();
    assert!(store.is_empty());
}

#[test]
fn child_creation_derives_full_name_and_depth() {
    let mut store = TaxonomyStore::new();
    let animals = add(&mut store, None, "Animals");
    let mammals = add(&mut store, Some(animals), "Mammals");

    let node = store.node(mammals).unwrap();
    assert_eq!(node.full_name, "Animals -- Mammals");
    assert_eq!(node.depth, 1);
    assert_eq!(node.parent_id, Some(animals));

    let root = store.node(animals).unwrap();
    assert_eq!(root.full_name, "Animals");
    assert_eq!(root.depth, 0);
}

#[test]
fn association_counts_ripple_through_ancestors() {
    let mut store = TaxonomyStore::new();
    let animals = add(&mut store, None, "Animals");
    let mammals = add(&mut store, Some(animals), "Mammals");
    let cats = add(&mut store, Some(mammals), "Cats");

    for item in 1..=3 {
        store.associate_item(cats, ItemId(item)).unwrap();
    }

    assert_eq!(store.node(cats).unwrap().resource_count, 3);
    assert_eq!(store.node(cats).unwrap().full_resource_count, 3);
    assert_eq!(store.node(mammals).unwrap().resource_count, 0);
    assert_eq!(store.node(mammals).unwrap().full_resource_count, 3);
    assert_eq!(store.node(animals).unwrap().full_resource_count, 3);

    store.dissociate_item(cats, ItemId(2)).unwrap();

    assert_eq!(store.node(cats).unwrap().resource_count, 2);
    assert_eq!(store.node(cats).unwrap().full_resource_count, 2);
    assert_eq!(store.node(mammals).unwrap().full_resource_count, 2);
    assert_eq!(store.node(animals).unwrap().full_resource_count, 2);
    assert!(!store.needs_recount(FIELD));
    assert!(verify_field(&store, FIELD).ok);
}

#[test]
fn reparent_recomputes_entire_subtree() {
    let mut store = TaxonomyStore::new();
    let animals = add(&mut store, None, "Animals");
    let plants = add(&mut store, None, "Plants");
    let mammals = add(&mut store, Some(animals), "Mammals");
    let cats = add(&mut store, Some(mammals), "Cats");
    let siamese = add(&mut store, Some(cats), "Siamese");

    store.associate_item(siamese, ItemId(7)).unwrap();
    assert_eq!(store.node(animals).unwrap().full_resource_count, 1);

    store.reparent(mammals, Some(plants)).unwrap();

    // Every node of the moved subtree carries the new path and depth.
    assert_eq!(store.node(mammals).unwrap().full_name, "Plants -- Mammals");
    assert_eq!(store.node(mammals).unwrap().depth, 1);
    assert_eq!(
        store.node(cats).unwrap().full_name,
        "Plants -- Mammals -- Cats"
    );
    assert_eq!(store.node(cats).unwrap().depth, 2);
    assert_eq!(
        store.node(siamese).unwrap().full_name,
        "Plants -- Mammals -- Cats -- Siamese"
    );
    assert_eq!(store.node(siamese).unwrap().depth, 3);

    // Aggregates moved with the subtree.
    assert_eq!(store.node(animals).unwrap().full_resource_count, 0);
    assert_eq!(store.node(plants).unwrap().full_resource_count, 1);
    assert!(verify_field(&store, FIELD).ok);
}

#[test]
fn reparent_into_own_descendant_is_rejected() {
    let mut store = TaxonomyStore::new();
    let a = add(&mut store, None, "A");
    let b = add(&mut store, Some(a), "B");
    let c = add(&mut store, Some(b), "C");

    assert!(store.reparent(a, Some(c)).is_err());
    assert!(store.reparent(a, Some(a)).is_err());

    // Tree untouched, invariants intact.
    assert_eq!(store.node(a).unwrap().depth, 0);
    assert_eq!(store.node(c).unwrap().full_name, "A -- B -- C");
    assert!(verify_field(&store, FIELD).ok);
}

#[test]
fn sibling_names_are_unique_per_parent_case_insensitively() {
    let mut store = TaxonomyStore::new();
    let animals = add(&mut store, None, "Animals");
    add(&mut store, Some(animals), "Mammals");

    let err = store
        .create_node(FIELD, Some(animals), name("MAMMALS"), None)
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName { .. }));

    // The same name is fine under a different parent.
    let plants = add(&mut store, None, "Plants");
    assert!(store
        .create_node(FIELD, Some(plants), name("Mammals"), None)
        .is_ok());
}

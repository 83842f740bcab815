//! Snapshot tests for browse partition link rendering.
//!
//! The bin layout and labels are the user-visible contract of the
//! partitioner; these pin the rendered link list for representative
//! sibling sets.

use vocabtree::browse::partition::{partition_with, Partition};

fn render(names: &[&str], max_per_page: usize) -> String {
    let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    match partition_with(&names, max_per_page, 0.8) {
        Partition::SinglePage => format!("single page ({} names)", names.len()),
        Partition::Bins(bins) => bins
            .iter()
            .map(|bin| {
                format!(
                    "{}: {} .. {} ({})",
                    bin.display_label(),
                    bin.first_name,
                    bin.last_name,
                    bin.len
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

#[test]
fn single_letter_labels() {
    let names = [
        "aardvark", "abacus", "acorn", "badger", "beaver", "bison", "camel", "cat", "cow", "deer",
        "dingo", "dove",
    ];
    insta::assert_snapshot!(render(&names, 3), @r"
    a: aardvark .. acorn (3)
    b: badger .. bison (3)
    c: camel .. cow (3)
    d: deer .. dove (3)
    ");
}

#[test]
fn hyphenated_range_labels() {
    let names = ["alder", "almond", "amber", "anise", "aspen", "birch"];
    insta::assert_snapshot!(render(&names, 2), @r"
    a-al: alder .. almond (2)
    am-an: amber .. anise (2)
    as-b: aspen .. birch (2)
    ");
}

#[test]
fn short_list_renders_single_page() {
    let names = ["apple", "banana"];
    insta::assert_snapshot!(render(&names, 5), @"single page (2 names)");
}

#[test]
fn one_long_run_renders_single_page() {
    let names = ["apa", "apb", "apc", "apd", "ape"];
    insta::assert_snapshot!(render(&names, 2), @"single page (5 names)");
}

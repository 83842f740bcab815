//! browse::partition
//!
//! Alphabetic browse partitioning.
//!
//! When a sorted sibling list exceeds the page capacity, it is split into
//! bins for paged browsing, each labeled with a minimal navigable range
//! like `a`, `b-ca`, `cb-f`. Two rules shape the bins:
//!
//! - A bin may close only once it holds strictly more than
//!   `fill_factor * max_per_page` names, so pages stay reasonably full.
//! - A run of names sharing a 2-character prefix is never split across
//!   bins; a bin grows past `max_per_page` rather than break the run.
//!
//! Boundary labels are the shortest prefixes that distinguish a bin from
//! its neighbors, so links stay short without ever being ambiguous.
//!
//! The function is pure and deterministic; see [`crate::browse::cache`]
//! for memoization.

/// Soft-fill factor applied when none is configured.
pub const DEFAULT_FILL_FACTOR: f64 = 0.8;

/// Prefix length protected from bin splits.
const RUN_PREFIX_LEN: usize = 2;

/// One contiguous alphabetical slice of a sibling list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bin {
    /// Minimal prefix distinguishing this bin's first name from the
    /// previous bin's last name
    pub begin_label: String,
    /// Minimal prefix distinguishing this bin's last name from the next
    /// bin's first name
    pub end_label: String,
    /// First normalized name in the bin
    pub first_name: String,
    /// Last normalized name in the bin
    pub last_name: String,
    /// Number of names in the bin
    pub len: usize,
}

impl Bin {
    /// Label shown on the browse link: `begin` when the range collapses,
    /// otherwise `begin-end`.
    pub fn display_label(&self) -> String {
        if self.begin_label == self.end_label {
            self.begin_label.clone()
        } else {
            format!("{}-{}", self.begin_label, self.end_label)
        }
    }
}

/// Result of partitioning a sibling name list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Partition {
    /// The list fits on one page (or collapsed into a single bin);
    /// the caller shows everything without partition links.
    SinglePage,
    /// Ordered bins covering the whole list.
    Bins(Vec<Bin>),
}

impl Partition {
    /// The bins, if the list was actually partitioned.
    pub fn bins(&self) -> Option<&[Bin]> {
        match self {
            Partition::SinglePage => None,
            Partition::Bins(bins) => Some(bins),
        }
    }
}

/// Partition a sorted, normalized, blank-free name list with the default
/// soft-fill factor.
pub fn partition(sorted_names: &[String], max_per_page: usize) -> Partition {
    partition_with(sorted_names, max_per_page, DEFAULT_FILL_FACTOR)
}

/// Partition with an explicit soft-fill factor.
///
/// Input names must be ascending and already normalized via
/// [`crate::core::types::normalize_browse_key`], with blanks discarded.
pub fn partition_with(sorted_names: &[String], max_per_page: usize, fill_factor: f64) -> Partition {
    if sorted_names.len() <= max_per_page {
        return Partition::SinglePage;
    }

    let soft_limit = fill_factor * max_per_page as f64;
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    let mut start = 0usize;

    for i in 1..sorted_names.len() {
        let bin_len = i - start;
        let split = bin_len as f64 > soft_limit
            && run_prefix(&sorted_names[i]) != run_prefix(&sorted_names[i - 1]);
        if split {
            ranges.push((start, i));
            start = i;
        }
    }
    ranges.push((start, sorted_names.len()));

    // Everything shares one 2-char prefix run: no useful links to offer.
    if ranges.len() == 1 {
        return Partition::SinglePage;
    }

    let bins = ranges
        .iter()
        .enumerate()
        .map(|(i, &(lo, hi))| {
            let first = &sorted_names[lo];
            let last = &sorted_names[hi - 1];
            let prev_last = if i == 0 {
                None
            } else {
                Some(sorted_names[ranges[i - 1].1 - 1].as_str())
            };
            let next_first = ranges
                .get(i + 1)
                .map(|&(next_lo, _)| sorted_names[next_lo].as_str());
            Bin {
                begin_label: shortest_distinct_prefix(first, prev_last),
                end_label: shortest_distinct_prefix(last, next_first),
                first_name: first.clone(),
                last_name: last.clone(),
                len: hi - lo,
            }
        })
        .collect();

    Partition::Bins(bins)
}

/// The prefix protected from splits (whole name when shorter).
fn run_prefix(name: &str) -> &str {
    &name[..name.len().min(RUN_PREFIX_LEN)]
}

/// Shortest prefix of `name` that differs from the same-length prefix of
/// `other`. `None` stands in for a missing neighbor (before the first bin
/// or after the last) and degenerates to a single character.
///
/// Growth is capped at `min(len(name), len(other)) + 1` so the loop
/// terminates when one name is a prefix of the other; equal names fall
/// back to the full name.
fn shortest_distinct_prefix(name: &str, other: Option<&str>) -> String {
    let Some(other) = other else {
        return name[..name.len().min(1)].to_string();
    };

    let cap = name.len().min(other.len()) + 1;
    for n in 1..=cap {
        let a = &name[..n.min(name.len())];
        let b = &other[..n.min(other.len())];
        if a != b {
            return a.to_string();
        }
    }
    name.to_string()
}

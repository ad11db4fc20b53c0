use num_traits::PrimInt;
use radsort::sort_by_key;

/// One row of divider evidence: a link endpoint pair plus the index of the
/// path that contributed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRecord<T> {
    pub upstream: T,
    pub downstream: T,
    pub path_index: u32,
}

/// Canonicalize the evidence stream: stable radix sort, lexicographic on
/// `(upstream, downstream, path_index)`, then drop exact duplicate triples.
/// A path that contributes the same link twice in the source data counts
/// once. Sorting by `path_index` as the lowest-order key makes duplicates
/// adjacent, so one linear pass removes them; grouping itself is keyed only
/// on `(upstream, downstream)`.
pub fn sort_and_drop_duplicates<T>(records: &mut Vec<LinkRecord<T>>)
where
    T: PrimInt + radsort::Key,
{
    sort_by_key(records, |r| r.path_index);
    sort_by_key(records, |r| r.downstream);
    sort_by_key(records, |r| r.upstream);
    records.dedup();
}

/// Half-open `[start, end)` runs of records sharing the same
/// `(upstream, downstream)` key. Input must already be sorted on that key.
pub fn find_groups<T: PrimInt>(records: &[LinkRecord<T>]) -> Vec<(usize, usize)> {
    let mut groups = Vec::new();
    if records.is_empty() {
        return groups;
    }

    let mut run_start = 0;
    for i in 1..records.len() {
        if records[i].upstream != records[run_start].upstream
            || records[i].downstream != records[run_start].downstream
        {
            groups.push((run_start, i));
            run_start = i;
        }
    }
    groups.push((run_start, records.len()));

    groups
}

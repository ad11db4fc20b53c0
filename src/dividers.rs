use crate::matrix_structs::{Link, Path};

/// The path's coordinate decreases across this link. That alone is evidence
/// of a genuine rearrangement; no occupancy check is needed.
#[inline]
pub fn is_backward(link: &Link) -> bool {
    link.downstream < link.upstream
}

/// A link that starts and ends at the same position. Never divider evidence
/// (the skipped range between equal endpoints is empty), but a legitimate
/// input row that must flow through classification rather than error out.
#[inline]
pub fn is_self_loop(link: &Link) -> bool {
    link.upstream == link.downstream
}

/// Does any occupied bin fall strictly inside the link's gap range
/// `(upstream, downstream)`? A forward skip over empty space is unremarkable;
/// a skip over material the path actually possesses proves its linear
/// sequence diverges and rejoins. `occupied` must be sorted ascending; the
/// lookup is a binary search, not a scan of the gap.
pub fn is_gap_divider(link: &Link, occupied: &[u32]) -> bool {
    let first_inside = occupied.partition_point(|&b| b <= link.upstream);
    occupied
        .get(first_inside)
        .map_or(false, |&b| b < link.downstream)
}

/// Combined divider predicate over one path's own occupied bins.
#[inline]
pub fn is_divider(link: &Link, occupied: &[u32]) -> bool {
    is_backward(link) || is_gap_divider(link, occupied)
}

/// Flags links that touch position 0, where a path enters or leaves the
/// pangenome coordinate space.
pub fn path_boundaries(links: &[Link]) -> Vec<bool> {
    links
        .iter()
        .map(|l| l.upstream == 0 || l.downstream == 0)
        .collect()
}

pub fn self_loops(links: &[Link]) -> Vec<bool> {
    links.iter().map(is_self_loop).collect()
}

/// Per-link divider flags for one path, `occupied` sorted ascending.
pub fn path_dividers(links: &[Link], occupied: &[u32]) -> Vec<bool> {
    links.iter().map(|l| is_divider(l, occupied)).collect()
}

/// Union of every path's occupied bin ids, sorted and deduplicated.
pub fn occupied_bin_union(paths: &[Path]) -> Vec<u32> {
    let mut all: Vec<u32> = paths
        .iter()
        .flat_map(|p| p.bins.keys().copied())
        .collect();
    radsort::sort(&mut all);
    all.dedup();
    all
}

/// Pruning predicate: keep a link iff it is backward or its gap contains a
/// bin occupied somewhere in the whole dataset. `union` is a superset of any
/// single path's occupancy, so no link the per-path divider test accepts is
/// ever dropped here.
#[inline]
pub fn keep_link(link: &Link, union: &[u32]) -> bool {
    is_backward(link) || is_gap_divider(link, union)
}

/// Optional pre-pass: physically discard links that span pure empty space.
/// Returns the number of links dropped.
pub fn prune_links(paths: &mut [Path]) -> usize {
    let union = occupied_bin_union(paths);
    let mut dropped = 0;
    for path in paths.iter_mut() {
        let before = path.links.len();
        path.links.retain(|l| keep_link(l, &union));
        dropped += before - path.links.len();
    }
    dropped
}

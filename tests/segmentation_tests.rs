use std::collections::BTreeMap;

use component_segmentation::dividers::prune_links;
use component_segmentation::{
    find_dividers, segment, Link, PangenomeSchematic, Path, PathBin, SegmentConfig,
};

fn path(name: &str, bins: &[u32], links: &[(u32, u32)]) -> Path {
    let mut path = Path::new(name);
    for &bin_id in bins {
        path.bins.insert(
            bin_id,
            PathBin {
                bin_id,
                coverage: 2.0,
                inversion_rate: 0.0,
                first_nucleotide: u64::from(bin_id) * 100,
                last_nucleotide: u64::from(bin_id) * 100 + 99,
                sequence: None,
            },
        );
    }
    path.links = links
        .iter()
        .map(|&(upstream, downstream)| Link { upstream, downstream })
        .collect();
    path
}

fn assert_tiles(schematic: &PangenomeSchematic) {
    let mut expected = 0;
    for component in &schematic.components {
        assert_eq!(component.first_bin, expected);
        assert!(component.last_bin >= component.first_bin);
        expected = component.last_bin + 1;
    }
    assert_eq!(expected, schematic.pangenome_length);
}

/// Per-path nested-map divider detection, the slow reference formulation.
/// Used only to cross-check the sorted-array pipeline.
fn reference_dividers(
    paths: &[Path],
) -> (
    BTreeMap<u32, BTreeMap<u32, Vec<bool>>>,
    BTreeMap<u32, BTreeMap<u32, Vec<bool>>>,
    Vec<u32>,
) {
    let mut entering: BTreeMap<u32, BTreeMap<u32, Vec<bool>>> = BTreeMap::new();
    let mut leaving: BTreeMap<u32, BTreeMap<u32, Vec<bool>>> = BTreeMap::new();
    let mut dividers = vec![0u32];

    for (path_index, path) in paths.iter().enumerate() {
        for link in &path.links {
            let mut verified = link.downstream < link.upstream;
            if !verified {
                for i in link.upstream + 1..link.downstream {
                    if path.contains(i) {
                        verified = true;
                        break;
                    }
                }
            }
            if verified {
                leaving
                    .entry(link.upstream)
                    .or_default()
                    .entry(link.downstream)
                    .or_insert_with(|| vec![false; paths.len()])[path_index] = true;
                entering
                    .entry(link.downstream)
                    .or_default()
                    .entry(link.upstream)
                    .or_insert_with(|| vec![false; paths.len()])[path_index] = true;
                dividers.push(link.upstream + 1);
                dividers.push(link.downstream);
            }
        }
    }

    dividers.sort_unstable();
    dividers.dedup();
    (entering, leaving, dividers)
}

#[test]
fn two_paths_two_components() {
    // one divider link per path: a backward jump 3->0 on the first path and
    // a backward jump 9->4 on the second
    let paths = vec![
        path("one", &[0, 1, 2, 3], &[(3, 0)]),
        path("two", &[4, 5, 6, 7, 8, 9], &[(9, 4)]),
    ];

    let (_, _, dividers) = find_dividers(&paths, 10, SegmentConfig::default()).unwrap();
    assert_eq!(dividers, [0, 4, 10]);

    let schematic = segment(&paths, 10, 100, SegmentConfig::default()).unwrap();
    assert_tiles(&schematic);
    assert_eq!(schematic.components.len(), 2);

    let first = &schematic.components[0];
    assert_eq!((first.first_bin, first.last_bin), (0, 3));
    assert_eq!(first.occupants, [true, false]);
    assert_eq!(first.departures.len(), 1);
    assert_eq!(first.departures[0].upstream, 3);
    assert_eq!(first.departures[0].downstream, 0);
    assert_eq!(first.departures[0].participants, [true, false]);
    assert_eq!(first.arrivals.len(), 1);
    assert_eq!(first.arrivals[0].upstream, 3);
    assert_eq!(first.arrivals[0].downstream, 0);

    let second = &schematic.components[1];
    assert_eq!((second.first_bin, second.last_bin), (4, 9));
    assert_eq!(second.occupants, [false, true]);
    assert_eq!(second.departures.len(), 1);
    assert_eq!(second.departures[0].downstream, 4);
    assert_eq!(second.departures[0].participants, [false, true]);
    assert_eq!(second.arrivals.len(), 1);
    assert_eq!(second.arrivals[0].upstream, 9);
}

#[test]
fn components_always_tile_the_coordinate_space() {
    let cases: Vec<Vec<Path>> = vec![
        vec![path("a", &[0, 3, 9], &[(0, 3), (3, 9)])],
        vec![
            path("a", &[0, 1, 2, 5, 6], &[(2, 5), (6, 0)]),
            path("b", &[0, 4, 7, 9], &[(0, 4), (4, 7), (9, 9)]),
        ],
        vec![
            path("a", &(0..10).collect::<Vec<_>>(), &[(8, 1), (1, 8)]),
            path("b", &[2, 3], &[]),
        ],
    ];

    for paths in cases {
        let schematic = segment(&paths, 10, 100, SegmentConfig::default()).unwrap();
        assert_tiles(&schematic);
    }
}

#[test]
fn sorted_array_pipeline_matches_nested_map_reference() {
    let paths = vec![
        path("a", &[0, 1, 2, 5, 6, 8], &[(2, 5), (6, 8), (8, 2), (2, 5)]),
        path("b", &[0, 3, 4, 8, 9], &[(0, 3), (4, 8), (9, 0), (4, 4)]),
        path("c", &[1, 2, 7], &[(2, 7), (7, 1)]),
    ];

    let (entering, leaving, dividers) =
        find_dividers(&paths, 10, SegmentConfig::default()).unwrap();
    let (ref_entering, ref_leaving, ref_dividers) = reference_dividers(&paths);

    assert_eq!(dividers, ref_dividers);

    let entering: BTreeMap<u32, BTreeMap<u32, Vec<bool>>> =
        entering.into_iter().collect();
    let leaving: BTreeMap<u32, BTreeMap<u32, Vec<bool>>> =
        leaving.into_iter().collect();
    assert_eq!(entering, ref_entering);
    assert_eq!(leaving, ref_leaving);
}

#[test]
fn physical_pruning_preserves_the_schematic() {
    // (7, 9) spans only bin 8, occupied by nobody: pure noise
    let mut paths = vec![
        path("a", &[0, 1, 4, 5, 9], &[(1, 4), (5, 9), (9, 0)]),
        path("b", &[0, 2, 3, 7], &[(0, 2), (3, 7), (7, 3), (7, 9)]),
    ];
    let before = segment(&paths, 10, 100, SegmentConfig::default()).unwrap();

    let dropped = prune_links(&mut paths);
    assert_eq!(dropped, 1);
    let after = segment(&paths, 10, 100, SegmentConfig::default()).unwrap();

    assert_eq!(before, after);
}

#[test]
fn self_loops_flow_through_without_creating_components() {
    let paths = vec![path("a", &[0, 1, 2, 3, 4], &[(2, 2), (4, 4)])];
    let schematic = segment(&paths, 5, 100, SegmentConfig::default()).unwrap();
    assert_tiles(&schematic);
    assert_eq!(schematic.components.len(), 1);
    assert!(schematic.components[0].departures.is_empty());
    assert!(schematic.components[0].arrivals.is_empty());
}

#[test]
fn link_columns_merge_only_on_exact_endpoints() {
    // both paths jump out of bin 5 but land in different places: two
    // distinct departure columns, not one
    let paths = vec![
        path("a", &[0, 5, 6, 7], &[(5, 7)]),
        path("b", &[0, 5, 6, 8], &[(5, 8)]),
    ];
    let (_, leaving, _) = find_dividers(&paths, 9, SegmentConfig::default()).unwrap();
    let out = &leaving[&5];
    assert_eq!(out.len(), 2);
    assert_eq!(out[&7], vec![true, false]);
    assert_eq!(out[&8], vec![false, true]);
}

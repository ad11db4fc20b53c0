use std::collections::BTreeMap;
use std::time::Instant;

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::dividers::{is_divider, keep_link, occupied_bin_union, path_boundaries, self_loops};
use crate::error::SegmentationError;
use crate::groups::{find_groups, sort_and_drop_duplicates, LinkRecord};
use crate::matrix_structs::{Component, LinkColumn, MatrixCell, PangenomeSchematic, Path};

/// Participant bitmaps keyed on one endpoint of a divider link; the inner
/// map is keyed on the opposite endpoint. BTreeMap on the inside so link
/// columns come out ordered by that endpoint, deterministically.
pub type LinkMap = FxHashMap<u32, BTreeMap<u32, Vec<bool>>>;

/// Explicit configuration for one segmentation run; the core never reads
/// argv or environment state.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentConfig {
    /// Skip links whose gap spans nothing any path occupies when collecting
    /// divider evidence. Safe: the union occupancy check accepts every link
    /// the per-path divider test would.
    pub prune_links: bool,
}

/// Evaluate the divider predicate over every link of every path and emit the
/// raw `(upstream, downstream, path_index)` evidence stream. Links outside
/// the coordinate space are a hard error naming the path.
fn collect_evidence(
    paths: &[Path],
    pangenome_length: u32,
    prune_union: Option<&[u32]>,
) -> Result<Vec<LinkRecord<u32>>, SegmentationError> {
    let mut records = Vec::new();
    for (path_index, path) in paths.iter().enumerate() {
        let occupied = path.sorted_bin_ids();
        let boundaries = path_boundaries(&path.links);
        let loops = self_loops(&path.links);
        debug!(
            path = %path.name,
            bins = occupied.len(),
            links = path.links.len(),
            boundary_links = boundaries.iter().filter(|&&f| f).count(),
            self_loops = loops.iter().filter(|&&f| f).count(),
            "collecting divider evidence"
        );
        for link in &path.links {
            if link.upstream >= pangenome_length || link.downstream >= pangenome_length {
                return Err(SegmentationError::LinkOutOfBounds {
                    path: path.name.clone(),
                    upstream: link.upstream,
                    downstream: link.downstream,
                    pangenome_length,
                });
            }
            if let Some(union) = prune_union {
                if !keep_link(link, union) {
                    continue;
                }
            }
            if is_divider(link, &occupied) {
                records.push(LinkRecord {
                    upstream: link.upstream,
                    downstream: link.downstream,
                    path_index: path_index as u32,
                });
            }
        }
    }
    Ok(records)
}

/// Detect component boundaries from per-path link topology.
///
/// Returns `(entering, leaving, dividers)`: participant bitmaps for links
/// entering a position and leaving a position, plus the sorted set of
/// divider positions. Position 0 is always a component start; every divider
/// link adds `upstream + 1` and `downstream`.
pub fn find_dividers(
    paths: &[Path],
    pangenome_length: u32,
    config: SegmentConfig,
) -> Result<(LinkMap, LinkMap, Vec<u32>), SegmentationError> {
    let union = if config.prune_links {
        Some(occupied_bin_union(paths))
    } else {
        None
    };
    let mut records = collect_evidence(paths, pangenome_length, union.as_deref())?;
    sort_and_drop_duplicates(&mut records);

    let mut entering: LinkMap = FxHashMap::default();
    let mut leaving: LinkMap = FxHashMap::default();
    let mut dividers: Vec<u32> = vec![0];

    for (start, end) in find_groups(&records) {
        let key = records[start];
        let mut participants = vec![false; paths.len()];
        for record in &records[start..end] {
            participants[record.path_index as usize] = true;
        }
        leaving
            .entry(key.upstream)
            .or_default()
            .insert(key.downstream, participants.clone());
        entering
            .entry(key.downstream)
            .or_default()
            .insert(key.upstream, participants);
        dividers.push(key.upstream + 1);
        dividers.push(key.downstream);
    }

    radsort::sort(&mut dividers);
    dividers.dedup();
    Ok((entering, leaving, dividers))
}

fn attach_link_columns(component: &mut Component, entering: &LinkMap, leaving: &LinkMap) {
    // No reordering by traversal frequency or copy number: columns keep the
    // opposite-endpoint order of the maps.
    if let Some(outgoing) = leaving.get(&component.last_bin) {
        for (&arriving_pos, participants) in outgoing {
            component.departures.push(LinkColumn {
                upstream: component.last_bin,
                downstream: arriving_pos,
                participants: participants.clone(),
            });
        }
    }
    if let Some(incoming) = entering.get(&component.first_bin) {
        for (&origin_pos, participants) in incoming {
            component.arrivals.push(LinkColumn {
                upstream: origin_pos,
                downstream: component.first_bin,
                participants: participants.clone(),
            });
        }
    }
}

/// Fill `occupants` and `matrix` by range-scanning every path's bins against
/// the component's `[first_bin, last_bin]`.
fn fill_occupancy(component: &mut Component, paths: &[Path]) {
    let width = (component.last_bin - component.first_bin + 1) as usize;
    for path in paths {
        let mut row: Vec<Option<MatrixCell>> = vec![None; width];
        let mut occupied = false;
        for (&bin_id, bin) in path.bins.range(component.first_bin..=component.last_bin) {
            occupied = true;
            row[(bin_id - component.first_bin) as usize] = Some(MatrixCell {
                coverage: bin.coverage,
                inversion: bin.inversion_rate,
                first_nucleotide: bin.first_nucleotide,
                last_nucleotide: bin.last_nucleotide,
            });
        }
        component.occupants.push(occupied);
        component.matrix.push(row);
    }
}

fn check_contiguity(
    components: &[Component],
    pangenome_length: u32,
) -> Result<(), SegmentationError> {
    let mut expected = 0u32;
    for component in components {
        if component.first_bin != expected || component.last_bin < component.first_bin {
            return Err(SegmentationError::BrokenTiling {
                expected,
                found: component.first_bin,
            });
        }
        expected = component.last_bin + 1;
    }
    if expected != pangenome_length {
        return Err(SegmentationError::BrokenTiling {
            expected: pangenome_length,
            found: expected,
        });
    }
    Ok(())
}

/// Segment the matrix into components.
///
/// The produced components, walked in order, tile `[0, pangenome_length)`
/// exactly: each starts where its predecessor ended. An empty coordinate
/// space yields an empty schematic; a non-empty space with no paths is a
/// data mismatch.
pub fn segment(
    paths: &[Path],
    pangenome_length: u32,
    bin_width: u32,
    config: SegmentConfig,
) -> Result<PangenomeSchematic, SegmentationError> {
    let path_names: Vec<String> = paths.iter().map(|p| p.name.clone()).collect();

    if pangenome_length == 0 {
        return Ok(PangenomeSchematic {
            pangenome_length,
            bin_width,
            path_names,
            components: Vec::new(),
        });
    }
    if paths.is_empty() {
        return Err(SegmentationError::EmptyMatrix { pangenome_length });
    }

    info!(paths = paths.len(), pangenome_length, "starting segmentation");
    let start = Instant::now();
    let (entering, leaving, mut dividers) = find_dividers(paths, pangenome_length, config)?;
    info!(
        dividers = dividers.len(),
        elapsed = ?start.elapsed(),
        "divider detection done"
    );

    // Terminal sentinel so the final region becomes a component too. Every
    // divider from links is <= pangenome_length, so the vec stays sorted.
    if dividers.last() != Some(&pangenome_length) {
        dividers.push(pangenome_length);
    }

    let start = Instant::now();
    let mut components = Vec::with_capacity(dividers.len());
    let mut start_pos = 0u32;
    for &valid_start in &dividers {
        if valid_start != 0 {
            let mut component = Component::new(start_pos, valid_start - 1);
            attach_link_columns(&mut component, &entering, &leaving);
            fill_occupancy(&mut component, paths);
            components.push(component);
        }
        start_pos = valid_start;
    }

    check_contiguity(&components, pangenome_length)?;
    info!(
        components = components.len(),
        elapsed = ?start.elapsed(),
        "component build done"
    );

    Ok(PangenomeSchematic {
        pangenome_length,
        bin_width,
        path_names,
        components,
    })
}

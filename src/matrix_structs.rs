use std::collections::BTreeMap;

use serde::Serialize;

/// A recorded jump within one path from `upstream` directly to `downstream`,
/// skipping every bin strictly between them in the global coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    pub upstream: u32,
    pub downstream: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathBin {
    pub bin_id: u32,
    pub coverage: f64,
    pub inversion_rate: f64,
    pub first_nucleotide: u64,
    pub last_nucleotide: u64,
    pub sequence: Option<String>,
}

/// One genome or haplotype: the bins it occupies along the shared bin
/// coordinate plus the structural links recorded for it upstream.
///
/// Bins are keyed by bin id; membership tests and range scans are O(log n).
/// A path's position in the global path list is its immutable index, used as
/// the bit position in participant and occupant bitmaps.
#[derive(Debug, Clone, Default)]
pub struct Path {
    pub name: String,
    pub bins: BTreeMap<u32, PathBin>,
    pub links: Vec<Link>,
}

impl Path {
    pub fn new(name: &str) -> Self {
        Path {
            name: name.to_string(),
            bins: BTreeMap::new(),
            links: Vec::new(),
        }
    }

    pub fn contains(&self, bin_id: u32) -> bool {
        self.bins.contains_key(&bin_id)
    }

    /// All bin ids this path occupies, ascending.
    pub fn sorted_bin_ids(&self) -> Vec<u32> {
        self.bins.keys().copied().collect()
    }
}

/// Per-path projection of one bin inside a component's matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixCell {
    pub coverage: f64,
    pub inversion: f64,
    pub first_nucleotide: u64,
    pub last_nucleotide: u64,
}

/// One inter-component jump. Identity is the exact `(upstream, downstream)`
/// pair; columns with different endpoints never merge. `participants` is
/// indexed by the global path ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkColumn {
    pub upstream: u32,
    pub downstream: u32,
    pub participants: Vec<bool>,
}

/// Block of co-linear variation: the inclusive bin range `[first_bin,
/// last_bin]`, which paths occupy it, the per-path-per-bin cell matrix, and
/// the link columns entering `first_bin` and leaving `last_bin`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    pub first_bin: u32,
    pub last_bin: u32,
    pub occupants: Vec<bool>,
    pub matrix: Vec<Vec<Option<MatrixCell>>>,
    pub arrivals: Vec<LinkColumn>,
    pub departures: Vec<LinkColumn>,
}

impl Component {
    pub fn new(first_bin: u32, last_bin: u32) -> Self {
        Component {
            first_bin,
            last_bin,
            occupants: Vec::new(),
            matrix: Vec::new(),
            arrivals: Vec::new(),
            departures: Vec::new(),
        }
    }

    /// Rough column count used to estimate serialized size. LinkColumns are
    /// counted twice because they carry a participant list.
    pub fn column_count(&self) -> usize {
        2 * (self.arrivals.len() + self.departures.len())
            + (self.last_bin - self.first_bin) as usize
    }
}

/// The final segmentation: an ordered component sequence tiling
/// `[0, pangenome_length)` contiguously, with loader metadata passed through
/// for the serializer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PangenomeSchematic {
    pub pangenome_length: u32,
    pub bin_width: u32,
    pub path_names: Vec<String>,
    pub components: Vec<Component>,
}

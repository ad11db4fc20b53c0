use std::fs;
use std::path::Path as FsPath;
use std::sync::Arc;

use polars::prelude::*;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::SegmentationError;
use crate::matrix_structs::{Link, Path, PathBin};

/// `metadata.json` sitting next to the CSV tables.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub pangenome_length: u32,
    pub bin_width: u32,
}

/// A fully populated input matrix: the ordered path list (the ordering all
/// participant bitmaps index into) plus the coordinate metadata.
#[derive(Debug, Clone)]
pub struct LoadedMatrix {
    pub paths: Vec<Path>,
    pub pangenome_length: u32,
    pub bin_width: u32,
}

fn read_csv(file: &FsPath, schema: Schema) -> Result<DataFrame, SegmentationError> {
    let parse_options = CsvParseOptions::default().with_separator(b',');
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(Arc::new(schema)))
        .with_rechunk(true)
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(file.to_path_buf()))?
        .finish()?;
    Ok(df)
}

fn u32_column<'a>(
    df: &'a DataFrame,
    file: &str,
    column: &str,
) -> Result<&'a [u32], SegmentationError> {
    df.column(column)?
        .u32()?
        .cont_slice()
        .map_err(|_| SegmentationError::BadColumn {
            file: file.to_string(),
            column: column.to_string(),
        })
}

fn f64_column<'a>(
    df: &'a DataFrame,
    file: &str,
    column: &str,
) -> Result<&'a [f64], SegmentationError> {
    df.column(column)?
        .f64()?
        .cont_slice()
        .map_err(|_| SegmentationError::BadColumn {
            file: file.to_string(),
            column: column.to_string(),
        })
}

fn u64_column<'a>(
    df: &'a DataFrame,
    file: &str,
    column: &str,
) -> Result<&'a [u64], SegmentationError> {
    df.column(column)?
        .u64()?
        .cont_slice()
        .map_err(|_| SegmentationError::BadColumn {
            file: file.to_string(),
            column: column.to_string(),
        })
}

/// Load a matrix directory: `metadata.json`, `paths.csv` (name),
/// `path_bins.csv` (path_id, bin_id, mean_cov, mean_inv, start, end) and
/// `links.csv` (path_id, upstream, downstream). Path order in `paths.csv`
/// is the global path ordering and is preserved end-to-end.
pub fn load_directory(dir: &FsPath) -> Result<LoadedMatrix, SegmentationError> {
    let metadata: Metadata =
        serde_json::from_str(&fs::read_to_string(dir.join("metadata.json"))?)?;

    let paths_schema = Schema::from_iter(vec![Field::new("name".into(), DataType::String)]);
    let bins_schema = Schema::from_iter(vec![
        Field::new("path_id".into(), DataType::UInt32),
        Field::new("bin_id".into(), DataType::UInt32),
        Field::new("mean_cov".into(), DataType::Float64),
        Field::new("mean_inv".into(), DataType::Float64),
        Field::new("start".into(), DataType::UInt64),
        Field::new("end".into(), DataType::UInt64),
    ]);
    let links_schema = Schema::from_iter(vec![
        Field::new("path_id".into(), DataType::UInt32),
        Field::new("upstream".into(), DataType::UInt32),
        Field::new("downstream".into(), DataType::UInt32),
    ]);

    let paths_df = read_csv(&dir.join("paths.csv"), paths_schema)?;
    let bins_df = read_csv(&dir.join("path_bins.csv"), bins_schema)?;
    let links_df = read_csv(&dir.join("links.csv"), links_schema)?;

    let mut paths: Vec<Path> = Vec::with_capacity(paths_df.height());
    let mut seen: FxHashSet<String> = FxHashSet::default();
    for opt_name in paths_df.column("name")?.str()? {
        let name = opt_name.ok_or_else(|| SegmentationError::BadColumn {
            file: "paths.csv".to_string(),
            column: "name".to_string(),
        })?;
        if !seen.insert(name.to_string()) {
            // not an error: the core addresses paths by index, never by name
            warn!(path = name, "duplicate path name");
        }
        paths.push(Path::new(name));
    }

    let bin_path_ids = u32_column(&bins_df, "path_bins.csv", "path_id")?;
    let bin_ids = u32_column(&bins_df, "path_bins.csv", "bin_id")?;
    let coverages = f64_column(&bins_df, "path_bins.csv", "mean_cov")?;
    let inversions = f64_column(&bins_df, "path_bins.csv", "mean_inv")?;
    let starts = u64_column(&bins_df, "path_bins.csv", "start")?;
    let ends = u64_column(&bins_df, "path_bins.csv", "end")?;

    for i in 0..bin_path_ids.len() {
        let path = paths.get_mut(bin_path_ids[i] as usize).ok_or_else(|| {
            SegmentationError::UnknownPathId {
                file: "path_bins.csv".to_string(),
                path_id: bin_path_ids[i],
            }
        })?;
        path.bins.insert(
            bin_ids[i],
            PathBin {
                bin_id: bin_ids[i],
                coverage: coverages[i],
                inversion_rate: inversions[i],
                first_nucleotide: starts[i],
                last_nucleotide: ends[i],
                sequence: None,
            },
        );
    }

    let link_path_ids = u32_column(&links_df, "links.csv", "path_id")?;
    let upstreams = u32_column(&links_df, "links.csv", "upstream")?;
    let downstreams = u32_column(&links_df, "links.csv", "downstream")?;

    for i in 0..link_path_ids.len() {
        let path = paths.get_mut(link_path_ids[i] as usize).ok_or_else(|| {
            SegmentationError::UnknownPathId {
                file: "links.csv".to_string(),
                path_id: link_path_ids[i],
            }
        })?;
        path.links.push(Link {
            upstream: upstreams[i],
            downstream: downstreams[i],
        });
    }

    info!(
        paths = paths.len(),
        bins = bin_path_ids.len(),
        links = link_path_ids.len(),
        pangenome_length = metadata.pangenome_length,
        "matrix loaded"
    );

    Ok(LoadedMatrix {
        paths,
        pangenome_length: metadata.pangenome_length,
        bin_width: metadata.bin_width,
    })
}

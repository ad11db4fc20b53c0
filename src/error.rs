use thiserror::Error;

/// Error type for loading and segmenting a pangenome matrix.
#[derive(Debug, Error)]
pub enum SegmentationError {
    /// A link references a bin outside the pangenome coordinate space.
    /// Never clamped: a misplaced link could silently lose a true divider.
    #[error(
        "link {upstream}->{downstream} on path '{path}' lies outside [0, {pangenome_length})"
    )]
    LinkOutOfBounds {
        path: String,
        upstream: u32,
        downstream: u32,
        pangenome_length: u32,
    },
    /// A non-empty coordinate space with no paths to tile it.
    #[error("pangenome length is {pangenome_length} but no paths were supplied")]
    EmptyMatrix { pangenome_length: u32 },
    /// Internal invariant violation: the built components do not tile the
    /// coordinate space contiguously. A bug, not a data problem.
    #[error("component tiling is broken: expected bin {expected}, found {found}")]
    BrokenTiling { expected: u32, found: u32 },
    /// A bin or link row references a path index that was never declared.
    #[error("path_id {path_id} in {file} does not match any declared path")]
    UnknownPathId { file: String, path_id: u32 },
    /// A required input column is missing, has the wrong type, or holds nulls.
    #[error("column '{column}' in {file} is missing, mistyped, or incomplete")]
    BadColumn { file: String, column: String },
    #[error("failed to read input table: {0}")]
    Table(#[from] polars::prelude::PolarsError),
    #[error("failed to parse metadata: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

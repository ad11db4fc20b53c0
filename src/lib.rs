pub mod dividers;
pub mod error;
pub mod groups;
pub mod loader;
pub mod matrix_structs;
pub mod segmentation;
pub mod serializer;

pub use error::SegmentationError;
pub use matrix_structs::{
    Component, Link, LinkColumn, MatrixCell, PangenomeSchematic, Path, PathBin,
};
pub use segmentation::{find_dividers, segment, SegmentConfig};

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path as FsPath, PathBuf};

use tracing::info;

use crate::error::SegmentationError;
use crate::matrix_structs::PangenomeSchematic;

/// Write the schematic as pretty-printed JSON into `out_dir/schematic.json`,
/// creating the directory if needed. Returns the file path.
pub fn write_json(
    schematic: &PangenomeSchematic,
    out_dir: &FsPath,
) -> Result<PathBuf, SegmentationError> {
    std::fs::create_dir_all(out_dir)?;
    let file = out_dir.join("schematic.json");
    let writer = BufWriter::new(File::create(&file)?);
    serde_json::to_writer_pretty(writer, schematic)?;
    info!(
        file = %file.display(),
        components = schematic.components.len(),
        columns = schematic
            .components
            .iter()
            .map(|c| c.column_count())
            .sum::<usize>(),
        "wrote schematic"
    );
    Ok(file)
}

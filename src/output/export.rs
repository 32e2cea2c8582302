//! Post-run export hook
//!
//! Copies the finished workbook into a hand-off directory (a synced folder,
//! a download area) once a run ends.

use std::io;
use std::path::{Path, PathBuf};

/// Copies `workbook` into `export_dir`, creating the directory if needed
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the exported copy
/// * `Err(io::Error)` - The directory could not be created or the copy failed
pub fn export_workbook(workbook: &Path, export_dir: &Path) -> io::Result<PathBuf> {
    let file_name = workbook.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("workbook path has no file name: {}", workbook.display()),
        )
    })?;

    std::fs::create_dir_all(export_dir)?;
    let destination = export_dir.join(file_name);
    std::fs::copy(workbook, &destination)?;

    tracing::info!(
        "Exported {} to {}",
        workbook.display(),
        destination.display()
    );
    Ok(destination)
}

//! Output directory bootstrap.

use std::fs;
use std::path::Path;

use pricefeed_core::Result;
use tracing::info;

/// Ensure the parent directory of every path exists.
///
/// Missing directories are created along with any intermediate ones. Existing
/// directories are left alone and nothing is ever deleted or truncated. Paths
/// without a parent component live in the working directory and need nothing.
///
/// # Errors
/// Returns [`DataError::Io`](pricefeed_core::DataError::Io) if a directory
/// cannot be created.
pub fn ensure_parent_dirs<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    for path in paths {
        let Some(folder) = path.as_ref().parent() else {
            continue;
        };
        if folder.as_os_str().is_empty() {
            continue;
        }

        if folder.is_dir() {
            info!("Folder already exists: {}", folder.display());
        } else {
            info!("Creating folder: {}", folder.display());
            fs::create_dir_all(folder)?;
        }
    }
    Ok(())
}

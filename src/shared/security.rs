use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum size of a report dump, repository snapshot or config file (100 MB)
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Reads a regular file into a string after checking it is safe to load.
///
/// Symbolic links and non-regular files are rejected, and files larger
/// than `max_size` are refused before any byte is read.
///
/// # Arguments
/// * `path` - The file to read
/// * `file_description` - Human readable description used in error messages
/// * `max_size` - Maximum allowed size in bytes
pub fn read_regular_file(path: &Path, file_description: &str, max_size: u64) -> Result<String> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read {} metadata: {}: {}",
            file_description,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    if metadata.len() > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            metadata.len(),
            max_size
        );
    }

    fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file_description, e))
}

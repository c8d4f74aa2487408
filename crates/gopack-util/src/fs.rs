use std::io::Write;
use std::path::Path;

/// Ensure a directory exists, creating it and any parents if needed.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Create a directory symlink at `link` pointing to `target`.
///
/// Parent directories of `link` are created. An entry already present at
/// `link` is left alone and is not an error.
pub fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    if let Some(parent) = link.parent() {
        ensure_dir(parent)?;
    }
    match create_symlink(target, link) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            tracing::debug!("Link {} already exists", link.display());
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

/// Write `contents` to `path` through a temp file in the same directory.
///
/// Readers see either the previous contents or the new ones, never a
/// partially written file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    ensure_dir(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

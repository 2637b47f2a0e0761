//! Owner-only filesystem permissions for the database and its directory.
//!
//! Records carry client data, so the database lives in a 0o700 directory and
//! the file itself (plus SQLite's WAL/SHM sidecars) is kept at 0o600.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const SIDECAR_SUFFIXES: [&str; 2] = ["-wal", "-shm"];

/// Prepare `db_path` for opening: private parent directory, private file.
pub(crate) fn prepare_db_location(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_private_dir(parent)?;
    }
    create_private_file(db_path)?;
    restrict_sidecars(db_path);
    Ok(())
}

fn create_private_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create database directory: {}", dir.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::{MetadataExt, PermissionsExt};

        let metadata = std::fs::metadata(dir)
            .with_context(|| format!("Failed to read directory metadata: {}", dir.display()))?;

        // Shared directories we don't own are left alone.
        let our_uid = unsafe { libc::getuid() };
        if metadata.uid() != our_uid {
            return Ok(());
        }

        if metadata.permissions().mode() & 0o077 != 0 {
            std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700)).with_context(
                || format!("Failed to restrict directory permissions: {}", dir.display()),
            )?;
        }
    }
    Ok(())
}

fn create_private_file(db_path: &Path) -> Result<()> {
    let mut options = OpenOptions::new();
    options.create(true).truncate(false).read(true).write(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
        .open(db_path)
        .with_context(|| format!("Failed to create database file: {}", db_path.display()))?;

    // `mode` only applies on creation; tighten files left by older runs.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(db_path, std::fs::Permissions::from_mode(0o600)).with_context(
            || format!("Failed to restrict database permissions: {}", db_path.display()),
        )?;
    }
    Ok(())
}

fn restrict_sidecars(db_path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        for suffix in SIDECAR_SUFFIXES {
            let sidecar = sidecar_path(db_path, suffix);
            if sidecar.exists()
                && let Err(err) =
                    std::fs::set_permissions(&sidecar, std::fs::Permissions::from_mode(0o600))
            {
                tracing::warn!(path = %sidecar.display(), "Failed to restrict sidecar: {err}");
            }
        }
    }
    #[cfg(not(unix))]
    let _ = (db_path, SIDECAR_SUFFIXES);
}

fn sidecar_path(db_path: &Path, suffix: &str) -> PathBuf {
    match db_path.file_name() {
        Some(name) => db_path.with_file_name(format!("{}{suffix}", name.to_string_lossy())),
        None => PathBuf::from(format!("{}{suffix}", db_path.display())),
    }
}

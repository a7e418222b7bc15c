//! Zip extraction for artifacts that ship compressed.
//!
//! Extraction only happens when the target file is absent, so a second
//! startup with the archive still on disk is a no-op.

use crate::error::{DataLoadError, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// What `ensure_extracted` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Target file was already on disk; archive untouched
    AlreadyPresent,
    /// Neither the target nor the archive exists
    ArchiveMissing,
    /// Archive was unpacked next to the target
    Extracted { entries: usize },
}

/// Make sure `target` exists, unpacking `archive` into the target's directory if needed
pub fn ensure_extracted(target: &Path, archive: &Path) -> Result<ExtractOutcome> {
    if target.exists() {
        debug!("{} already present, skipping extraction", target.display());
        return Ok(ExtractOutcome::AlreadyPresent);
    }
    if !archive.exists() {
        debug!("No archive at {}", archive.display());
        return Ok(ExtractOutcome::ArchiveMissing);
    }

    let dest_dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    info!(
        "Extracting {} into {}",
        archive.display(),
        dest_dir.display()
    );
    let entries = extract_zip(archive, dest_dir)?;
    Ok(ExtractOutcome::Extracted { entries })
}

/// Unpack every entry of a zip archive under `dest_dir`, returning the file count
fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<usize> {
    let archive_err = |reason: String| DataLoadError::Archive {
        path: archive_path.to_path_buf(),
        reason,
    };

    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| archive_err(format!("Failed to read zip: {}", e)))?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| archive_err(format!("Failed to read zip entry: {}", e)))?;

        // Entries like "../x" or "/etc/x" would land outside dest_dir
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| archive_err(format!("Unsafe entry name: {}", entry.name())))?;
        let outpath = dest_dir.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath)?;
            continue;
        }
        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut outfile = File::create(&outpath)?;
        io::copy(&mut entry, &mut outfile)?;
        written += 1;
    }

    Ok(written)
}

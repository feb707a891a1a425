use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

/// Replace `path` with `data` so readers see either the old file or the
/// complete new one.
///
/// Missing parent directories are created. The data goes to a temp file in
/// the destination directory, is synced, then renamed over the destination.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path_for(path)?;
    if let Err(err) = write_synced(&tmp_path, data).and_then(|()| replace(&tmp_path, path)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    log::debug!("wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

fn temp_path_for(path: &Path) -> io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", path.display()),
        )
    })?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);

    let mut tmp_name = OsString::from(".");
    tmp_name.push(name);
    tmp_name.push(format!(".{}-{}.tmp", process::id(), nanos));
    Ok(path.with_file_name(tmp_name))
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut f = File::create(path)?;
    f.write_all(data)?;
    f.sync_all()
}

fn replace(tmp_path: &Path, path: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        // Windows rename fails if destination exists.
        if path.exists() {
            fs::remove_file(path)?;
        }
    }

    fs::rename(tmp_path, path)?;
    sync_parent(path)
}

/// Persist the rename itself by syncing the containing directory.
#[cfg(unix)]
fn sync_parent(path: &Path) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    File::open(parent)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> io::Result<()> {
    Ok(())
}

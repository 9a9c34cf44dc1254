//! Collecting files to upload.

use std::fs;
use std::path::Path;

use kickoff_devops::FileMap;

/// Reads every regular file below `dir`, keyed by its `/`-separated path
/// relative to `dir`. Hidden entries (leading `.`) are skipped.
pub fn collect_files(dir: &Path) -> Result<FileMap, String> {
    if !dir.is_dir() {
        return Err(format!("Not a directory: {}", dir.display()));
    }
    let mut files = FileMap::new();
    walk(dir, "", &mut files)?;
    Ok(files)
}

fn walk(dir: &Path, prefix: &str, files: &mut FileMap) -> Result<(), String> {
    let entries =
        fs::read_dir(dir).map_err(|e| format!("Cannot read {}: {}", dir.display(), e))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("Cannot read {}: {}", dir.display(), e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        let key = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };

        if path.is_dir() {
            walk(&path, &key, files)?;
        } else if path.is_file() {
            let content =
                fs::read(&path).map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
            files.insert(key, content);
        }
    }
    Ok(())
}

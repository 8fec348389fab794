use std::fs;
use std::path::{Path, PathBuf};

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp"];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Turn command-line arguments into an image set. Files are kept in the order
/// given whatever their extension; directories contribute their image files
/// sorted by name.
pub fn expand_paths(paths: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            scan_dir(path, recursive, &mut out);
        } else {
            out.push(path.clone());
        }
    }
    log::info!("Collected {} image paths from the command line", out.len());
    out
}

fn scan_dir(dir: &Path, recursive: bool, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot read directory {}: {}", dir.display(), e);
            return;
        }
    };
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in entries.filter_map(|e| e.ok()) {
        let p = entry.path();
        if p.is_file() && is_image_file(&p) {
            files.push(p);
        } else if recursive && p.is_dir() {
            subdirs.push(p);
        }
    }

    files.sort();
    out.extend(files);

    if recursive {
        subdirs.sort();
        for sub in subdirs {
            scan_dir(&sub, true, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"x").expect("failed to create test file");
        path
    }

    #[test]
    fn recognises_supported_extensions() {
        for name in ["a.jpg", "b.JPEG", "c.png", "d.gif", "e.bmp", "f.tiff", "g.TIF", "h.webp"] {
            assert!(is_image_file(Path::new(name)), "{name}");
        }
        for name in ["notes.txt", "archive.zip", "noext", "photo.exr"] {
            assert!(!is_image_file(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn directories_expand_sorted_and_filtered() {
        let dir = tempdir().expect("failed to create temp dir");
        touch(dir.path(), "c.png");
        touch(dir.path(), "a.jpg");
        touch(dir.path(), "readme.txt");
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).expect("failed to create subdir");
        touch(&sub, "b.gif");

        let flat = expand_paths(&[dir.path().to_path_buf()], false);
        assert_eq!(flat, vec![dir.path().join("a.jpg"), dir.path().join("c.png")]);

        let deep = expand_paths(&[dir.path().to_path_buf()], true);
        assert_eq!(deep.len(), 3);
        assert_eq!(deep[2], sub.join("b.gif"));
    }

    #[test]
    fn explicit_files_keep_argument_order() {
        let dir = tempdir().expect("failed to create temp dir");
        let z = touch(dir.path(), "z.png");
        let a = touch(dir.path(), "a.png");
        let missing = dir.path().join("missing.png");

        let out = expand_paths(&[z.clone(), missing.clone(), a.clone()], false);
        assert_eq!(out, vec![z, missing, a]);
    }
}

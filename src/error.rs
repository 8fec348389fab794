use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to replace the image set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("no files selected")]
    EmptySelection,
}

/// Failure to decode the image at the current index.
///
/// Errors carry strings rather than the source error so a failed decode can
/// be cached alongside successful ones.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no images loaded")]
    NoImageLoaded,

    #[error("{}: file not found", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("{}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("{}: unsupported format ({reason})", .path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    #[error("{}: corrupt image data ({reason})", .path.display())]
    CorruptFile { path: PathBuf, reason: String },
}

impl DecodeError {
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => DecodeError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => DecodeError::Unreadable {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
        }
    }

    pub fn from_image(path: &Path, err: image::ImageError) -> Self {
        use image::ImageError;
        match err {
            ImageError::IoError(e) => Self::from_io(path, e),
            ImageError::Unsupported(e) => DecodeError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
            other => DecodeError::CorruptFile {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        }
    }

    /// Short label for the status bar.
    pub fn kind_label(&self) -> &'static str {
        match self {
            DecodeError::NoImageLoaded => "no image",
            DecodeError::FileNotFound { .. } => "file not found",
            DecodeError::Unreadable { .. } => "unreadable file",
            DecodeError::UnsupportedFormat { .. } => "unsupported format",
            DecodeError::CorruptFile { .. } => "corrupt file",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_io_error_maps_to_file_not_found() {
        let err = DecodeError::from_io(
            Path::new("gone.png"),
            io::Error::new(io::ErrorKind::NotFound, "nope"),
        );
        assert_eq!(
            err,
            DecodeError::FileNotFound {
                path: PathBuf::from("gone.png")
            }
        );
        assert_eq!(err.to_string(), "gone.png: file not found");
    }

    #[test]
    fn permission_error_maps_to_unreadable() {
        let err = DecodeError::from_io(
            Path::new("locked.png"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, DecodeError::Unreadable { .. }));
        assert_eq!(err.kind_label(), "unreadable file");
    }

    #[test]
    fn empty_selection_message() {
        assert_eq!(LoadError::EmptySelection.to_string(), "no files selected");
    }
}

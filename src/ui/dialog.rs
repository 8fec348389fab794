use rfd::FileDialog;
use std::path::PathBuf;
use winit::window::Window;

use crate::config::{DIALOG_FILTERS, DIALOG_TITLE};

/// Show the native multi-file picker. `None` when the user cancels.
pub fn pick_images(parent: Option<&Window>) -> Option<Vec<PathBuf>> {
    let mut dialog = FileDialog::new().set_title(DIALOG_TITLE);
    for &(name, extensions) in DIALOG_FILTERS {
        dialog = dialog.add_filter(name, extensions);
    }
    if let Some(window) = parent {
        dialog = dialog.set_parent(window);
    }
    let picked = dialog.pick_files();
    match &picked {
        Some(paths) => log::info!("Selected {} files", paths.len()),
        None => log::debug!("Open dialog cancelled"),
    }
    picked
}

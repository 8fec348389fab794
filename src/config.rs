use std::time::Duration;

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

pub const WINDOW_TITLE: &str = "Multi-Image Viewer";
pub const MIN_WINDOW_WIDTH: u32 = 800;
pub const MIN_WINDOW_HEIGHT: u32 = 600;
pub const DEFAULT_WINDOW_WIDTH: u32 = 1000;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 700;

/// Rescaling waits for the window size to settle this long.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// Layout (physical pixels)
// ---------------------------------------------------------------------------

pub const PADDING: u32 = 10;
pub const TOOLBAR_HEIGHT: u32 = 40;
pub const NAV_BAR_HEIGHT: u32 = 50;
pub const STATUS_BAR_HEIGHT: u32 = 25;
pub const BUTTON_WIDTH: u32 = 150;
pub const OPEN_BUTTON_HEIGHT: u32 = 30;
pub const NAV_BUTTON_HEIGHT: u32 = 40;
pub const PANEL_BORDER: u32 = 2;
/// Gap kept between the image and the panel border.
pub const IMAGE_INSET: u32 = 10;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

pub type Color = [u8; 3];

pub const BG_COLOR: Color = [0xf0, 0xf0, 0xf0];
pub const BUTTON_COLOR: Color = [0xe1, 0xe1, 0xe1];
pub const BUTTON_HOVER_COLOR: Color = [0xd4, 0xd4, 0xd4];
pub const BUTTON_ACTIVE_COLOR: Color = [0xc0, 0xc0, 0xc0];
pub const BUTTON_BORDER_COLOR: Color = [0xa0, 0xa0, 0xa0];
pub const DISABLED_TEXT_COLOR: Color = [0xa8, 0xa8, 0xa8];
pub const STATUS_BG_COLOR: Color = [0xe8, 0xe8, 0xe8];
pub const TEXT_COLOR: Color = [0x33, 0x33, 0x33];
pub const PANEL_COLOR: Color = [0xff, 0xff, 0xff];
pub const PANEL_SHADOW_COLOR: Color = [0x80, 0x80, 0x80];
pub const PLACEHOLDER_COLOR: Color = [0x80, 0x80, 0x80];

// ---------------------------------------------------------------------------
// Open dialog
// ---------------------------------------------------------------------------

pub const DIALOG_TITLE: &str = "Select Images";

pub const DIALOG_FILTERS: &[(&str, &[&str])] = &[
    ("Image files", crate::files::IMAGE_EXTENSIONS),
    ("JPEG files", &["jpg", "jpeg"]),
    ("PNG files", &["png"]),
    ("GIF files", &["gif"]),
    ("BMP files", &["bmp"]),
    ("All files", &["*"]),
];

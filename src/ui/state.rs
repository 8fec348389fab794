use std::path::PathBuf;
use std::time::Instant;
use winit::keyboard::{Key, ModifiersState, NamedKey};

use crate::config::{
    BG_COLOR, BUTTON_ACTIVE_COLOR, BUTTON_BORDER_COLOR, BUTTON_COLOR, BUTTON_HOVER_COLOR,
    DISABLED_TEXT_COLOR, PADDING, PANEL_COLOR, PANEL_SHADOW_COLOR, PLACEHOLDER_COLOR,
    RESIZE_DEBOUNCE, STATUS_BG_COLOR, TEXT_COLOR,
};
use crate::error::{DecodeError, LoadError};
use crate::image_handler::ImageHandler;
use crate::scale::{ScaleFilter, ScaledBitmap, ViewportSize, scale_to_fit_with};
use crate::ui::layout::{Button, Layout, Rect};
use crate::ui::render::{Canvas, text_height};

const TEXT_SCALE: u32 = 2;
const COUNTER_SCALE: u32 = 3;

// ---------------------------------------------------------------------------
// Input mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open,
    Next,
    Previous,
    First,
    Last,
    Quit,
}

pub fn action_for_key(key: &Key, mods: ModifiersState) -> Option<Action> {
    match key {
        Key::Named(NamedKey::ArrowLeft) => Some(Action::Previous),
        Key::Named(NamedKey::ArrowRight | NamedKey::Space | NamedKey::Enter) => Some(Action::Next),
        Key::Named(NamedKey::Home) => Some(Action::First),
        Key::Named(NamedKey::End) => Some(Action::Last),
        Key::Named(NamedKey::Escape) => Some(Action::Quit),
        Key::Character(s)
            if s.eq_ignore_ascii_case("o") && (mods.control_key() || mods.super_key()) =>
        {
            Some(Action::Open)
        }
        _ => None,
    }
}

fn loaded_message(count: usize) -> String {
    if count == 1 {
        String::from("Loaded 1 image")
    } else {
        format!("Loaded {} images", count)
    }
}

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

struct Displayed {
    bitmap: ScaledBitmap,
    /// Viewport the bitmap was fitted to.
    viewport: ViewportSize,
}

pub struct ViewerState {
    handler: ImageHandler,
    filter: ScaleFilter,
    layout: Layout,

    displayed: Option<Displayed>,
    /// Set when the current image failed to decode.
    display_error: Option<DecodeError>,
    status: String,

    /// Rescale once the window has stopped resizing.
    resize_deadline: Option<Instant>,

    hovered: Option<Button>,
    pressed: Option<Button>,
}

impl ViewerState {
    pub fn new(handler: ImageHandler, filter: ScaleFilter, win_w: u32, win_h: u32) -> Self {
        Self {
            handler,
            filter,
            layout: Layout::compute(win_w, win_h),
            displayed: None,
            display_error: None,
            status: String::from("Ready"),
            resize_deadline: None,
            hovered: None,
            pressed: None,
        }
    }

    #[cfg(test)]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[cfg(test)]
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn info_text(&self) -> String {
        match self.handler.current_file_name() {
            Some(name) => format!("Current: {}", name),
            None => String::from("No images loaded. Press Ctrl+O to get started."),
        }
    }

    pub fn counter_text(&self) -> String {
        match self.handler.position() {
            (_, 0) => String::new(),
            (pos, total) => format!("{} of {}", pos, total),
        }
    }

    pub fn is_enabled(&self, button: Button) -> bool {
        match button {
            Button::Open => true,
            Button::Previous => self.handler.has_previous(),
            Button::Next => self.handler.has_next(),
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Apply the outcome of the open dialog. `None` means it was cancelled.
    pub fn open_selection(&mut self, selection: Option<Vec<PathBuf>>) {
        match self.handler.load_set(selection.unwrap_or_default()) {
            Ok(()) => {
                if self.refresh() {
                    self.status = loaded_message(self.handler.len());
                }
            }
            Err(LoadError::EmptySelection) => {
                log::info!("Open dialog closed without a selection");
                self.status = String::from("No files selected");
            }
        }
    }

    pub fn show_next(&mut self) -> bool {
        if !self.handler.has_next() {
            return false;
        }
        self.handler.next();
        if self.refresh() {
            self.status = String::from("Next image");
        }
        true
    }

    pub fn show_previous(&mut self) -> bool {
        if !self.handler.has_previous() {
            return false;
        }
        self.handler.previous();
        if self.refresh() {
            self.status = String::from("Previous image");
        }
        true
    }

    pub fn show_first(&mut self) -> bool {
        if !self.handler.has_previous() {
            return false;
        }
        self.handler.first();
        self.refresh();
        true
    }

    pub fn show_last(&mut self) -> bool {
        if !self.handler.has_next() {
            return false;
        }
        self.handler.last();
        self.refresh();
        true
    }

    /// Decode (or reuse) the current image and fit it to the image area.
    /// Returns false if decoding failed; the status then names the error.
    pub fn refresh(&mut self) -> bool {
        self.resize_deadline = None;
        // Drop the old bitmap before producing the next one.
        self.displayed = None;
        self.display_error = None;
        if !self.handler.has_images() {
            return true;
        }

        let viewport = self.layout.viewport();
        let filter = self.filter;
        match self.handler.current() {
            Ok(img) => {
                let bitmap = scale_to_fit_with(img, viewport, filter);
                self.displayed = Some(Displayed { bitmap, viewport });
                if let (Some(name), Some((w, h))) =
                    (self.handler.current_file_name(), self.handler.original_size())
                {
                    self.status = format!("{} - {}x{} pixels", name, w, h);
                }
                true
            }
            Err(e) => {
                self.status = format!("Error loading current image: {}", e.kind_label());
                self.display_error = Some(e);
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Window events
    // -----------------------------------------------------------------------

    pub fn resize(&mut self, win_w: u32, win_h: u32, now: Instant) {
        let layout = Layout::compute(win_w, win_h);
        if layout == self.layout {
            return;
        }
        self.layout = layout;
        if self.handler.has_images() {
            self.resize_deadline = Some(now + RESIZE_DEBOUNCE);
        }
    }

    pub fn resize_deadline(&self) -> Option<Instant> {
        self.resize_deadline
    }

    /// Rescale if the debounce window has passed. Returns true if it did.
    pub fn settle_resize(&mut self, now: Instant) -> bool {
        match self.resize_deadline {
            Some(deadline) if now >= deadline => {
                self.refresh();
                true
            }
            _ => false,
        }
    }

    /// Update hover state. Returns true if a repaint is needed.
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> bool {
        let hovered = self.layout.button_at(x, y).filter(|b| self.is_enabled(*b));
        let changed = hovered != self.hovered;
        self.hovered = hovered;
        changed
    }

    pub fn pointer_pressed(&mut self, x: f64, y: f64) {
        self.pressed = self.layout.button_at(x, y).filter(|b| self.is_enabled(*b));
    }

    /// A click completes when the release lands on the pressed button.
    pub fn pointer_released(&mut self, x: f64, y: f64) -> Option<Button> {
        let pressed = self.pressed.take()?;
        (self.layout.button_at(x, y) == Some(pressed) && self.is_enabled(pressed)).then_some(pressed)
    }

    // -----------------------------------------------------------------------
    // Painting
    // -----------------------------------------------------------------------

    pub fn render(&self, canvas: &mut Canvas) {
        let l = self.layout;
        canvas.clear(BG_COLOR);

        // Toolbar
        self.draw_button(canvas, Button::Open, l.open_button, "Open Images");
        let info_y = l.info_label.y + l.info_label.height.saturating_sub(text_height(TEXT_SCALE)) / 2;
        canvas.draw_text(&self.info_text(), l.info_label.x as i32, info_y as i32, TEXT_SCALE, TEXT_COLOR);

        // Image panel, drawn sunken
        canvas.fill_rect(l.image_panel, PANEL_COLOR);
        canvas.bevel_rect(l.image_panel, PANEL_SHADOW_COLOR, BG_COLOR);
        canvas.bevel_rect(l.image_panel.inset(1), BUTTON_BORDER_COLOR, PANEL_COLOR);

        match (&self.displayed, &self.display_error) {
            (Some(d), _) => {
                let area = l.image_area;
                let (x, y) = if d.viewport == l.viewport() {
                    (area.x + d.bitmap.offset_x, area.y + d.bitmap.offset_y)
                } else {
                    // Stale bitmap while a resize settles.
                    (
                        area.x + area.width.saturating_sub(d.bitmap.width()) / 2,
                        area.y + area.height.saturating_sub(d.bitmap.height()) / 2,
                    )
                };
                canvas.blit(&d.bitmap.pixels, x, y, area);
            }
            (None, Some(err)) => {
                let line = text_height(TEXT_SCALE) + PADDING;
                let above = Rect { height: l.image_panel.height.saturating_sub(line), ..l.image_panel };
                let below = Rect { y: l.image_panel.y + line, ..above };
                canvas.draw_text_centered("Error loading image", above, TEXT_SCALE, PLACEHOLDER_COLOR);
                canvas.draw_text_centered(&err.to_string(), below, 1, PLACEHOLDER_COLOR);
            }
            (None, None) => {
                canvas.draw_text_centered("No image to display", l.image_panel, TEXT_SCALE, PLACEHOLDER_COLOR);
            }
        }

        // Navigation row
        self.draw_button(canvas, Button::Previous, l.prev_button, "< Previous");
        self.draw_button(canvas, Button::Next, l.next_button, "Next >");
        canvas.draw_text_centered(&self.counter_text(), l.counter, COUNTER_SCALE, TEXT_COLOR);

        // Status bar
        canvas.fill_rect(l.status_bar, STATUS_BG_COLOR);
        let status_y = l.status_bar.y + l.status_bar.height.saturating_sub(text_height(TEXT_SCALE)) / 2;
        canvas.draw_text(&self.status, PADDING as i32, status_y as i32, TEXT_SCALE, TEXT_COLOR);
    }

    fn draw_button(&self, canvas: &mut Canvas, button: Button, rect: Rect, label: &str) {
        let enabled = self.is_enabled(button);
        let fill = if !enabled {
            BUTTON_COLOR
        } else if self.pressed == Some(button) {
            BUTTON_ACTIVE_COLOR
        } else if self.hovered == Some(button) {
            BUTTON_HOVER_COLOR
        } else {
            BUTTON_COLOR
        };
        canvas.fill_rect(rect, fill);
        canvas.bevel_rect(rect, PANEL_COLOR, BUTTON_BORDER_COLOR);
        let text = if enabled { TEXT_COLOR } else { DISABLED_TEXT_COLOR };
        canvas.draw_text_centered(label, rect, TEXT_SCALE, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::tempdir;
    use winit::keyboard::SmolStr;

    fn write_image(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(w, h, Rgb([0, 128, 255]))
            .save(&path)
            .expect("failed to write test image");
        path
    }

    fn viewer() -> ViewerState {
        ViewerState::new(ImageHandler::new(), ScaleFilter::Nearest, 1000, 700)
    }

    fn center(r: Rect) -> (f64, f64) {
        (r.x as f64 + r.width as f64 / 2.0, r.y as f64 + r.height as f64 / 2.0)
    }

    #[test]
    fn keyboard_contract() {
        let none = ModifiersState::empty();
        assert_eq!(action_for_key(&Key::Named(NamedKey::ArrowLeft), none), Some(Action::Previous));
        for k in [NamedKey::ArrowRight, NamedKey::Space, NamedKey::Enter] {
            assert_eq!(action_for_key(&Key::Named(k), none), Some(Action::Next));
        }
        let o = Key::Character(SmolStr::new("o"));
        assert_eq!(action_for_key(&o, ModifiersState::CONTROL), Some(Action::Open));
        assert_eq!(action_for_key(&o, none), None);
        assert_eq!(action_for_key(&Key::Named(NamedKey::Escape), none), Some(Action::Quit));
    }

    #[test]
    fn starts_empty_with_disabled_navigation() {
        let v = viewer();
        assert_eq!(v.status(), "Ready");
        assert_eq!(v.counter_text(), "");
        assert!(v.info_text().starts_with("No images loaded"));
        assert!(v.is_enabled(Button::Open));
        assert!(!v.is_enabled(Button::Previous));
        assert!(!v.is_enabled(Button::Next));
    }

    #[test]
    fn cancelled_dialog_changes_nothing() {
        let dir = tempdir().expect("failed to create temp dir");
        let a = write_image(dir.path(), "a.png", 10, 10);

        let mut v = viewer();
        v.open_selection(Some(vec![a]));
        v.open_selection(None);
        assert_eq!(v.status(), "No files selected");
        assert_eq!(v.counter_text(), "1 of 1");

        v.open_selection(Some(Vec::new()));
        assert_eq!(v.status(), "No files selected");
        assert_eq!(v.counter_text(), "1 of 1");
    }

    #[test]
    fn navigation_updates_status_and_buttons() {
        let dir = tempdir().expect("failed to create temp dir");
        let paths = vec![
            write_image(dir.path(), "a.png", 40, 30),
            write_image(dir.path(), "b.png", 30, 40),
        ];

        let mut v = viewer();
        v.open_selection(Some(paths));
        assert_eq!(v.status(), "Loaded 2 images");
        assert_eq!(v.info_text(), "Current: a.png");
        assert!(v.displayed.is_some());
        assert!(v.is_enabled(Button::Next));
        assert!(!v.is_enabled(Button::Previous));

        assert!(v.show_next());
        assert_eq!(v.status(), "Next image");
        assert_eq!(v.counter_text(), "2 of 2");
        assert!(!v.show_next(), "clamped at the end");
        assert_eq!(v.counter_text(), "2 of 2");

        assert!(v.show_previous());
        assert_eq!(v.status(), "Previous image");
        assert_eq!(v.counter_text(), "1 of 2");
    }

    #[test]
    fn decode_failure_keeps_viewer_usable() {
        let dir = tempdir().expect("failed to create temp dir");
        let bad = dir.path().join("bad.png");
        fs::write(&bad, b"garbage").expect("failed to write test file");
        let good = write_image(dir.path(), "good.png", 5, 5);

        let mut v = viewer();
        v.open_selection(Some(vec![bad, good]));
        assert!(v.displayed.is_none());
        assert!(
            matches!(
                v.display_error,
                Some(DecodeError::CorruptFile { .. } | DecodeError::UnsupportedFormat { .. })
            ),
            "unexpected error: {:?}",
            v.display_error
        );
        assert!(v.status().starts_with("Error loading current image"), "{}", v.status());
        assert_eq!(v.counter_text(), "1 of 2");

        assert!(v.show_next());
        assert!(v.displayed.is_some());
        assert!(v.display_error.is_none());
        assert_eq!(v.status(), "Next image");
    }

    #[test]
    fn failed_image_keeps_error_status() {
        let dir = tempdir().expect("failed to create temp dir");
        let bad = dir.path().join("bad.png");
        fs::write(&bad, b"garbage").expect("failed to write test file");
        let good = write_image(dir.path(), "good.png", 5, 5);

        let mut v = viewer();
        v.open_selection(Some(vec![bad.clone()]));
        assert!(v.status().starts_with("Error loading current image"), "{}", v.status());

        v.open_selection(Some(vec![good.clone(), bad.clone(), good]));
        assert_eq!(v.status(), "Loaded 3 images");
        assert!(v.show_next());
        assert!(v.status().starts_with("Error loading current image"), "{}", v.status());
        assert!(v.show_next());
        assert_eq!(v.status(), "Next image");
        assert!(v.show_previous());
        assert!(v.status().starts_with("Error loading current image"), "{}", v.status());

        // A resize re-fits from the cached failure without clearing the message.
        v.resize(900, 650, Instant::now());
        assert!(v.settle_resize(Instant::now() + RESIZE_DEBOUNCE));
        assert!(v.status().starts_with("Error loading current image"), "{}", v.status());
    }

    #[test]
    fn loaded_message_counts_images() {
        assert_eq!(loaded_message(1), "Loaded 1 image");
        assert_eq!(loaded_message(2), "Loaded 2 images");
        assert_eq!(loaded_message(40), "Loaded 40 images");
    }

    #[test]
    fn displayed_bitmap_fits_image_area() {
        let dir = tempdir().expect("failed to create temp dir");
        let big = write_image(dir.path(), "big.png", 3000, 1000);

        let mut v = viewer();
        v.open_selection(Some(vec![big]));
        let area = v.layout().image_area;
        let d = v.displayed.as_ref().expect("image displayed");
        assert_eq!(d.bitmap.width(), area.width);
        assert!(d.bitmap.height() <= area.height);
        assert_eq!(v.status(), "Loaded 1 image");

        v.refresh();
        assert_eq!(v.status(), "big.png - 3000x1000 pixels");
    }

    #[test]
    fn resize_is_debounced() {
        let dir = tempdir().expect("failed to create temp dir");
        let img = write_image(dir.path(), "wide.png", 2000, 500);

        let mut v = viewer();
        v.open_selection(Some(vec![img]));
        let before = v.displayed.as_ref().map(|d| d.bitmap.width());

        let t0 = Instant::now();
        v.resize(1400, 900, t0);
        assert!(!v.settle_resize(t0 + Duration::from_millis(10)));
        assert_eq!(v.displayed.as_ref().map(|d| d.bitmap.width()), before);

        assert!(v.settle_resize(t0 + RESIZE_DEBOUNCE));
        assert_eq!(
            v.displayed.as_ref().map(|d| d.bitmap.width()),
            Some(v.layout().image_area.width)
        );
        assert_eq!(v.resize_deadline(), None);
    }

    #[test]
    fn clicks_only_land_on_enabled_buttons() {
        let mut v = viewer();
        let (px, py) = center(v.layout().prev_button);
        v.pointer_pressed(px, py);
        assert_eq!(v.pointer_released(px, py), None);

        let (ox, oy) = center(v.layout().open_button);
        assert!(v.pointer_moved(ox, oy));
        assert_eq!(v.hovered, Some(Button::Open));
        v.pointer_pressed(ox, oy);
        assert_eq!(v.pointer_released(ox, oy), Some(Button::Open));

        // Dragging off the button cancels the click.
        v.pointer_pressed(ox, oy);
        assert_eq!(v.pointer_released(px, py), None);
    }

    #[test]
    fn render_paints_whole_frame() {
        let dir = tempdir().expect("failed to create temp dir");
        let img = write_image(dir.path(), "a.png", 50, 50);

        let mut v = viewer();
        v.open_selection(Some(vec![img]));
        let mut buf = vec![0u32; 1000 * 700];
        let mut canvas = Canvas::new(&mut buf, 1000, 700);
        v.render(&mut canvas);

        let area = v.layout().image_area;
        let cx = area.x + area.width / 2;
        let cy = area.y + area.height / 2;
        assert_eq!(canvas.pixel(cx, cy), 0x000080ff);
        assert_eq!(canvas.pixel(0, 0), crate::ui::render::rgb(BG_COLOR));
    }

    #[test]
    fn render_shows_decode_error_detail() {
        let dir = tempdir().expect("failed to create temp dir");
        let bad = dir.path().join("bad.png");
        fs::write(&bad, b"garbage").expect("failed to write test file");

        let mut v = viewer();
        v.open_selection(Some(vec![bad]));
        let mut buf = vec![0u32; 1000 * 700];
        let mut canvas = Canvas::new(&mut buf, 1000, 700);
        v.render(&mut canvas);

        // The detail line sits one text line below the placeholder heading.
        let panel = v.layout().image_panel;
        let line = text_height(TEXT_SCALE) + PADDING;
        let top = panel.y + line + (panel.height - line - text_height(1)) / 2;
        let ink = crate::ui::render::rgb(PLACEHOLDER_COLOR);
        let has_ink = (top..top + text_height(1))
            .any(|y| (panel.x..panel.right()).any(|x| canvas.pixel(x, y) == ink));
        assert!(has_ink, "no error detail drawn");
    }
}

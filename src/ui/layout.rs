use crate::config::{
    BUTTON_WIDTH, IMAGE_INSET, NAV_BAR_HEIGHT, NAV_BUTTON_HEIGHT, OPEN_BUTTON_HEIGHT, PADDING,
    PANEL_BORDER, STATUS_BAR_HEIGHT, TOOLBAR_HEIGHT,
};
use crate::scale::ViewportSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Build from a possibly negative origin, cutting off the part left of or
    /// above zero. `None` if nothing remains.
    pub fn from_signed(x: i32, y: i32, width: u32, height: u32) -> Option<Self> {
        let cut_x = (-x).max(0) as u32;
        let cut_y = (-y).max(0) as u32;
        if cut_x >= width || cut_y >= height {
            return None;
        }
        Some(Self::new(
            x.max(0) as u32,
            y.max(0) as u32,
            width - cut_x,
            height - cut_y,
        ))
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x as f64 && py >= self.y as f64 && px < self.right() as f64 && py < self.bottom() as f64
    }

    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        (x1 > x0 && y1 > y0).then(|| Rect::new(x0, y0, x1 - x0, y1 - y0))
    }

    pub fn inset(&self, by: u32) -> Rect {
        let w = self.width.saturating_sub(by * 2);
        let h = self.height.saturating_sub(by * 2);
        Rect::new(self.x + by.min(self.width / 2), self.y + by.min(self.height / 2), w, h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Open,
    Previous,
    Next,
}

/// Widget geometry for one window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub toolbar: Rect,
    pub open_button: Rect,
    pub info_label: Rect,
    pub image_panel: Rect,
    pub image_area: Rect,
    pub nav_bar: Rect,
    pub prev_button: Rect,
    pub counter: Rect,
    pub next_button: Rect,
    pub status_bar: Rect,
}

impl Layout {
    pub fn compute(win_w: u32, win_h: u32) -> Self {
        let inner_w = win_w.saturating_sub(PADDING * 2);

        let toolbar = Rect::new(PADDING, PADDING, inner_w, TOOLBAR_HEIGHT);
        let open_button = Rect::new(
            toolbar.x,
            toolbar.y + TOOLBAR_HEIGHT.saturating_sub(OPEN_BUTTON_HEIGHT) / 2,
            BUTTON_WIDTH.min(inner_w),
            OPEN_BUTTON_HEIGHT,
        );
        let info_x = open_button.right() + PADDING;
        let info_label = Rect::new(
            info_x,
            toolbar.y,
            toolbar.right().saturating_sub(info_x),
            TOOLBAR_HEIGHT,
        );

        let status_bar = Rect::new(
            0,
            win_h.saturating_sub(STATUS_BAR_HEIGHT),
            win_w,
            STATUS_BAR_HEIGHT.min(win_h),
        );

        let nav_y = status_bar.y.saturating_sub(PADDING + NAV_BAR_HEIGHT);
        let nav_bar = Rect::new(PADDING, nav_y, inner_w, NAV_BAR_HEIGHT);
        let button_y = nav_y + NAV_BAR_HEIGHT.saturating_sub(NAV_BUTTON_HEIGHT) / 2;
        let button_w = BUTTON_WIDTH.min(inner_w / 2);
        let prev_button = Rect::new(nav_bar.x, button_y, button_w, NAV_BUTTON_HEIGHT);
        let next_button = Rect::new(
            nav_bar.right().saturating_sub(button_w),
            button_y,
            button_w,
            NAV_BUTTON_HEIGHT,
        );
        let counter_x = prev_button.right() + PADDING;
        let counter = Rect::new(
            counter_x,
            nav_y,
            next_button.x.saturating_sub(PADDING).saturating_sub(counter_x),
            NAV_BAR_HEIGHT,
        );

        let panel_y = toolbar.bottom() + PADDING;
        let image_panel = Rect::new(
            PADDING,
            panel_y,
            inner_w,
            nav_y.saturating_sub(PADDING).saturating_sub(panel_y),
        );
        let image_area = image_panel.inset(PANEL_BORDER + IMAGE_INSET);

        Self {
            toolbar,
            open_button,
            info_label,
            image_panel,
            image_area,
            nav_bar,
            prev_button,
            counter,
            next_button,
            status_bar,
        }
    }

    pub fn viewport(&self) -> ViewportSize {
        ViewportSize::new(self.image_area.width, self.image_area.height)
    }

    pub fn button_at(&self, x: f64, y: f64) -> Option<Button> {
        [
            (Button::Open, self.open_button),
            (Button::Previous, self.prev_button),
            (Button::Next, self.next_button),
        ]
        .into_iter()
        .find(|(_, r)| r.contains(x, y))
        .map(|(b, _)| b)
    }
}

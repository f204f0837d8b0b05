pub const HEADER_ID: &str = "header";
pub const HEADER_SCROLLED_CLASS: &str = "scroll-header";
pub const SCROLL_TOP_ID: &str = "scrollToTop";
pub const SCROLL_TOP_VISIBLE_CLASS: &str = "show";

pub const SCROLL_DEBOUNCE_MS: u32 = 10;
pub const HEADER_SCROLLED_MIN_Y: f64 = 50.0;
pub const SCROLL_TOP_MIN_Y: f64 = 300.0;
pub const SCROLL_TOP_IDLE_HIDE_MS: u32 = 3_000;

pub fn header_is_scrolled(scroll_y: f64) -> bool {
    scroll_y >= HEADER_SCROLLED_MIN_Y
}

pub fn scroll_top_qualifies(scroll_y: f64) -> bool {
    scroll_y > SCROLL_TOP_MIN_Y
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollTopAction {
    /// Show the button and (re)start the idle hide timer.
    ShowAndRearm,
    /// Hide the button and drop any pending hide timer.
    HideNow,
}

/// Visibility of the scroll-to-top button; the hide timer itself lives with
/// the DOM widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollTopState {
    visible: bool,
}

impl ScrollTopState {
    pub fn is_visible(self) -> bool {
        self.visible
    }

    pub fn on_scroll(&mut self, scroll_y: f64) -> ScrollTopAction {
        if scroll_top_qualifies(scroll_y) {
            self.visible = true;
            ScrollTopAction::ShowAndRearm
        } else {
            self.visible = false;
            ScrollTopAction::HideNow
        }
    }

    pub fn on_idle_timeout(&mut self) {
        self.visible = false;
    }
}

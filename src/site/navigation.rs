pub const NAV_MENU_ID: &str = "nav-menu";
pub const NAV_TOGGLE_ID: &str = "nav-toggle";
pub const NAV_CLOSE_ID: &str = "nav-close";
pub const NAV_LINK_SELECTOR: &str = ".nav__link";
pub const SECTION_SELECTOR: &str = "section[id]";
pub const MENU_OPEN_CLASS: &str = "show-menu";
pub const ACTIVE_LINK_CLASS: &str = "active-link";
pub const IN_PAGE_ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

/// Sections become current this many pixels before their top edge.
pub const SECTION_ACTIVATION_OFFSET: f64 = 100.0;
pub const FIRST_LINK_FOCUS_DELAY_MS: u32 = 100;

#[derive(Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    pub fn contains(&self, scroll_y: f64) -> bool {
        let start = self.top - SECTION_ACTIVATION_OFFSET;
        scroll_y >= start && scroll_y < start + self.height
    }
}

/// Index of the section whose activation range holds `scroll_y`.
///
/// Ranges may overlap when sections are nested or mis-measured; the last match
/// in document order wins.
pub fn active_section(sections: &[SectionBounds], scroll_y: f64) -> Option<usize> {
    sections
        .iter()
        .enumerate()
        .filter(|(_, section)| section.contains(scroll_y))
        .map(|(index, _)| index)
        .last()
}

pub fn nav_link_selector(section_id: &str) -> String {
    format!(".nav__menu a[href*=\"{section_id}\"]")
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavMenuState {
    open: bool,
}

impl NavMenuState {
    /// Flips the menu and reports whether it is now open.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Closes the menu and reports whether it was open before.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }
}

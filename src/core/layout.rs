use crate::core::constants::NARROW_WIDTH_THRESHOLD;

/// Tracks whether the terminal is narrow enough to hide the sidebar behind
/// the hamburger menu, and whether that menu is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResponsiveLayout {
    narrow: bool,
    menu_open: bool,
}

impl ResponsiveLayout {
    pub fn new(width: u16) -> Self {
        Self {
            narrow: width < NARROW_WIDTH_THRESHOLD,
            menu_open: false,
        }
    }

    /// Feed the current width. Returns true when the narrow/wide mode
    /// changed. Becoming narrow closes the menu.
    pub fn observe_width(&mut self, width: u16) -> bool {
        let narrow = width < NARROW_WIDTH_THRESHOLD;
        if narrow == self.narrow {
            return false;
        }
        self.narrow = narrow;
        if narrow {
            self.menu_open = false;
        }
        true
    }

    pub fn is_narrow(&self) -> bool {
        self.narrow
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn set_menu_open(&mut self, open: bool) {
        self.menu_open = open;
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    /// The sidebar is always visible on wide terminals and only while the
    /// menu is open on narrow ones.
    pub fn sidebar_visible(&self) -> bool {
        !self.narrow || self.menu_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_into_narrow_closes_menu() {
        let mut layout = ResponsiveLayout::new(120);
        assert!(!layout.is_narrow());
        layout.set_menu_open(true);

        assert!(layout.observe_width(NARROW_WIDTH_THRESHOLD - 1));
        assert!(layout.is_narrow());
        assert!(!layout.menu_open());
        assert!(!layout.sidebar_visible());
    }

    #[test]
    fn resizing_within_a_mode_reports_no_change() {
        let mut layout = ResponsiveLayout::new(40);
        layout.toggle_menu();
        assert!(!layout.observe_width(60));
        assert!(layout.menu_open());
        assert!(layout.sidebar_visible());

        assert!(layout.observe_width(NARROW_WIDTH_THRESHOLD));
        assert!(!layout.is_narrow());
        assert!(layout.sidebar_visible());
    }
}

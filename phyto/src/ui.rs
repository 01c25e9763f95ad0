//! View-model state for the page chrome: the collapsible navigation menu
//! and the scientist modal. The web layer mirrors these into DOM attributes.

pub const NAV_OPEN_CLASS: &str = "open";
pub const MODAL_BACKDROP_CLASS: &str = "modal-backdrop";
pub const MODAL_CLOSE_ATTR: &str = "data-close";
pub const MODAL_CLOSE_VALUE: &str = "modal";
pub const ESCAPE_KEY: &str = "Escape";

/// Whether a `document.readyState` value means `DOMContentLoaded` is still
/// to come.
pub fn is_loading(ready_state: &str) -> bool {
    ready_state == "loading"
}

fn bool_attr(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    /// Start from the toggle button's current `aria-expanded` value.
    pub fn from_aria_expanded(value: Option<&str>) -> Self {
        Self {
            open: value == Some("true"),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// A navigation link was followed.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn aria_expanded(&self) -> &'static str {
        bool_attr(self.open)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modal {
    open: bool,
}

impl Modal {
    /// Start from the dialog's current `aria-hidden` value; only an explicit
    /// `"false"` counts as shown.
    pub fn from_aria_hidden(value: Option<&str>) -> Self {
        Self {
            open: value == Some("false"),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn aria_hidden(&self) -> &'static str {
        bool_attr(!self.open)
    }

    /// Inline `overflow` for `<body>`; empty restores the stylesheet value.
    pub fn body_overflow(&self) -> &'static str {
        if self.open {
            "hidden"
        } else {
            ""
        }
    }

    /// Handle a key press; returns whether the state changed.
    pub fn on_key(&mut self, key: &str) -> bool {
        if key == ESCAPE_KEY {
            let was_open = self.open;
            self.close();
            return was_open;
        }
        false
    }
}

/// Whether a click on an element with the given `data-close` attribute and
/// `class` list dismisses the modal.
pub fn closes_modal(data_close: Option<&str>, class_name: &str) -> bool {
    data_close == Some(MODAL_CLOSE_VALUE)
        || class_name
            .split_ascii_whitespace()
            .any(|class| class == MODAL_BACKDROP_CLASS)
}

/// Selector for an in-page anchor `href`; `#` alone does not scroll.
pub fn anchor_target(href: &str) -> Option<&str> {
    if href.starts_with('#') && href.len() > 1 {
        Some(href)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_toggle_flips_each_click() {
        let mut nav = NavMenu::from_aria_expanded(Some("false"));
        assert_eq!(nav.aria_expanded(), "false");
        nav.toggle();
        assert!(nav.is_open());
        assert_eq!(nav.aria_expanded(), "true");
        nav.toggle();
        assert_eq!(nav.aria_expanded(), "false");
    }

    #[test]
    fn nav_link_closes_menu() {
        let mut nav = NavMenu::from_aria_expanded(Some("true"));
        assert!(nav.is_open());
        nav.close();
        assert!(!nav.is_open());
        assert_eq!(nav.aria_expanded(), "false");
        nav.close();
        assert_eq!(nav.aria_expanded(), "false");
    }

    #[test]
    fn missing_aria_attribute_means_closed() {
        assert!(!NavMenu::from_aria_expanded(None).is_open());
        assert!(!NavMenu::from_aria_expanded(Some("yes")).is_open());
    }

    #[test]
    fn modal_open_locks_scroll() {
        let mut modal = Modal::default();
        assert_eq!(modal.aria_hidden(), "true");
        modal.open();
        assert_eq!(modal.aria_hidden(), "false");
        assert_eq!(modal.body_overflow(), "hidden");
        modal.close();
        assert_eq!(modal.aria_hidden(), "true");
        assert_eq!(modal.body_overflow(), "");
    }

    #[test]
    fn escape_closes_modal() {
        let mut modal = Modal::default();
        modal.open();
        assert!(!modal.on_key("Enter"));
        assert!(modal.is_open());
        assert!(modal.on_key("Escape"));
        assert!(!modal.is_open());
        assert!(!modal.on_key("Escape"));
    }

    #[test]
    fn modal_shown_by_markup_still_closes() {
        let mut modal = Modal::from_aria_hidden(Some("false"));
        assert!(modal.is_open());
        assert!(modal.on_key("Escape"));
        assert_eq!(modal.aria_hidden(), "true");
        assert_eq!(modal.body_overflow(), "");

        assert!(!Modal::from_aria_hidden(Some("true")).is_open());
        assert!(!Modal::from_aria_hidden(None).is_open());
    }

    #[test]
    fn backdrop_and_close_buttons_dismiss() {
        assert!(closes_modal(Some("modal"), ""));
        assert!(closes_modal(None, "modal-backdrop"));
        assert!(closes_modal(None, "fade modal-backdrop show"));
        assert!(!closes_modal(None, "modal-backdrop-inner"));
        assert!(!closes_modal(Some("dialog"), "modal-content"));
    }

    #[test]
    fn only_loading_state_waits_for_dom() {
        assert!(is_loading("loading"));
        assert!(!is_loading("interactive"));
        assert!(!is_loading("complete"));
    }

    #[test]
    fn anchor_targets() {
        assert_eq!(anchor_target("#calculator"), Some("#calculator"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("/about#team"), None);
    }
}

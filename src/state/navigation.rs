//! Navigation-related state types.
//!
//! This module contains the top-level screens, the bottom tabs and the view
//! state of the main screen.

use std::fmt;

/// Specifying the different top-level screens.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Screen {
    Splash,
    Login,
    SignUp,
    Main,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Splash => "splash",
            Screen::Login => "login",
            Screen::SignUp => "sign-up",
            Screen::Main => "main",
        };
        write!(f, "{}", name)
    }
}

/// Specifying the bottom tabs of the main screen.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Tab {
    Home,
    Files,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Home, Tab::Files, Tab::Profile];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Files => "My files",
            Tab::Profile => "Profile",
        }
    }
}

/// View state of the main screen. A sector, when set, replaces the tab body;
/// a service can only be open inside the active sector.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MainView {
    pub active_tab: Tab,
    pub active_sector: Option<String>,
    pub active_service: Option<String>,
}

impl Default for MainView {
    fn default() -> Self {
        MainView {
            active_tab: Tab::Home,
            active_sector: None,
            active_service: None,
        }
    }
}

impl MainView {
    /// Switch tabs, dropping any sector detail.
    ///
    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.active_sector = None;
        self.active_service = None;
    }

    /// Show a sector in place of the home tab body, whichever tab was active.
    ///
    pub fn open_sector(&mut self, sector_id: &str) {
        self.active_tab = Tab::Home;
        self.active_sector = Some(sector_id.to_string());
        self.active_service = None;
    }

    pub fn open_service(&mut self, service_id: &str) {
        self.active_service = Some(service_id.to_string());
    }

    /// Pop one level of detail. Returns false when already on a tab body.
    ///
    pub fn back(&mut self) -> bool {
        if self.active_service.take().is_some() {
            return true;
        }
        self.active_sector.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_main_view() {
        let view = MainView::default();
        assert_eq!(view.active_tab, Tab::Home);
        assert_eq!(view.active_sector, None);
        assert_eq!(view.active_service, None);
    }

    #[test]
    fn test_select_tab_clears_sector_and_service() {
        let mut view = MainView::default();
        view.open_sector("justice");
        view.open_service("court_filing");
        view.select_tab(Tab::Files);
        assert_eq!(view.active_tab, Tab::Files);
        assert_eq!(view.active_sector, None);
        assert_eq!(view.active_service, None);
    }

    #[test]
    fn test_open_sector_drops_previous_service() {
        let mut view = MainView::default();
        view.open_sector("justice");
        view.open_service("court_filing");
        view.open_sector("health");
        assert_eq!(view.active_sector.as_deref(), Some("health"));
        assert_eq!(view.active_service, None);
    }

    #[test]
    fn test_open_sector_returns_to_home_tab() {
        for tab in [Tab::Files, Tab::Profile] {
            let mut view = MainView::default();
            view.select_tab(tab);
            view.open_sector("interior");
            assert_eq!(view.active_tab, Tab::Home);
            assert_eq!(view.active_sector.as_deref(), Some("interior"));
        }
    }

    #[test]
    fn test_back_pops_one_level() {
        let mut view = MainView::default();
        view.open_sector("health");
        view.open_service("health_card");
        assert!(view.back());
        assert_eq!(view.active_sector.as_deref(), Some("health"));
        assert!(view.back());
        assert_eq!(view.active_sector, None);
        assert!(!view.back());
    }

    #[test]
    fn test_screen_display() {
        assert_eq!(Screen::SignUp.to_string(), "sign-up");
        assert_eq!(Screen::Main.to_string(), "main");
    }
}

use super::login::{login, sign_up};
use super::splash::splash;
use super::{footer, log, main, Frame, Theme};
use citizen_portal::state::{Screen, State};
use ratatui::layout::{Constraint, Direction, Layout};

const LOG_PANEL_HEIGHT: u16 = 10;

/// Render all widgets according to state.
///
pub fn all(frame: &mut Frame, state: &State, theme: &Theme) {
    let mut constraints = vec![Constraint::Min(0), Constraint::Length(1)];
    if state.is_log_visible() {
        constraints.insert(1, Constraint::Length(LOG_PANEL_HEIGHT));
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.size());

    match state.screen() {
        Screen::Splash => splash(frame, rows[0], state, theme),
        Screen::Login => login(frame, rows[0], theme),
        Screen::SignUp => sign_up(frame, rows[0], state, theme),
        Screen::Main => main(frame, rows[0], state, theme),
    }
    if state.is_log_visible() {
        log(frame, rows[1], state, theme);
    }
    footer(frame, rows[rows.len() - 1], state, theme);
}

#[cfg(test)]
mod tests {
    use super::*;
    use citizen_portal::state::{OverlayKind, Tab};
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(state: &State) -> String {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| all(frame, state, &theme)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_each_screen() {
        let mut state = State::default();
        state.start().unwrap();
        assert!(rendered(&state).contains("Loading services"));

        state.complete_splash().unwrap();
        assert!(rendered(&state).contains("create an account"));

        state.request_sign_up().unwrap();
        assert!(rendered(&state).contains("Public officer"));

        state.complete_sign_up("lawyer").unwrap();
        let screen = rendered(&state);
        assert!(screen.contains("Citizen Portal"));
        assert!(screen.contains("recommended for Lawyer"));
    }

    #[test]
    fn test_renders_overlays_and_tabs() {
        let mut state = State::default();
        state.start().unwrap();
        state.complete_splash().unwrap();
        state.login().unwrap();

        state.open_kind(OverlayKind::Settings).unwrap();
        state.request_logout().unwrap();
        assert!(rendered(&state).contains("Log out of the portal?"));
        state.close(OverlayKind::Settings);

        state.select_tab(Tab::Files).unwrap();
        assert!(rendered(&state).contains("No documents downloaded yet."));

        state.toggle_log();
        state.add_log_entry("12:00:00.000 INFO  Logged in".to_string());
        assert!(rendered(&state).contains("Logged in"));
    }

    #[test]
    fn test_renders_search_results() {
        let mut state = State::default();
        state.start().unwrap();
        state.complete_splash().unwrap();
        state.login().unwrap();
        state.enter_search_mode().unwrap();
        state.set_search_query("criminal");
        assert!(rendered(&state).contains("Results for \"criminal\""));
    }

    #[test]
    fn test_service_detail_shows_tracking_only_when_offered() {
        let mut state = State::default();
        state.start().unwrap();
        state.complete_splash().unwrap();
        state.login().unwrap();
        state.open_sector("justice").unwrap();
        state.open_service("court_filing").unwrap();
        assert!(rendered(&state).contains("request status can be followed online"));

        state.back().unwrap();
        state.open_service("criminal_record").unwrap();
        assert!(!rendered(&state).contains("request status can be followed online"));
    }

    #[test]
    fn test_search_result_from_other_tab_replaces_body_with_sector() {
        for tab in [Tab::Files, Tab::Profile] {
            let mut state = State::default();
            state.start().unwrap();
            state.complete_splash().unwrap();
            state.login().unwrap();
            state.select_tab(tab).unwrap();
            state.set_search_query("birth");
            let index = state
                .search_results()
                .iter()
                .position(|result| result.service_id == "birth_certificate")
                .unwrap();
            state.select_result(index).unwrap();

            let screen = rendered(&state);
            assert!(!screen.contains("No documents downloaded yet."));
            assert!(screen.contains("Birth certificate"));
        }
    }
}

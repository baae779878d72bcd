use super::Frame;
use crate::ui::theme::Theme;
use crate::ui::widgets::styling;
use citizen_portal::state::{OverlayKind, Screen, State, Tab};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::Paragraph,
};

/// Return the key hints for what currently receives input.
///
fn hints(state: &State) -> &'static str {
    match state.screen() {
        Screen::Splash => " q: quit",
        Screen::Login => " Enter: log in, s: sign up, q: quit",
        Screen::SignUp => " j/k: choose role, Enter: confirm, Esc: back",
        Screen::Main if state.is_search_mode() => {
            " Type to search, Up/Down: navigate, Enter: open, Esc: exit search"
        }
        Screen::Main => match state.overlays().top().map(|entry| entry.overlay.kind()) {
            Some(OverlayKind::LocationSearch) => " Type to filter, Esc: close",
            Some(OverlayKind::BiometricTracking) => {
                " Type the request number, Enter: look up, Esc: close"
            }
            Some(OverlayKind::Notifications) | Some(OverlayKind::DocumentTemplates) => {
                " j/k: navigate, Enter: open, Esc: close"
            }
            Some(OverlayKind::LegalConsultationPayment) => {
                " j/k: choose method, Enter: pay, Esc: close"
            }
            Some(OverlayKind::LogoutConfirm) => " y: log out, n: cancel",
            Some(_) => " Esc: close",
            None => match state.active_tab() {
                Tab::Home => {
                    " j/k: navigate, Enter: open, Esc: back, /: search, n: notifications, o: offices, t: templates, c/a: consult, p/i: track, s: settings, q: quit"
                }
                Tab::Files => " j/k: navigate, Enter: view, Tab: next tab, q: quit",
                Tab::Profile => " s: settings, x: log out, Tab: next tab, q: quit",
            },
        },
    }
}

/// Render footer widget.
///
pub fn footer(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(40)])
        .split(size);

    frame.render_widget(
        Paragraph::new(Line::styled(hints(state), styling::muted_text_style(theme))),
        columns[0],
    );

    if let Some(message) = state.status_message() {
        let status = Paragraph::new(Line::styled(
            format!("{} ", message),
            styling::warning_text_style(theme),
        ))
        .alignment(Alignment::Right);
        frame.render_widget(status, columns[1]);
    }
}

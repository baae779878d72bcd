use super::Frame;
use crate::ui::theme::Theme;
use crate::ui::widgets::{spinner, styling};
use citizen_portal::state::State;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

pub const BANNER: &str = r"
  ___ _ _   _                 ___         _        _
 / __(_) |_(_)_______ _ _    | _ \___ _ _| |_ __ _| |
| (__| |  _| |_ / -_) ' \   |  _/ _ \ '_|  _/ _` | |
 \___|_|\__|_/__\___|_||_|  |_| \___/_|  \__\__,_|_|
";

/// Render the splash screen shown while the session is checked.
///
pub fn splash(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style(theme));
    frame.render_widget(block, size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(6),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .margin(1)
        .split(size);

    let banner = Paragraph::new(BANNER)
        .style(styling::banner_style(theme))
        .alignment(Alignment::Center);
    frame.render_widget(banner, rows[1]);

    let message = if state.session().can_restore() {
        "Restoring your session"
    } else {
        "Loading services"
    };
    let status = Line::styled(
        format!("{} {}", spinner::frame(), message),
        styling::muted_text_style(theme),
    );
    frame.render_widget(Paragraph::new(status).alignment(Alignment::Center), rows[2]);
}

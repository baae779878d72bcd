use super::files::files;
use super::home::home;
use super::overlays::overlays;
use super::profile::profile;
use super::search::search_results;
use super::Frame;
use crate::ui::theme::Theme;
use crate::ui::widgets::styling;
use citizen_portal::state::{State, Tab};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

/// Render main screen according to state.
///
pub fn main(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(size);

    header(frame, rows[0], state, theme);
    tabs(frame, rows[1], state, theme);
    if state.is_results_panel_visible() {
        search_results(frame, rows[2], state, theme);
    } else {
        match state.active_tab() {
            Tab::Home => home(frame, rows[2], state, theme),
            Tab::Files => files(frame, rows[2], state, theme),
            Tab::Profile => profile(frame, rows[2], state, theme),
        }
    }

    // Overlays draw over the whole main screen
    overlays(frame, size, state, theme);
}

fn header(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(size);

    let (border_style, search_text) = if state.is_search_mode() {
        (
            styling::active_block_border_style(theme),
            Line::styled(
                format!("{}█", state.search_query()),
                styling::normal_text_style(theme),
            ),
        )
    } else {
        (
            styling::normal_block_border_style(theme),
            Line::styled(
                "Press / to search services",
                styling::muted_text_style(theme),
            ),
        )
    };
    let search = Paragraph::new(search_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Citizen Portal")
            .border_style(border_style),
    );
    frame.render_widget(search, columns[0]);

    let role = state
        .current_role()
        .map(|role| role.info().title)
        .unwrap_or("Guest");
    let unread = state.unread_notification_count();
    let unread_style = if unread > 0 {
        styling::warning_text_style(theme)
    } else {
        styling::muted_text_style(theme)
    };
    let badge = Line::from(vec![
        Span::styled(role, styling::normal_text_style(theme)),
        Span::raw("  "),
        Span::styled(format!("{} unread", unread), unread_style),
    ]);
    let account = Paragraph::new(badge).alignment(Alignment::Right).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styling::normal_block_border_style(theme)),
    );
    frame.render_widget(account, columns[1]);
}

fn tabs(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();
    let selected = Tab::ALL
        .iter()
        .position(|tab| *tab == state.active_tab())
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(styling::muted_text_style(theme))
        .highlight_style(styling::active_block_title_style(theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::normal_block_border_style(theme)),
        );
    frame.render_widget(tabs, size);
}

use super::splash::BANNER;
use super::Frame;
use crate::ui::theme::Theme;
use crate::ui::widgets::styling;
use citizen_portal::roles::registry;
use citizen_portal::state::State;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

pub const LOGIN_CONTENT: &str = "
Access administrative procedures, track your biometric documents and
download official forms from one place.
";

/// Render the login screen.
///
pub fn login(frame: &mut Frame, size: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled("Log in", styling::active_block_title_style(theme)))
        .border_style(styling::active_block_border_style(theme));
    frame.render_widget(block, size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(size);

    let banner = Paragraph::new(BANNER)
        .style(styling::banner_style(theme))
        .alignment(Alignment::Center);
    frame.render_widget(banner, rows[0]);

    let content = Paragraph::new(LOGIN_CONTENT)
        .style(styling::normal_text_style(theme))
        .alignment(Alignment::Center);
    frame.render_widget(content, rows[1]);

    let actions = vec![
        Line::styled("Enter  log in", styling::normal_text_style(theme)),
        Line::styled("s      create an account", styling::normal_text_style(theme)),
    ];
    frame.render_widget(Paragraph::new(actions).alignment(Alignment::Center), rows[2]);
}

/// Render the role picker shown during sign-up.
///
pub fn sign_up(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            "Create an account: who are you?",
            styling::active_block_title_style(theme),
        ))
        .border_style(styling::active_block_border_style(theme));

    let items: Vec<ListItem> = registry()
        .iter()
        .map(|info| {
            ListItem::new(vec![
                Line::styled(info.title, styling::normal_text_style(theme)),
                Line::styled(
                    format!("  {}", info.description),
                    styling::muted_text_style(theme),
                ),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(styling::selected_list_item_style(theme))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(state.cursor()));
    frame.render_stateful_widget(list, size, &mut list_state);
}

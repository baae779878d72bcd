use super::Frame;
use crate::ui::theme::Theme;
use crate::ui::widgets::styling;
use citizen_portal::state::State;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Render the profile tab.
///
pub fn profile(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    let label = styling::active_block_title_style(theme);
    let text = styling::normal_text_style(theme);
    let muted = styling::muted_text_style(theme);

    let mut lines = match state.current_role() {
        Some(role) => vec![
            Line::from(vec![
                Span::styled("Account type: ", label),
                Span::styled(role.info().title, text),
            ]),
            Line::styled(role.info().description, muted),
        ],
        None => vec![Line::styled("No account type on record.", muted)],
    };

    let featured_sectors = state.featured_sectors();
    let featured: Vec<&str> = featured_sectors
        .iter()
        .map(|sector| sector.title.as_str())
        .collect();
    if !featured.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Recommended sectors: ", label),
            Span::styled(featured.join(", "), text),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Downloaded documents: ", label),
        Span::styled(state.downloads().len().to_string(), text),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::styled("s: settings   x: log out", muted));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Profile")
            .border_style(styling::active_block_border_style(theme)),
    );
    frame.render_widget(paragraph, size);
}

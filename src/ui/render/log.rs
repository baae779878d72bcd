use super::Frame;
use crate::ui::theme::Theme;
use crate::ui::widgets::styling;
use citizen_portal::state::State;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

/// Render log widget according to state. The newest entries fill the panel.
///
pub fn log(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    let block = Block::default()
        .title("Log (L: hide)")
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(theme));

    let visible = size.height.saturating_sub(2) as usize;
    let entries = state.log_entries();
    let start = entries.len().saturating_sub(visible);
    let items: Vec<ListItem> = entries[start..]
        .iter()
        .map(|entry| {
            let style = if entry.contains(" ERROR ") {
                styling::error_text_style(theme)
            } else if entry.contains(" WARN ") {
                styling::warning_text_style(theme)
            } else {
                styling::muted_text_style(theme)
            };
            ListItem::new(Line::from(vec![Span::styled(entry.clone(), style)]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), size);
}

use super::{text_line, Frame};
use crate::ui::theme::Theme;
use crate::ui::widgets::styling;
use citizen_portal::state::State;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

/// Render the search results panel.
///
pub fn search_results(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    let results = state.search_results();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!("Results for \"{}\" ({})", state.search_query().trim(), results.len()),
            styling::active_block_title_style(theme),
        ))
        .border_style(styling::active_block_border_style(theme));

    if results.is_empty() {
        let empty = Paragraph::new(Line::styled(
            "No service matches your search.",
            styling::muted_text_style(theme),
        ))
        .block(block);
        frame.render_widget(empty, size);
        return;
    }

    let items: Vec<ListItem> = results
        .iter()
        .map(|result| {
            ListItem::new(vec![
                text_line(result.name.clone(), styling::normal_text_style(theme)),
                Line::styled(
                    format!(
                        "  {} | {} | {}",
                        result.sector_title, result.location, result.deadline
                    ),
                    styling::muted_text_style(theme),
                ),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(styling::selected_list_item_style(theme));
    let mut list_state = ListState::default();
    if state.is_search_mode() {
        list_state.select(Some(state.cursor()));
    }
    frame.render_stateful_widget(list, size, &mut list_state);
}

use super::{text_line, Frame};
use crate::ui::theme::Theme;
use crate::ui::widgets::{spinner, styling};
use citizen_portal::state::State;
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

/// Render the files tab listing downloaded documents.
///
pub fn files(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("My documents")
        .border_style(styling::active_block_border_style(theme));

    if state.downloads().is_empty() && state.pending_downloads().is_empty() {
        let empty = Paragraph::new(vec![
            Line::styled(
                "No documents downloaded yet.",
                styling::normal_text_style(theme),
            ),
            Line::styled(
                "Press t to browse document templates.",
                styling::muted_text_style(theme),
            ),
        ])
        .block(block);
        frame.render_widget(empty, size);
        return;
    }

    let mut items: Vec<ListItem> = state
        .downloads()
        .iter()
        .map(|document| {
            ListItem::new(vec![
                text_line(document.title.clone(), styling::normal_text_style(theme)),
                Line::styled(
                    format!(
                        "  downloaded {}",
                        document.downloaded_at.format("%Y-%m-%d %H:%M")
                    ),
                    styling::muted_text_style(theme),
                ),
            ])
        })
        .collect();
    items.extend(state.pending_downloads().iter().map(|pending| {
        let title = state
            .catalog()
            .service(&pending.service_id)
            .map(|(_, service)| service.name.clone())
            .unwrap_or_else(|| pending.service_id.clone());
        ListItem::new(Line::styled(
            format!("{} {}", spinner::frame(), title),
            styling::success_text_style(theme),
        ))
    }));

    let list = List::new(items)
        .block(block)
        .highlight_style(styling::selected_list_item_style(theme));
    let mut list_state = ListState::default().with_selected(Some(state.cursor()));
    frame.render_stateful_widget(list, size, &mut list_state);
}

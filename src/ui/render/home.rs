use super::{text_line, Frame};
use crate::ui::theme::Theme;
use crate::ui::widgets::{spinner, styling};
use citizen_portal::catalog::{Sector, Service};
use citizen_portal::state::{BiometricKind, ServiceRef, State};
use citizen_portal::utils::text_processing::truncate;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

const DESCRIPTION_WIDTH: usize = 70;

/// Render the home tab: the sector grid, a sector's services or a service
/// detail depending on how deep the user navigated.
///
pub fn home(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    match (state.active_sector(), state.active_service()) {
        (None, _) => sectors(frame, size, state, theme),
        (Some(sector), None) => services(frame, size, sector, state, theme),
        (Some(sector), Some(service)) => service_detail(frame, size, sector, service, state, theme),
    }
}

fn list_block<'a>(title: String, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, styling::active_block_title_style(theme)))
        .border_style(styling::active_block_border_style(theme))
}

fn sectors(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    let featured_sectors = state.featured_sectors();
    let featured: Vec<&str> = featured_sectors
        .iter()
        .map(|sector| sector.id.as_str())
        .collect();
    let title = match state.current_role() {
        Some(role) if !featured.is_empty() => {
            format!("Sectors (* recommended for {})", role.info().title)
        }
        _ => "Sectors".to_string(),
    };

    let items: Vec<ListItem> = state
        .catalog()
        .sectors
        .iter()
        .map(|sector| {
            let marker = if featured.contains(&sector.id.as_str()) {
                "* "
            } else {
                "  "
            };
            ListItem::new(vec![
                text_line(
                    format!("{}{}", marker, sector.title),
                    styling::normal_text_style(theme),
                ),
                text_line(
                    format!("  {}", truncate(&sector.description, DESCRIPTION_WIDTH)),
                    styling::muted_text_style(theme),
                ),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(list_block(title, theme))
        .highlight_style(styling::selected_list_item_style(theme));
    let mut list_state = ListState::default().with_selected(Some(state.cursor()));
    frame.render_stateful_widget(list, size, &mut list_state);
}

fn services(frame: &mut Frame, size: Rect, sector: &Sector, state: &State, theme: &Theme) {
    let items: Vec<ListItem> = sector
        .services
        .iter()
        .map(|service| {
            ListItem::new(vec![
                text_line(service.name.clone(), styling::normal_text_style(theme)),
                text_line(
                    format!("  {}", truncate(&service.description, DESCRIPTION_WIDTH)),
                    styling::muted_text_style(theme),
                ),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(list_block(sector.title.clone(), theme))
        .highlight_style(styling::selected_list_item_style(theme));
    let mut list_state = ListState::default().with_selected(Some(state.cursor()));
    frame.render_stateful_widget(list, size, &mut list_state);
}

fn service_detail(
    frame: &mut Frame,
    size: Rect,
    sector: &Sector,
    service: &Service,
    state: &State,
    theme: &Theme,
) {
    let label = styling::active_block_title_style(theme);
    let text = styling::normal_text_style(theme);
    let muted = styling::muted_text_style(theme);

    let mut lines = vec![
        text_line(service.description.clone(), text),
        Line::from(""),
        Line::from(vec![
            Span::styled("Where: ", label),
            Span::styled(service.location.clone(), text),
        ]),
        Line::from(vec![
            Span::styled("Processing time: ", label),
            Span::styled(service.deadline.clone(), text),
        ]),
    ];

    if !service.requirements.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::styled("Required documents", label));
        for requirement in &service.requirements {
            lines.push(text_line(format!("  - {}", requirement), text));
        }
    }

    if service.is_paid {
        let methods: Vec<&str> = service
            .payment_methods
            .iter()
            .map(|method| method.label())
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Payment: ", label),
            Span::styled(methods.join(", "), text),
        ]));
    }

    if service.has_tracking {
        lines.push(Line::from(vec![
            Span::styled("Tracking: ", label),
            Span::styled("request status can be followed online", text),
        ]));
    }

    lines.push(Line::from(""));
    let pending = state.pending_downloads().contains(&ServiceRef {
        service_id: service.id.clone(),
        sector_id: sector.id.clone(),
    });
    if pending {
        lines.push(Line::styled(
            format!("{} Downloading form...", spinner::frame()),
            styling::success_text_style(theme),
        ));
    } else if service.has_download {
        lines.push(Line::styled("d: download the form", muted));
    }
    if BiometricKind::from_service_id(&service.id).is_some() {
        lines.push(Line::styled("Enter: track your application", muted));
    }
    lines.push(Line::styled("Esc: back to the sector", muted));

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(list_block(format!("{} / {}", sector.title, service.name), theme));
    frame.render_widget(detail, size);
}

use super::{centered_rect, text_line, Frame};
use crate::ui::theme::Theme;
use crate::ui::widgets::{spinner, styling};
use citizen_portal::catalog::PaymentMethod;
use citizen_portal::state::{
    ConsultationKind, Overlay, PaymentForm, PaymentOutcome, ServiceRef, SimulationStatus, State,
    TrackingLookup,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

/// Render every open overlay from bottom to top. Only the top overlay shows
/// the list cursor.
///
pub fn overlays(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    let top = state.overlays().top().map(|entry| entry.overlay.kind());
    for (depth, entry) in state.overlays().iter().enumerate() {
        let is_top = Some(entry.overlay.kind()) == top;
        let area = if depth == 0 {
            centered_rect(64, 60, size)
        } else {
            centered_rect(50, 40, size)
        };
        frame.render_widget(Clear, area);

        let border_style = if is_top {
            styling::active_block_border_style(theme)
        } else {
            styling::normal_block_border_style(theme)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                entry.overlay.kind().title(),
                styling::active_block_title_style(theme),
            ))
            .border_style(border_style);
        let cursor = if is_top { Some(state.cursor()) } else { None };

        match &entry.overlay {
            Overlay::Settings => paragraph(frame, area, block, settings(theme)),
            Overlay::Notifications => notifications(frame, area, block, state, cursor, theme),
            Overlay::LocationSearch { query } => {
                location_search(frame, area, block, query, state, cursor, theme)
            }
            Overlay::DocumentTemplates => templates(frame, area, block, state, cursor, theme),
            Overlay::DocumentViewer(service) => {
                paragraph(frame, area, block, document(service, state, theme))
            }
            Overlay::AdministrativeConsultation => paragraph(
                frame,
                area,
                block,
                intro(
                    "Ask a public officer about an administrative procedure.",
                    "Administrative consultations are free of charge.",
                    "Enter: start the consultation",
                    theme,
                ),
            ),
            Overlay::LegalConsultationBox => paragraph(
                frame,
                area,
                block,
                intro(
                    "Get advice from a registered lawyer.",
                    "A consultation fee applies and is paid before the session starts.",
                    "Enter: continue to payment",
                    theme,
                ),
            ),
            Overlay::LegalConsultationPayment(form) => {
                payment(frame, area, block, form, cursor, theme)
            }
            Overlay::ConsultationInterface(kind) => {
                paragraph(frame, area, block, consultation(*kind, theme))
            }
            Overlay::BiometricTracking(lookup) => {
                paragraph(frame, area, block, tracking(lookup, theme))
            }
            Overlay::LogoutConfirm => paragraph(
                frame,
                area,
                block,
                vec![
                    Line::from(""),
                    Line::styled("Log out of the portal?", styling::warning_text_style(theme)),
                    Line::from(""),
                    Line::styled(
                        "y/Enter: log out   n/Esc: cancel",
                        styling::muted_text_style(theme),
                    ),
                ],
            ),
        }
    }
}

fn paragraph(frame: &mut Frame, area: Rect, block: Block, lines: Vec<Line>) {
    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    frame.render_widget(widget, area);
}

fn list(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    items: Vec<ListItem>,
    cursor: Option<usize>,
    theme: &Theme,
) {
    let widget = List::new(items)
        .block(block)
        .highlight_style(styling::selected_list_item_style(theme));
    let mut list_state = ListState::default();
    list_state.select(cursor);
    frame.render_stateful_widget(widget, area, &mut list_state);
}

fn settings<'a>(theme: &Theme) -> Vec<Line<'a>> {
    vec![
        Line::from(vec![
            Span::styled("Theme: ", styling::active_block_title_style(theme)),
            Span::styled(theme.name.clone(), styling::normal_text_style(theme)),
        ]),
        Line::from(""),
        Line::styled("l: log out", styling::normal_text_style(theme)),
        Line::styled("L: show or hide the log panel", styling::normal_text_style(theme)),
        Line::styled("Esc: close", styling::muted_text_style(theme)),
    ]
}

fn intro<'a>(headline: &'a str, detail: &'a str, action: &'a str, theme: &Theme) -> Vec<Line<'a>> {
    vec![
        Line::styled(headline, styling::normal_text_style(theme)),
        Line::styled(detail, styling::muted_text_style(theme)),
        Line::from(""),
        Line::styled(action, styling::active_block_title_style(theme)),
    ]
}

fn notifications(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    state: &State,
    cursor: Option<usize>,
    theme: &Theme,
) {
    let items: Vec<ListItem> = state
        .notifications()
        .iter()
        .map(|notification| {
            let title_style = if state.is_notification_read(&notification.id) {
                styling::muted_text_style(theme)
            } else {
                styling::active_block_title_style(theme)
            };
            ListItem::new(vec![
                text_line(notification.title.clone(), title_style),
                text_line(
                    format!("  {}", notification.body),
                    styling::normal_text_style(theme),
                ),
            ])
        })
        .collect();
    list(frame, area, block, items, cursor, theme);
}

fn location_search(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    query: &str,
    state: &State,
    cursor: Option<usize>,
    theme: &Theme,
) {
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let input = Paragraph::new(Line::styled(
        format!("{}█", query),
        styling::normal_text_style(theme),
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Type a city or office")
            .border_style(styling::normal_block_border_style(theme)),
    );
    frame.render_widget(input, rows[0]);

    let items: Vec<ListItem> = state
        .location_matches()
        .into_iter()
        .map(|location| {
            ListItem::new(text_line(
                location.to_string(),
                styling::normal_text_style(theme),
            ))
        })
        .collect();
    list(frame, rows[1], Block::default(), items, cursor, theme);
}

fn templates(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    state: &State,
    cursor: Option<usize>,
    theme: &Theme,
) {
    let items: Vec<ListItem> = state
        .catalog()
        .templates()
        .into_iter()
        .map(|(sector, service)| {
            ListItem::new(vec![
                text_line(service.name.clone(), styling::normal_text_style(theme)),
                Line::styled(format!("  {}", sector.title), styling::muted_text_style(theme)),
            ])
        })
        .collect();
    list(frame, area, block, items, cursor, theme);
}

fn document<'a>(service_ref: &ServiceRef, state: &State, theme: &Theme) -> Vec<Line<'a>> {
    let (sector, service) = match state.catalog().service(&service_ref.service_id) {
        Some(found) => found,
        None => {
            return vec![Line::styled(
                "This document is no longer available.",
                styling::error_text_style(theme),
            )]
        }
    };

    let mut lines = vec![
        text_line(service.name.clone(), styling::active_block_title_style(theme)),
        Line::styled(sector.title.clone(), styling::muted_text_style(theme)),
        Line::from(""),
        text_line(service.description.clone(), styling::normal_text_style(theme)),
        Line::from(""),
    ];
    for requirement in &service.requirements {
        lines.push(text_line(
            format!("  - {}", requirement),
            styling::normal_text_style(theme),
        ));
    }
    lines.push(Line::from(""));
    if state.pending_downloads().contains(service_ref) {
        lines.push(Line::styled(
            format!("{} Downloading...", spinner::frame()),
            styling::success_text_style(theme),
        ));
    } else {
        lines.push(Line::styled(
            "d/Enter: download   Esc: close",
            styling::muted_text_style(theme),
        ));
    }
    lines
}

fn payment(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    form: &PaymentForm,
    cursor: Option<usize>,
    theme: &Theme,
) {
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(inner);

    let items: Vec<ListItem> = PaymentMethod::ALL
        .iter()
        .map(|method| {
            let marker = if form.method == Some(*method) { "(x) " } else { "( ) " };
            ListItem::new(Line::styled(
                format!("{}{}", marker, method.label()),
                styling::normal_text_style(theme),
            ))
        })
        .collect();
    list(frame, rows[0], Block::default(), items, cursor, theme);

    let status = match form.status {
        SimulationStatus::Idle => Line::styled(
            "Enter: pay with the selected method",
            styling::muted_text_style(theme),
        ),
        SimulationStatus::Processing => Line::styled(
            format!("{} Processing payment...", spinner::frame()),
            styling::warning_text_style(theme),
        ),
        SimulationStatus::Done(PaymentOutcome::Succeeded) => Line::styled(
            "Payment accepted. Enter: start the consultation",
            styling::success_text_style(theme),
        ),
        SimulationStatus::Done(PaymentOutcome::Failed) => Line::styled(
            "Payment declined. Choose a method and try again.",
            styling::error_text_style(theme),
        ),
    };
    frame.render_widget(Paragraph::new(status).wrap(Wrap { trim: false }), rows[1]);
}

fn consultation<'a>(kind: ConsultationKind, theme: &Theme) -> Vec<Line<'a>> {
    let counterpart = match kind {
        ConsultationKind::Administrative => "a public officer",
        ConsultationKind::Legal => "a registered lawyer",
    };
    vec![
        Line::styled(
            format!("You are connected to {}.", counterpart),
            styling::success_text_style(theme),
        ),
        Line::styled(
            "Describe your situation and attach any reference numbers.",
            styling::normal_text_style(theme),
        ),
        Line::from(""),
        Line::styled("Esc: end the consultation", styling::muted_text_style(theme)),
    ]
}

fn tracking<'a>(lookup: &TrackingLookup, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::styled(
            format!("Track your {} application", lookup.kind.label()),
            styling::normal_text_style(theme),
        ),
        Line::from(""),
        Line::from(vec![
            Span::styled("Request number: ", styling::active_block_title_style(theme)),
            Span::styled(
                format!("{}█", lookup.request_number),
                styling::normal_text_style(theme),
            ),
        ]),
        Line::from(""),
    ];
    lines.push(match lookup.status {
        SimulationStatus::Idle => Line::styled(
            "Enter: look up the request",
            styling::muted_text_style(theme),
        ),
        SimulationStatus::Processing => Line::styled(
            format!("{} Looking up your request...", spinner::frame()),
            styling::warning_text_style(theme),
        ),
        SimulationStatus::Done(status) => Line::styled(
            format!("Status: {}", status.label()),
            styling::success_text_style(theme),
        ),
    });
    lines
}

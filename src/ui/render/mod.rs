mod all;
mod files;
mod footer;
mod home;
mod log;
mod login;
mod main;
mod overlays;
mod profile;
mod search;
mod splash;

use self::log::log;
use super::*;
use citizen_portal::utils::text_processing::contains_arabic;
use footer::footer;
use main::main;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
};

pub use all::all as render;

/// Build a single styled line, right-aligned when it holds Arabic text.
///
fn text_line<'a>(text: String, style: Style) -> Line<'a> {
    let align = if contains_arabic(&text) {
        Alignment::Right
    } else {
        Alignment::Left
    };
    Line::styled(text, style).alignment(align)
}

/// Return a rectangle centered in `r` taking the given share of its size.
///
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

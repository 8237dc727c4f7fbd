use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, Paragraph, Wrap},
};

use super::data::{Banner, Item, Screen, Section, Tone};

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Info => Style::new().fg(Color::Cyan),
        Tone::Success => Style::new().fg(Color::Green),
        Tone::Error => Style::new().fg(Color::Red),
    }
}

fn height(section: &Section) -> Constraint {
    match section {
        Section::Text(text) => Constraint::Length(text.lines().count().max(1) as u16),
        Section::Notice(_) => Constraint::Length(1),
        Section::Field { .. } => Constraint::Length(3),
        Section::List { .. } => Constraint::Min(3),
        Section::Rows { rows, .. } => Constraint::Length(rows.len() as u16 + 2),
    }
}

/// Draws `screen` over the whole frame: a title line, the sections stacked
/// top to bottom, the toast and a line of key hints.
pub fn draw(frame: &mut Frame, screen: &Screen) {
    let toast_height = if screen.toast.is_some() { 1 } else { 0 };
    let [title, body, toast, hints] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(toast_height),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(&*screen.title).bold().centered()),
        title,
    );

    let areas = Layout::vertical(screen.sections.iter().map(height)).split(body);
    for (section, area) in screen.sections.iter().zip(areas.iter()) {
        draw_section(frame, section, *area);
    }

    if let Some(banner) = &screen.toast {
        draw_banner(frame, banner, toast);
    }
    frame.render_widget(
        Paragraph::new(&*screen.hints).style(Style::new().fg(Color::DarkGray)),
        hints,
    );
}

fn draw_banner(frame: &mut Frame, banner: &Banner, area: Rect) {
    frame.render_widget(
        Paragraph::new(&*banner.text).style(tone_style(banner.tone)),
        area,
    );
}

fn item_line(item: &Item) -> ListItem<'_> {
    let mut spans = Vec::with_capacity(3);
    if let Some(checked) = item.checked {
        spans.push(Span::raw(if checked { "[x] " } else { "[ ] " }));
    }
    spans.push(Span::raw(&*item.label));
    if let Some(note) = &item.note {
        spans.push(Span::styled(
            format!("  {note}"),
            Style::new().fg(Color::DarkGray),
        ));
    }
    ListItem::new(Line::from(spans))
}

fn draw_section(frame: &mut Frame, section: &Section, area: Rect) {
    match section {
        Section::Text(text) => {
            frame.render_widget(
                Paragraph::new(&**text).wrap(Wrap { trim: false }),
                area,
            );
        }
        Section::Notice(banner) => draw_banner(frame, banner, area),
        Section::Field {
            label,
            value,
            focused,
            masked,
        } => {
            let shown = if *masked {
                "*".repeat(value.chars().count())
            } else {
                value.to_string()
            };
            let border = if *focused {
                Style::new().fg(Color::Yellow)
            } else {
                Style::new()
            };
            let block = Block::bordered()
                .title(&**label)
                .border_style(border);
            frame.render_widget(Paragraph::new(shown).block(block), area);
        }
        Section::List {
            title,
            items,
            cursor,
        } => {
            let list = List::new(items.iter().map(item_line))
                .block(Block::bordered().title(&**title))
                .highlight_style(Style::new().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            let mut state = ListState::default().with_selected(*cursor);
            frame.render_stateful_widget(list, area, &mut state);
        }
        Section::Rows { title, rows } => {
            let lines: Vec<Line> = rows
                .iter()
                .map(|(key, value)| {
                    Line::from(vec![
                        Span::styled(format!("{key}: "), Style::new().bold()),
                        Span::raw(&**value),
                    ])
                })
                .collect();
            frame.render_widget(
                Paragraph::new(lines).block(Block::bordered().title(&**title)),
                area,
            );
        }
    }
}

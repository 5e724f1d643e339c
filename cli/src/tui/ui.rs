use std::time::Instant;

use mapty_core::{FormField, WorkoutType};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, BorderType, Borders, Cell, Clear, HighlightSpacing, Paragraph, Row, Table, Wrap,
    },
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::app::{App, CONTROL_WIDTH, HIGHLIGHT_WIDTH, ROW_HEIGHT};

const FORM_HEIGHT: u16 = 6;

fn type_color(workout_type: WorkoutType) -> Color {
    match workout_type {
        WorkoutType::Running => Color::Green,
        WorkoutType::Cycling => Color::Yellow,
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    // Header and Main Content Split
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    // Header
    let header = Paragraph::new("MAPTY")
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    // Sidebar on the left, map on the right
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(60),
        ])
        .split(main_chunks[1]);

    draw_sidebar(f, app, content_chunks[0]);
    draw_map(f, app, content_chunks[1]);
    draw_footer(f, app, main_chunks[2]);

    if let Some(message) = app.controller.alerter().current() {
        draw_alert(f, message, size);
    }
}

fn draw_sidebar(f: &mut Frame, app: &mut App, area: Rect) {
    let form = app.controller.form();
    if form.is_shown() && form.is_laid_out() {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(FORM_HEIGHT), Constraint::Min(1)])
            .split(area);
        draw_form(f, app, chunks[0]);
        draw_workout_list(f, app, chunks[1]);
    } else {
        draw_workout_list(f, app, area);
    }
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let form = app.controller.form();
    let lines: Vec<Line> = form
        .visible_fields()
        .iter()
        .map(|&field| {
            let focused = form.focus() == field;
            let label_style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Blue)
            };

            let value = match field {
                FormField::Type => Span::styled(
                    format!("< {} >", form.value(field)),
                    Style::default().fg(type_color(form.workout_type())),
                ),
                _ if form.value(field).is_empty() && !focused => Span::styled(
                    field.placeholder(),
                    Style::default().fg(Color::DarkGray),
                ),
                _ => Span::raw(form.value(field).to_string()),
            };

            let mut spans = vec![Span::styled(format!("{:<10}", field.label()), label_style), value];
            if focused && field != FormField::Type {
                spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
            }
            Line::from(spans)
        })
        .collect();

    let title = match form.pending() {
        Some(at) => format!(" New workout at {} ", at),
        None => " New workout ".to_string(),
    };
    let form_block = Paragraph::new(lines)
        .block(Block::default().title(title).borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(form_block, area);
}

/// Cuts `text` to at most `max` columns, marking the cut with an ellipsis.
fn fit_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn draw_workout_list(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().title(" Workouts ").borders(Borders::ALL).border_type(BorderType::Rounded);
    let inner = block.inner(area);
    app.list_area = inner;

    // highlight + close + gear + two column gaps
    let body_width = inner.width.saturating_sub(HIGHLIGHT_WIDTH + 2 * CONTROL_WIDTH + 2) as usize;

    let rows: Vec<Row> = app.controller.rows().iter().map(|row| {
        let color = type_color(row.workout_type);
        let body = Text::from(vec![
            Line::styled(fit_width(&row.title, body_width), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Line::raw(fit_width(&row.detail_texts().join("  "), body_width)),
        ]);

        Row::new(vec![
            Cell::from(Span::styled("×", Style::default().fg(Color::Red))),
            Cell::from(body),
            Cell::from(Span::styled("⚙", Style::default().fg(Color::DarkGray))),
        ])
        .height(ROW_HEIGHT)
    }).collect();

    if rows.is_empty() {
        let hint = Paragraph::new("Click on the map to log a workout.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(CONTROL_WIDTH), // Close
            Constraint::Fill(1),               // Workout
            Constraint::Length(CONTROL_WIDTH), // Settings
        ]
    )
    .block(block)
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("> ")
    .highlight_spacing(HighlightSpacing::Always);

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_map(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().title(" Map ").borders(Borders::ALL).border_type(BorderType::Rounded);
    let inner = block.inner(area);
    app.map_area = inner;

    let map = app.controller.map();
    let Some(viewport) = map.viewport(Instant::now(), inner) else {
        let waiting = Paragraph::new("No position available. Start with --position lat,lng to open the map.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(waiting, area);
        return;
    };

    let pending = app.controller.form().pending();
    let canvas = Canvas::default()
        .block(block.title_bottom(format!(" zoom {} ", map.zoom())))
        .marker(Marker::Braille)
        .x_bounds(viewport.x_bounds())
        .y_bounds(viewport.y_bounds())
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();

            for marker in map.markers() {
                let color = if marker.popup.class_name.starts_with(WorkoutType::Cycling.name()) {
                    type_color(WorkoutType::Cycling)
                } else {
                    type_color(WorkoutType::Running)
                };
                ctx.draw(&Points {
                    coords: &[(marker.at.lng, marker.at.lat)],
                    color,
                });
                ctx.print(
                    marker.at.lng,
                    marker.at.lat,
                    Line::styled(format!(" {}", marker.popup.content), Style::default().fg(color)),
                );
            }

            if let Some(at) = pending {
                ctx.print(at.lng, at.lat, Line::styled("+", Style::default().fg(Color::Cyan)));
            }
        });
    f.render_widget(canvas, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let mut help = if app.controller.form().is_shown() {
        "Tab: Next field | t: Type | Enter: Save | Esc: Cancel".to_string()
    } else {
        "click/n: New | j/k: Select | Enter: Go to | d: Delete | +/-: Zoom | q: Quit".to_string()
    };
    if app.controller.is_reset_visible() {
        help.push_str(" | R: Reset");
    }
    let attribution = app.controller.map().attribution();
    if !attribution.is_empty() {
        help.push_str(&format!("   {}", attribution));
    }

    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_alert(f: &mut Frame, message: &str, area: Rect) {
    let popup = centered(50, 6, area);
    let text = vec![
        Line::from(Span::styled(message, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled("Press any key", Style::default().fg(Color::DarkGray))),
    ];
    let alert = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Alert ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(Clear, popup);
    f.render_widget(alert, popup);
}

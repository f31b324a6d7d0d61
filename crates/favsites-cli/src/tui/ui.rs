//! UI rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use favsites_core::{Bookmark, Store};

use super::app::{App, Confirmation, Focus, GRID_COLUMNS};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App, store: &Store) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_title(frame, chunks[0]);
    draw_form(frame, app, chunks[1]);
    draw_grid(frame, app, store, chunks[2]);
    draw_pagination(frame, app, store, chunks[3]);
    draw_status_bar(frame, app, chunks[4]);

    if let Confirmation::Pending(id) = app.confirmation {
        draw_confirmation(frame, store.get(id));
    }

    if app.show_help {
        draw_help_overlay(frame);
    }

    if let Some(notice) = &app.notice {
        draw_notice(frame, notice);
    }
}

fn draw_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Span::styled(
        "My Favorite Websites",
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(title, area);
}

/// Draw the name/link inputs and the submit button
fn draw_form(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Min(10),
            Constraint::Length(10),
        ])
        .split(area);

    draw_input(frame, app, chunks[0], " Name ", &app.form.name, Focus::Name);
    draw_input(frame, app, chunks[1], " Link ", &app.form.link, Focus::Link);

    let button_style = if app.form.is_editing() {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let button = Paragraph::new(Span::styled(app.submit_label(), button_style))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, chunks[2]);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect, title: &str, value: &str, focus: Focus) {
    let is_active = app.focus == focus;

    let border_style = if is_active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let paragraph = Paragraph::new(value).block(block);
    frame.render_widget(paragraph, area);

    // Position cursor
    if is_active && !app.is_loading {
        let cursor_x = area.x + 1 + app.cursor as u16;
        let max_x = area.x + area.width.saturating_sub(2);
        frame.set_cursor_position((cursor_x.min(max_x), area.y + 1));
    }
}

/// Draw the current page as a grid of cards
fn draw_grid(frame: &mut Frame, app: &App, store: &Store, area: Rect) {
    let cards = app.page(store);

    if store.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No favorites yet. Type a name and a link above and press Enter.",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let rows = app.pager.page_size().div_ceil(GRID_COLUMNS).max(1);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for (row, row_area) in row_areas.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(*row_area);

        for (col, card_area) in cols.iter().enumerate() {
            let offset = row * GRID_COLUMNS + col;
            if let Some(bookmark) = cards.get(offset) {
                let is_selected = app.focus == Focus::Grid && app.selected == offset;
                let is_editing = app.form.edit_id == Some(bookmark.id);
                draw_card(frame, bookmark, *card_area, is_selected, is_editing);
            }
        }
    }
}

fn draw_card(frame: &mut Frame, bookmark: &Bookmark, area: Rect, is_selected: bool, is_editing: bool) {
    let border_style = if is_selected {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else if is_editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let block = Block::default()
        .title(format!(" {} ", bookmark.name))
        .borders(Borders::ALL)
        .border_style(border_style);

    let preview = match &bookmark.image {
        Some(image) => Span::styled(image.as_str(), Style::default().fg(Color::Cyan)),
        None => Span::styled("no preview", Style::default().add_modifier(Modifier::DIM)),
    };

    let content = vec![
        Line::from(Span::styled(
            bookmark.link.as_str(),
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from(""),
        Line::from(preview),
    ];

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Draw Prev / page indicator / Next
fn draw_pagination(frame: &mut Frame, app: &App, store: &Store, area: Rect) {
    let control = |label: &'static str, enabled: bool| {
        if enabled {
            Span::styled(label, Style::default().add_modifier(Modifier::BOLD))
        } else {
            Span::styled(label, Style::default().add_modifier(Modifier::DIM))
        }
    };

    let line = Line::from(vec![
        control("‹ Prev", app.pager.has_prev()),
        Span::raw("   "),
        Span::raw(app.pager.indicator(store.len())),
        Span::raw("   "),
        control("Next ›", app.pager.has_next(store.len())),
    ]);

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if app.is_loading {
        "Fetching preview...".to_string()
    } else if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        match app.focus {
            Focus::Name | Focus::Link => {
                "Enter:next/submit  Tab:switch  Esc:cancel edit  Ctrl-c:quit".to_string()
            }
            Focus::Grid => {
                "e:edit  d:delete  Enter:open  n/p:page  a:add  ?:help  q:quit".to_string()
            }
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Centered popup area of at most `width` x `height`
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(2));
    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

/// Draw the delete confirmation modal
fn draw_confirmation(frame: &mut Frame, bookmark: Option<&Bookmark>) {
    let area = popup_area(frame.area(), 50, 7);
    frame.render_widget(Clear, area);

    let name = bookmark.map(|b| b.name.as_str()).unwrap_or("(missing)");
    let text = vec![
        Line::from("Are you sure you wish to delete this item?"),
        Line::from(Span::styled(name, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Confirm", Style::default().fg(Color::Red)),
            Span::raw("    "),
            Span::raw("[n] Cancel"),
        ]),
    ];

    let block = Block::default()
        .title(" Delete ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Draw a blocking notice
fn draw_notice(frame: &mut Frame, message: &str) {
    let mut text: Vec<Line> = message.lines().map(Line::from).collect();
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let area = popup_area(frame.area(), 50, text.len() as u16 + 4);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Notice ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = popup_area(frame.area(), 50, 22);
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Form:"),
        Line::from("  Tab/S-Tab   Cycle focus"),
        Line::from("  Enter       Next field / Add or Edit"),
        Line::from("  Esc         Cancel edit, clear form"),
        Line::from(""),
        Line::from("Cards:"),
        Line::from("  h/j/k/l     Move between cards"),
        Line::from("  n, ], PgDn  Next page"),
        Line::from("  p, [, PgUp  Previous page"),
        Line::from("  Enter, o    Open link in browser"),
        Line::from("  e           Edit card"),
        Line::from("  d           Delete card"),
        Line::from("  a           Focus the form"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use favsites_core::{Config, NoPreview};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    fn render(app: &App, store: &Store) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app, store)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    fn test_store() -> (Store, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        (Store::open_with_config(config).unwrap(), temp_dir)
    }

    #[test]
    fn test_popup_area_is_centered() {
        let area = popup_area(Rect::new(0, 0, 100, 30), 50, 6);
        assert_eq!(area, Rect::new(25, 12, 50, 6));
    }

    #[test]
    fn test_popup_area_small_terminal() {
        let area = popup_area(Rect::new(0, 0, 20, 5), 50, 6);
        assert_eq!(area.width, 16);
        assert_eq!(area.height, 3);
    }

    #[tokio::test]
    async fn test_render_cards_and_indicator() {
        let (mut store, _dir) = test_store();
        store.add("Rust", "http://rust.test", &NoPreview).await.unwrap();
        let app = App::new(&store);

        let screen = render(&app, &store);
        assert!(screen.contains("My Favorite Websites"));
        assert!(screen.contains("Rust"));
        assert!(screen.contains("no preview"));
        assert!(screen.contains("1 / 1"));
        assert!(screen.contains("Add"));
    }

    #[tokio::test]
    async fn test_render_confirmation_modal() {
        let (mut store, _dir) = test_store();
        let bookmark = store.add("Rust", "http://rust.test", &NoPreview).await.unwrap();
        let mut app = App::new(&store);
        app.request_delete(bookmark.id);

        let screen = render(&app, &store);
        assert!(screen.contains("Are you sure you wish to delete this item?"));
    }
}

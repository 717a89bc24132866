use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::catalog::{SearchKind, SearchResult};

use super::widgets::titled_block;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchInput {
    Query,
    Year,
}

pub fn empty_results_line(query: &str) -> String {
    format!("No results found for \"{}\"", query)
}

pub fn render_search_view(
    frame: &mut Frame,
    area: Rect,
    query: &str,
    year: &str,
    input: SearchInput,
    kind: SearchKind,
    results: &[SearchResult],
    list_state: &mut ListState,
    is_loading: bool,
    failed: bool,
    searched_query: Option<&str>,
    accent: Color,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(area);

    render_search_input(frame, chunks[0], query, input, is_loading, accent);
    render_filter_bar(frame, chunks[1], kind, year, input);
    render_results(
        frame,
        chunks[2],
        results,
        list_state,
        failed,
        searched_query,
        accent,
    );
}

fn render_search_input(
    frame: &mut Frame,
    area: Rect,
    query: &str,
    input: SearchInput,
    is_loading: bool,
    accent: Color,
) {
    let title = if is_loading {
        " Search catalog (searching...) "
    } else {
        " Search catalog "
    };

    let border = if input == SearchInput::Query {
        Style::default().fg(accent)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let widget = Paragraph::new(query)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title)
                .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(widget, area);

    if input == SearchInput::Query {
        frame.set_cursor_position((area.x + query.len() as u16 + 1, area.y + 1));
    }
}

fn render_filter_bar(frame: &mut Frame, area: Rect, kind: SearchKind, year: &str, input: SearchInput) {
    let year_display = if year.is_empty() && input != SearchInput::Year {
        "any".to_string()
    } else {
        year.to_string()
    };

    let year_style = if input == SearchInput::Year {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled("^t", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(":Type "),
        Span::styled(format!("[{}]", kind.as_display()), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(":Year "),
        Span::styled(format!("[{}]", year_display), year_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_results(
    frame: &mut Frame,
    area: Rect,
    results: &[SearchResult],
    list_state: &mut ListState,
    failed: bool,
    searched_query: Option<&str>,
    accent: Color,
) {
    if failed {
        let error = Paragraph::new("Search failed. Please try again.")
            .block(titled_block("Results", accent))
            .style(Style::default().fg(Color::Red));
        frame.render_widget(error, area);
        return;
    }

    if results.is_empty() {
        let text = match searched_query {
            Some(query) => empty_results_line(query),
            None => "Type to search, Enter to submit.".to_string(),
        };
        let empty = Paragraph::new(text)
            .block(titled_block("Results", accent))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = results
        .iter()
        .map(|r| {
            let type_color = match r.media_type {
                crate::media::MediaType::Tv => Color::Cyan,
                crate::media::MediaType::Movie => Color::LightMagenta,
            };

            let line = Line::from(vec![
                Span::styled(
                    format!("{:>7}", r.media_type.as_display()),
                    Style::default().fg(type_color),
                ),
                Span::raw(" │ "),
                Span::styled(format!("{:>7}", r.year), Style::default().fg(Color::Yellow)),
                Span::raw(" │ "),
                Span::styled(r.title.clone(), Style::default().fg(Color::White)),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(titled_block("Results", accent))
        .highlight_style(
            Style::default()
                .bg(accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, list_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_results_message_quotes_the_query() {
        assert_eq!(
            empty_results_line("Dune"),
            "No results found for \"Dune\""
        );
    }
}

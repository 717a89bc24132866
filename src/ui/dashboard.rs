use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use crate::media::Activity;

use super::widgets::titled_block;

#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardStats {
    pub tv_count: usize,
    pub movie_count: usize,
    pub continue_count: usize,
}

fn stat_card(label: &str, value: usize, accent: Color) -> Paragraph<'static> {
    let lines = vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            label.to_string(),
            Style::default().fg(Color::Gray),
        )),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(titled_block("", accent))
}

pub fn render_dashboard_view(
    frame: &mut Frame,
    area: Rect,
    username: &str,
    stats: DashboardStats,
    activities: &[Activity],
    accent: Color,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Min(3),
        ])
        .split(area);

    let greeting = Paragraph::new(Line::from(vec![
        Span::raw("Welcome back, "),
        Span::styled(
            username.to_string(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
    ]));
    frame.render_widget(greeting, chunks[0]);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(chunks[1]);

    frame.render_widget(stat_card("TV Shows", stats.tv_count, accent), cards[0]);
    frame.render_widget(stat_card("Movies", stats.movie_count, accent), cards[1]);
    frame.render_widget(
        stat_card("Continue Watching", stats.continue_count, accent),
        cards[2],
    );

    if activities.is_empty() {
        let empty = Paragraph::new("No recent activity")
            .block(titled_block("Recent Activity", accent))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, chunks[2]);
        return;
    }

    let items: Vec<ListItem> = activities
        .iter()
        .map(|act| {
            let line = Line::from(vec![
                Span::raw(format!("{} ", act.icon())),
                Span::raw(act.message.clone()),
                Span::raw("  "),
                Span::styled(
                    act.formatted_timestamp(),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(titled_block("Recent Activity", accent));
    frame.render_widget(list, chunks[2]);
}

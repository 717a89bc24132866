use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::media::{MediaRecord, MediaType, WatchStatus};

use super::widgets::{progress_bar, titled_block};

fn status_color(status: WatchStatus) -> Color {
    match status {
        WatchStatus::ToWatch => Color::Cyan,
        WatchStatus::Watching => Color::Yellow,
        WatchStatus::Completed => Color::Green,
        WatchStatus::Dropped => Color::Red,
    }
}

fn media_card(media: &MediaRecord) -> ListItem<'static> {
    let year = media.year.clone().unwrap_or_else(|| "Unknown".to_string());

    let poster_marker = if media.poster_path.is_some() {
        "▦ "
    } else {
        "  "
    };

    let mut spans = vec![
        Span::styled(poster_marker, Style::default().fg(Color::DarkGray)),
        Span::styled(
            media.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" ({})", year), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(
            media.status.label(),
            Style::default().fg(status_color(media.status)),
        ),
    ];

    // Progress only shows while something is actively being watched
    if media.status == WatchStatus::Watching {
        let percent = media.progress_percent();
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} {}%", progress_bar(percent, 10), percent),
            Style::default().fg(Color::Yellow),
        ));

        if media.media_type == MediaType::Tv {
            let total = if media.total_episodes > 0 {
                media.total_episodes.to_string()
            } else {
                "?".to_string()
            };
            spans.push(Span::styled(
                format!("  {}/{}", media.watched_episodes, total),
                Style::default().fg(Color::Gray),
            ));
            spans.push(Span::styled(
                format!(
                    "  S{} E{}",
                    media.season.unwrap_or(1),
                    media.episode.unwrap_or(1)
                ),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    ListItem::new(Line::from(spans))
}

pub fn render_media_grid(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    media: &[MediaRecord],
    indices: &[usize],
    list_state: &mut ListState,
    accent: Color,
) {
    if indices.is_empty() {
        let empty = Paragraph::new("No items found.")
            .block(titled_block(title, accent))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = indices
        .iter()
        .filter_map(|i| media.get(*i))
        .map(media_card)
        .collect();

    let list = List::new(items)
        .block(titled_block(title, accent))
        .highlight_style(
            Style::default()
                .bg(accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, list_state);
}

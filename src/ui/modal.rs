use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::media::MediaType;
use crate::modal::{MediaDraft, ModalField};
use crate::verify::PosterPrompt;

use super::widgets::{dialog_rect, progress_bar};

fn field_line<'a>(label: &'a str, value: String, focused: bool, accent: Color) -> Line<'a> {
    let value_style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    Line::from(vec![
        Span::styled(format!("{:<10}", label), Style::default().fg(Color::Gray)),
        Span::styled(value, value_style),
    ])
}

pub fn render_media_modal(
    frame: &mut Frame,
    draft: &MediaDraft,
    is_edit: bool,
    in_flight: bool,
    accent: Color,
) {
    let area = frame.area();
    let dialog_area = dialog_rect(area, 64, 19);

    frame.render_widget(Clear, dialog_area);

    let title = if is_edit { " Edit Media " } else { " Add to Watchlist " };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(1),
        ])
        .split(inner);

    let year = if draft.year.is_empty() {
        "Unknown".to_string()
    } else {
        draft.year.clone()
    };
    let header = Line::from(vec![
        Span::styled(
            draft.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" ({})", year), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(
            draft.media_type.as_display(),
            Style::default().fg(Color::Cyan),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let overview = draft
        .overview
        .clone()
        .unwrap_or_else(|| "No overview available".to_string());
    frame.render_widget(
        Paragraph::new(overview)
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true }),
        chunks[1],
    );

    let poster = draft
        .poster_path
        .clone()
        .unwrap_or_else(|| "no poster".to_string());
    frame.render_widget(
        Paragraph::new(Line::styled(poster, Style::default().fg(Color::DarkGray))),
        chunks[2],
    );

    frame.render_widget(
        Paragraph::new(field_line(
            "Status",
            format!("◂ {} ▸", draft.status.label()),
            draft.focus == ModalField::Status,
            accent,
        )),
        chunks[4],
    );

    let mut detail_lines: Vec<Line> = Vec::new();
    match draft.media_type {
        MediaType::Tv => {
            if draft.episode_inputs_visible() {
                let total = if draft.total_episodes > 0 {
                    draft.total_episodes.to_string()
                } else {
                    "?".to_string()
                };
                detail_lines.push(field_line(
                    "Watched",
                    format!("{} / {}", draft.watched_input, total),
                    draft.focus == ModalField::Watched,
                    accent,
                ));
                detail_lines.push(field_line(
                    "Season",
                    draft.season_input.clone(),
                    draft.focus == ModalField::Season,
                    accent,
                ));
                detail_lines.push(field_line(
                    "Episode",
                    draft.episode_input.clone(),
                    draft.focus == ModalField::Episode,
                    accent,
                ));
            }
        }
        MediaType::Movie => {
            detail_lines.push(field_line(
                "Progress",
                format!("{} {}%", progress_bar(draft.progress, 20), draft.progress),
                draft.focus == ModalField::Progress,
                accent,
            ));
        }
    }
    frame.render_widget(Paragraph::new(Text::from(detail_lines)), chunks[5]);

    let hint = if in_flight {
        Line::styled("Saving...", Style::default().fg(Color::Yellow))
    } else {
        let mut text =
            "Enter save  Tab field  ←/→ change  Esc cancel".to_string();
        if is_edit {
            text.push_str("  x remove");
        }
        Line::styled(text, Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(Paragraph::new(hint), chunks[6]);
}

pub fn render_verify_dialog(frame: &mut Frame, prompt: &PosterPrompt, accent: Color) {
    let area = frame.area();
    let dialog_area = dialog_rect(area, 60, 9);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Confirm Poster ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let text = Text::from(vec![
        Line::from("This poster could not be verified automatically."),
        Line::from(Span::styled(
            prompt.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            prompt.image_url.clone(),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter use this image  Esc cancel save",
            Style::default().fg(Color::DarkGray),
        )),
    ]);

    let para = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(para, inner);
}

pub fn render_delete_dialog(frame: &mut Frame, title: &str) {
    let area = frame.area();
    let dialog_area = dialog_rect(area, 50, 6);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Confirm Removal ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let text = Text::from(vec![
        Line::from("Remove from your list:"),
        Line::from(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Red),
        )),
        Line::from(""),
        Line::from("Enter confirm  Esc cancel"),
    ]);

    let para = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(para, inner);
}

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{AuthField, AuthState, AuthTab};

use super::widgets::dialog_rect;

fn field_box<'a>(
    label: &'a str,
    value: &'a str,
    mask: bool,
    focused: bool,
    accent: Color,
) -> Paragraph<'a> {
    let shown = if mask {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };

    let border = if focused {
        Style::default().fg(accent)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    Paragraph::new(shown).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ", label)),
    )
}

pub fn render_auth_view(frame: &mut Frame, area: Rect, auth: &AuthState, accent: Color) {
    let panel = dialog_rect(area, 52, 16);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(" mita ")
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));

    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

    let tab_style = |active: bool| {
        if active {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let tabs = Line::from(vec![
        Span::styled("Login", tab_style(auth.tab == AuthTab::Login)),
        Span::raw("   "),
        Span::styled("Register", tab_style(auth.tab == AuthTab::Register)),
    ]);
    frame.render_widget(
        Paragraph::new(tabs).alignment(Alignment::Center),
        chunks[0],
    );

    match auth.tab {
        AuthTab::Login => {
            frame.render_widget(
                field_box(
                    "Username",
                    &auth.login_username,
                    false,
                    auth.focus == AuthField::LoginUsername,
                    accent,
                ),
                chunks[2],
            );
            frame.render_widget(
                field_box(
                    "Password",
                    &auth.login_password,
                    true,
                    auth.focus == AuthField::LoginPassword,
                    accent,
                ),
                chunks[3],
            );
        }
        AuthTab::Register => {
            frame.render_widget(
                field_box(
                    "Username",
                    &auth.register_username,
                    false,
                    auth.focus == AuthField::RegisterUsername,
                    accent,
                ),
                chunks[2],
            );
            frame.render_widget(
                field_box(
                    "Email",
                    &auth.register_email,
                    false,
                    auth.focus == AuthField::RegisterEmail,
                    accent,
                ),
                chunks[3],
            );
            frame.render_widget(
                field_box(
                    "Password",
                    &auth.register_password,
                    true,
                    auth.focus == AuthField::RegisterPassword,
                    accent,
                ),
                chunks[4],
            );
        }
    }

    let hint = Paragraph::new(Line::styled(
        "Tab switch form  ↑/↓ move  Enter submit",
        Style::default().fg(Color::DarkGray),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(hint, chunks[5]);
}

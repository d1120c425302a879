//! Terminal screen for playdeck, drawn with `ratatui` from the session state.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{PlaybackState, Session};
use crate::config::{ControlsSettings, UiSettings};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play selected");
    map.insert("space/p", "play/pause");
    map.insert("l/n", "next");
    // H/L is filled dynamically from config.
    map.insert("-/+", "volume");
    map.insert("s", "shuffle");
    map.insert("r", "repeat");
    map.insert("a", "add files");
    map.insert("u", "upload");
    map.insert("d", "remove");
    map.insert("R", "reload");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating seek seconds.
fn controls_text(seek_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "enter", "space/p", "l/n", "H/L", "-/+", "s", "r", "gg/G", "a", "u", "d", "R", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{}s", seek_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `M:SS`.
fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Fraction of `total` already played, kept inside `[0, 1]`.
fn progress_ratio(elapsed: Duration, total: Option<Duration>) -> f64 {
    match total {
        Some(t) if !t.is_zero() => (elapsed.as_secs_f64() / t.as_secs_f64()).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame` using the session state.
pub fn draw(
    frame: &mut Frame,
    session: &Session,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" playdeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();
        if !session.status.is_empty() {
            parts.push(session.status.clone());
        }
        if !session.pending_upload.is_empty() {
            parts.push(format!("Staged: {}", session.pending_upload.len()));
        }
        parts.push(format!("Shuffle: {}", on_off(session.shuffle)));
        parts.push(format!("Repeat: {}", on_off(session.repeat)));
        parts.push(format!("Volume: {:.0}%", session.volume * 100.0));
        parts.join(" • ")
    };
    let status_par = Paragraph::new(status)
        .block(left_padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Now playing
    {
        let state = match session.playback {
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Stopped => "Stopped",
        };
        let title = session
            .current_track
            .as_deref()
            .unwrap_or("Select a song");
        let block = left_padded(" now playing ");
        let inner = block.inner(chunks[2]);
        frame.render_widget(block, chunks[2]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        frame.render_widget(Paragraph::new(format!("{title} [{state}]")).bold(), rows[0]);

        let label = format!(
            "{} / {}",
            format_time(session.current_time),
            format_time(session.duration.unwrap_or_default())
        );
        let gauge = Gauge::default()
            .ratio(progress_ratio(session.current_time, session.duration))
            .label(label);
        frame.render_widget(gauge, rows[1]);
    }

    // Main list
    {
        let total = session.library.len();
        let list_height = chunks[3].height.saturating_sub(2) as usize;
        let sel_pos = session.selected.min(total.saturating_sub(1));

        // Only build ListItems for the visible window, centered on the cursor when possible.
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let current = session.current_track.as_deref();
        let visible_items: Vec<ListItem> = session.library[start..end]
            .iter()
            .map(|t| {
                if Some(t.name.as_str()) == current {
                    ListItem::new(format!("▶ {}", t.name))
                } else {
                    ListItem::new(format!("  {}", t.name))
                }
            })
            .collect();

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(" music list "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    // Path prompt overlays the list while staging files.
    if let Some(input) = session.path_input.as_deref() {
        let popup_area = centered_rect_sized(72, 3, chunks[3]);
        frame.render_widget(Clear, popup_area);
        let prompt = Paragraph::new(format!("{input}_")).block(left_padded(
            " add file or folder (enter stages, esc cancels) ",
        ));
        frame.render_widget(prompt, popup_area);
    }

    let footer = Paragraph::new(controls_text(controls_settings.seek_seconds))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

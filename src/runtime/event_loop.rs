use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::Controller;
use crate::audio::{AudioPlayer, MediaEvent};
use crate::config;
use crate::selection;
use crate::storage::StorageReply;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Status line shown after staging from the prompt or the command line.
pub fn staged_status(kept: usize) -> String {
    match kept {
        0 => "No MP3 files in that selection.".to_string(),
        1 => "1 file staged. Press u to upload.".to_string(),
        n => format!("{n} files staged. Press u to upload."),
    }
}

/// Main terminal event loop: feeds storage replies and media events to the
/// controller, draws, and handles input. Returns `Ok(())` on quit.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    controller: &mut Controller<AudioPlayer>,
    replies: &mpsc::Receiver<StorageReply>,
    events: &mpsc::Receiver<MediaEvent>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(reply) = replies.try_recv() {
            controller.on_storage_reply(reply);
        }
        while let Ok(ev) = events.try_recv() {
            controller.on_media_event(ev);
        }

        terminal.draw(|f| ui::draw(f, &controller.session, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, controller, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_path_input(key: KeyEvent, controller: &mut Controller<AudioPlayer>) {
    match key.code {
        KeyCode::Esc => {
            controller.session.take_path_input();
        }
        KeyCode::Backspace => controller.session.pop_path_char(),
        KeyCode::Enter => {
            let typed = controller.session.take_path_input().unwrap_or_default();
            let typed = typed.trim();
            if typed.is_empty() {
                return;
            }
            let handles = selection::expand(&[PathBuf::from(typed)]);
            let kept = controller.select_files(handles);
            controller.session.status = staged_status(kept);
        }
        KeyCode::Char(c) if !c.is_control() => controller.session.push_path_char(c),
        _ => {}
    }
}

/// Returns `true` when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    controller: &mut Controller<AudioPlayer>,
    state: &mut EventLoopState,
) -> bool {
    if controller.session.path_input.is_some() {
        state.pending_gg = false;
        handle_path_input(key, controller);
        return false;
    }

    // Any key other than a second `g` breaks the `gg` prefix.
    let was_pending_gg = std::mem::take(&mut state.pending_gg);

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('g') => {
            if was_pending_gg {
                controller.session.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => controller.session.select_last(),
        KeyCode::Char('j') | KeyCode::Down => controller.session.next(),
        KeyCode::Char('k') | KeyCode::Up => controller.session.prev(),
        KeyCode::Enter => {
            if let Some(name) = controller.session.selected_track().map(|t| t.name.clone()) {
                controller.select_track(&name);
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            controller.toggle_play_pause();
        }
        KeyCode::Char('l') | KeyCode::Char('n') => controller.next_track(),
        KeyCode::Char('L') => {
            let secs = settings.controls.seek_seconds.min(i64::MAX as u64) as i64;
            controller.seek_by(secs);
        }
        KeyCode::Char('H') => {
            let secs = settings.controls.seek_seconds.min(i64::MAX as u64) as i64;
            controller.seek_by(-secs);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            controller.nudge_volume(settings.controls.volume_step)
        }
        KeyCode::Char('-') => controller.nudge_volume(-settings.controls.volume_step),
        KeyCode::Char('s') => controller.toggle_shuffle(),
        KeyCode::Char('r') => controller.toggle_repeat(),
        KeyCode::Char('a') => controller.session.enter_path_input(),
        KeyCode::Char('u') => {
            controller.upload();
        }
        KeyCode::Char('d') => {
            if let Some(name) = controller.session.selected_track().map(|t| t.name.clone()) {
                controller.remove_track(&name);
            }
        }
        KeyCode::Char('R') => {
            let _ = controller.refresh_library();
        }
        _ => {}
    }

    false
}

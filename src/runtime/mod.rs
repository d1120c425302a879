use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::{Controller, ControllerConfig};
use crate::audio::{AudioPlayer, MediaEvent};
use crate::selection;
use crate::storage::{StorageBridge, StorageReply};

mod event_loop;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();
    let data_root = settings.storage.resolve_data_root();

    // Logging is optional; a bad log location should not keep the player from starting.
    match logging::init(&settings.logging, &data_root) {
        Ok(log_file) => info!(log = %log_file.display(), "logging to file"),
        Err(e) => eprintln!("playdeck: logging disabled: {e}"),
    }
    if let Some(msg) = config_warning {
        warn!("{msg}");
    }
    info!(data_root = %data_root.display(), "starting playdeck");

    let (reply_tx, reply_rx) = mpsc::channel::<StorageReply>();
    let (event_tx, event_rx) = mpsc::channel::<MediaEvent>();

    let storage = StorageBridge::new(data_root, settings.storage.subdir.clone(), reply_tx);
    let audio_player = AudioPlayer::new(settings.audio.clone(), event_tx);
    let mut controller = Controller::new(
        ControllerConfig::from_settings(&settings),
        storage,
        audio_player,
    );

    // Files or folders named on the command line are staged for upload.
    let args: Vec<PathBuf> = env::args().skip(1).map(PathBuf::from).collect();
    if !args.is_empty() {
        let kept = controller.select_files(selection::expand(&args));
        controller.session.status = event_loop::staged_status(kept);
    }

    controller.start();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut controller,
            &reply_rx,
            &event_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller
        .media()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    controller.storage().shutdown();
    info!("playdeck stopped");

    run_result
}

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, error};

use crate::config::AudioSettings;
use crate::error::AudioError;

use super::clock::PlayClock;
use super::sink::create_sink_at;
use super::types::{AudioCmd, MediaEvent};

/// State of the single loaded source.
struct Loaded {
    path: PathBuf,
    sink: Sink,
    /// `Ended` was already published for this source.
    ended: bool,
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<MediaEvent>,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let err = AudioError::Device(e.to_string());
                error!(error = %err, "audio thread cannot start");
                let _ = events.send(MediaEvent::Failed(err.to_string()));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));
        let mut volume = audio_settings.default_volume;
        let mut loaded: Option<Loaded> = None;
        let mut clock = PlayClock::default();

        let emit = |ev: MediaEvent| {
            let _ = events.send(ev);
        };

        // Replace the current sink with a fresh one for `path` at `at`,
        // keeping the running/paused state of the clock.
        let rebuild = |loaded: &mut Option<Loaded>,
                           clock: &mut PlayClock,
                           path: PathBuf,
                           at: Duration,
                           volume: f32|
         -> Option<Option<Duration>> {
            let running = clock.is_running();
            if let Some(old) = loaded.take() {
                old.sink.stop();
            }
            clock.reset(at);

            match create_sink_at(&stream, &path, at) {
                Ok((sink, total)) => {
                    sink.set_volume(volume);
                    if running {
                        sink.play();
                        clock.resume();
                    }
                    *loaded = Some(Loaded {
                        path,
                        sink,
                        ended: false,
                    });
                    Some(total)
                }
                Err(e) => {
                    error!(error = %e, "cannot load source");
                    let _ = events.send(MediaEvent::Failed(e.to_string()));
                    None
                }
            }
        };

        loop {
            match rx.recv_timeout(tick) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load(path) => {
                        debug!(file = %path.display(), "loading source");
                        clock.pause();
                        clock.reset(Duration::ZERO);
                        let total =
                            rebuild(&mut loaded, &mut clock, path, Duration::ZERO, volume);
                        if let Some(total) = total {
                            emit(MediaEvent::LoadedMetadata(total));
                            emit(MediaEvent::TimeUpdate(Duration::ZERO));
                        }
                    }

                    AudioCmd::Play => {
                        // A drained source restarts from the top, like a media
                        // element whose `play()` is called after `ended`.
                        let restart = loaded
                            .as_ref()
                            .filter(|l| l.ended)
                            .map(|l| l.path.clone());
                        if let Some(path) = restart {
                            rebuild(&mut loaded, &mut clock, path, Duration::ZERO, volume);
                        }
                        if let Some(l) = loaded.as_ref() {
                            l.sink.play();
                            clock.resume();
                        }
                    }

                    AudioCmd::Pause => {
                        if let Some(l) = loaded.as_ref() {
                            l.sink.pause();
                            clock.pause();
                        }
                    }

                    AudioCmd::Seek(pos) => {
                        // Scrubbing: rebuild the current sink and skip into the file.
                        let Some(path) = loaded.as_ref().map(|l| l.path.clone()) else {
                            continue;
                        };
                        if rebuild(&mut loaded, &mut clock, path, pos, volume).is_some() {
                            emit(MediaEvent::TimeUpdate(pos));
                        }
                    }

                    AudioCmd::SetVolume(v) => {
                        volume = v;
                        if let Some(l) = loaded.as_ref() {
                            l.sink.set_volume(v);
                        }
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(l) = loaded.as_ref() {
                            // Fade out gently before stopping.
                            fade_out_sink(&l.sink, volume, fade_out_ms);
                            l.sink.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    if !clock.is_running() {
                        continue;
                    }
                    let Some(l) = loaded.as_mut() else {
                        continue;
                    };

                    if l.sink.empty() {
                        if !l.ended {
                            l.ended = true;
                            clock.pause();
                            emit(MediaEvent::TimeUpdate(clock.elapsed()));
                            emit(MediaEvent::Ended);
                        }
                    } else {
                        emit(MediaEvent::TimeUpdate(clock.elapsed()));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        debug!("audio thread stopped");
    })
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

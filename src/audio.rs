//! Media playback: a small `<audio>`-like element backed by a `rodio` thread.
//!
//! The controller drives it through [`MediaElement`] and hears back through
//! [`MediaEvent`] notifications (position ticks, loaded duration, end of
//! track, failures).

mod clock;
mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{MediaElement, MediaEvent};

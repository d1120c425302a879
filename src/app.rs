//! Application module: the playback session and the controller that owns it.
//!
//! The `Session` model lives in `app::model`; `app::controller` turns user
//! actions and background notifications into session changes.

mod controller;
mod model;

pub use controller::*;
pub use model::*;

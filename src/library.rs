//! Library listing: turns the managed directory into an ordered track list.

mod model;
mod scan;

pub use model::Track;
pub use scan::{managed_dir, scan};

//! Storage bridge: owns every write and delete inside the managed directory.
//!
//! Requests travel to a dedicated thread over a channel and each one is
//! answered with a single [`StorageReply`]. The thread keeps no state besides
//! the filesystem itself.

mod bridge;
mod ops;
mod types;

pub use bridge::StorageBridge;
pub use types::{ImportItem, StorageReply};

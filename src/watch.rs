//! Change watcher: re-normalizes JSON files as they are added or modified.

mod events;
mod runtime;

pub use events::{ChangeEvent, WatchConfig};
pub use runtime::{StopHandle, WatchDaemon};

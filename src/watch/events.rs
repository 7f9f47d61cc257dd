//! Watch events and configuration.

use crate::tree::is_json_file_name;
use notify::{Event, EventKind};
use std::path::{Path, PathBuf};

/// Watch mode configuration
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Data directory to watch recursively
    pub data_dir: PathBuf,
    /// Delay before normalizing a changed file, letting writers finish
    pub settle_ms: u64,
    /// How often the loop checks the running flag while idle
    pub poll_interval_ms: u64,
    /// Normalize every file once before watching
    pub normalize_on_start: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            settle_ms: 500,
            poll_interval_ms: 200,
            normalize_on_start: true,
        }
    }
}

/// Filesystem change event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    Created(PathBuf),
    Modified(PathBuf),
}

impl ChangeEvent {
    /// Map a `notify` event to the changes the normalizer cares about.
    ///
    /// Renames report their destination as a creation. Removals and access
    /// events are dropped.
    pub fn from_notify(event: &Event) -> Option<ChangeEvent> {
        match event.kind {
            EventKind::Create(_) => event.paths.first().cloned().map(ChangeEvent::Created),
            EventKind::Modify(notify::event::ModifyKind::Name(_)) => {
                event.paths.last().cloned().map(ChangeEvent::Created)
            }
            EventKind::Modify(_) => event.paths.first().cloned().map(ChangeEvent::Modified),
            _ => None,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ChangeEvent::Created(p) | ChangeEvent::Modified(p) => p,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ChangeEvent::Created(_) => "created",
            ChangeEvent::Modified(_) => "modified",
        }
    }

    /// True when the event names a `.json` file.
    pub fn is_json(&self) -> bool {
        self.path()
            .file_name()
            .map(|name| is_json_file_name(&name.to_string_lossy()))
            .unwrap_or(false)
    }
}

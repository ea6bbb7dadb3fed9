//! Blueprint watcher for regeneration on save.
//!
//! # Responsibilities
//! - Notice saves of one blueprint file, including editors that save by
//!   writing a temporary file and renaming it over the original
//! - Collapse the burst of events a single save produces into one reload
//! - Hand validated blueprints to the caller; keep going after invalid ones
//!
//! # Design Decisions
//! - The parent directory is watched, not the file: a rename-save replaces the
//!   inode and a file watch would go silent after the first save
//! - Events are filtered on the blueprint's file name
//! - A reload happens once no event arrived for the settle period

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::loader::load_blueprint;
use crate::config::schema::Blueprint;

/// Quiet period after the last event before a blueprint is reloaded.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(200);

/// Watches a blueprint file and sends every valid new version.
pub struct BlueprintWatcher {
    path: PathBuf,
    settle: Duration,
    update_tx: Sender<Blueprint>,
}

impl BlueprintWatcher {
    /// Returns the watcher and the receiver of reloaded blueprints.
    pub fn new(path: &Path) -> (Self, Receiver<Blueprint>) {
        let (update_tx, update_rx) = mpsc::channel();
        (
            Self {
                path: path.to_path_buf(),
                settle: DEFAULT_SETTLE,
                update_tx,
            },
            update_rx,
        )
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Start watching. Updates stop once the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let file_name = self
            .path
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| notify::Error::generic("blueprint path has no file name"))?;
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (save_tx, save_rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_save_of(&event, &file_name) => {
                    let _ = save_tx.send(());
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Blueprint watch error"),
            },
            Config::default(),
        )?;
        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        let path = self.path.clone();
        let settle = self.settle;
        let updates = self.update_tx;
        thread::spawn(move || reload_settled(&path, settle, save_rx, updates));

        tracing::info!(path = %self.path.display(), directory = %directory.display(), "Watching blueprint");
        Ok(watcher)
    }
}

/// True when `event` creates or modifies the file called `file_name`.
fn is_save_of(event: &Event, file_name: &OsString) -> bool {
    (event.kind.is_create() || event.kind.is_modify())
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

/// Reload `path` once per burst of save signals until either side hangs up.
fn reload_settled(path: &Path, settle: Duration, saves: Receiver<()>, updates: Sender<Blueprint>) {
    while saves.recv().is_ok() {
        let mut coalesced = 1usize;
        loop {
            match saves.recv_timeout(settle) {
                Ok(()) => coalesced += 1,
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }

        match load_blueprint(path) {
            Ok(blueprint) => {
                tracing::info!(path = %path.display(), events = coalesced, "Blueprint reloaded");
                if updates.send(blueprint).is_err() {
                    return;
                }
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Blueprint reload failed, keeping last output");
            }
        }
    }
}

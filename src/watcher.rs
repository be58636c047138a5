//! Shader source watcher for watch mode
//!
//! Watches the source directory and reports debounced change notifications.

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, channel};
use std::time::{Duration, Instant};

/// Events from the source watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    /// A file in the source directory was created, modified or removed
    Changed(PathBuf),
}

/// Watches a shader source directory for changes
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<SourceEvent>,
    debounce: Debouncer,
}

impl SourceWatcher {
    /// Start watching `source_dir`
    pub fn new(source_dir: &Path, debounce: Duration) -> notify::Result<Self> {
        let (tx, rx) = channel();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
                        for path in event.paths {
                            let _ = tx.send(SourceEvent::Changed(path));
                        }
                    }
                }
                Err(e) => log::error!("Watch error: {:?}", e),
            }
        })?;

        watcher.watch(source_dir, RecursiveMode::NonRecursive)?;
        log::info!("Watching {:?} for shader changes", source_dir);

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            debounce: Debouncer::new(debounce),
        })
    }

    /// Block until a change arrives, then swallow the burst that follows it.
    ///
    /// Returns `None` if the watcher thread has gone away.
    pub fn wait(&mut self) -> Option<SourceEvent> {
        loop {
            let event = self.receiver.recv().ok()?;
            if self.debounce.accept(Instant::now()) {
                self.drain_burst();
                return Some(event);
            }
        }
    }

    /// Discard events arriving within the debounce window
    fn drain_burst(&mut self) {
        loop {
            match self.receiver.recv_timeout(self.debounce.window) {
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }
}

/// Drops events that arrive too soon after the last accepted one
#[derive(Debug, Clone)]
struct Debouncer {
    window: Duration,
    last: Option<Instant>,
}

impl Debouncer {
    fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last {
            if now.duration_since(last) < self.window {
                return false;
            }
        }
        self.last = Some(now);
        true
    }
}

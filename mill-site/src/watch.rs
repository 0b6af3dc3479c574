//! Polling file watcher for watch mode.
//!
//! A background thread snapshots the content tree's modification times on a
//! fixed interval and diffs consecutive snapshots into file events. Polling
//! is portable and good enough at site scale; the event vocabulary still
//! carries the rename variants for backends that can distinguish them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

use walkdir::WalkDir;

/// What happened to a watched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Added,
    Removed,
    Modified,
    /// A rename's source. The polling backend reports renames as
    /// `Removed` + `Added` instead.
    RenamedFrom,
    /// A rename's destination.
    RenamedTo,
}

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub poll_interval: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// Handle to a running watcher. Dropping it stops the listener thread.
pub struct Watcher {
    events: mpsc::Receiver<(FileAction, PathBuf)>,
    cancel: Arc<AtomicBool>,
    listener: Option<thread::JoinHandle<()>>,
}

const EVENT_QUEUE_BOUND: usize = 256;

fn snapshot(root: &Path) -> BTreeMap<PathBuf, SystemTime> {
    let mut files = BTreeMap::new();
    for item in WalkDir::new(root).into_iter().flatten() {
        if !item.file_type().is_file() {
            continue;
        }
        if let Ok(meta) = item.metadata() {
            if let Ok(modified) = meta.modified() {
                files.insert(item.path().to_path_buf(), modified);
            }
        }
    }
    files
}

/// Sends one event, waiting out a full queue unless cancelled.
fn send(
    tx: &SyncSender<(FileAction, PathBuf)>,
    cancel: &AtomicBool,
    interval: Duration,
    mut event: (FileAction, PathBuf),
) -> bool {
    loop {
        match tx.try_send(event) {
            Ok(()) => return true,
            Err(TrySendError::Full(e)) => {
                if cancel.load(Ordering::Relaxed) {
                    return false;
                }
                event = e;
                thread::sleep(interval);
            }
            Err(TrySendError::Disconnected(_)) => return false,
        }
    }
}

impl Watcher {
    /// Starts watching the tree under `root`.
    pub fn spawn(root: impl Into<PathBuf>, options: WatchOptions) -> Self {
        let root = root.into();
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::sync_channel(EVENT_QUEUE_BOUND);

        let listener = {
            let cancel = cancel.clone();
            let interval = options.poll_interval;
            thread::spawn(move || {
                let mut previous = snapshot(&root);
                while !cancel.load(Ordering::Relaxed) {
                    thread::sleep(interval);
                    if cancel.load(Ordering::Relaxed) {
                        break;
                    }
                    let current = snapshot(&root);

                    for (path, modified) in &current {
                        let event = match previous.remove(path) {
                            None => Some(FileAction::Added),
                            Some(before) if before != *modified => Some(FileAction::Modified),
                            Some(_) => None,
                        };
                        if let Some(action) = event {
                            if !send(&tx, &cancel, interval, (action, path.clone())) {
                                return;
                            }
                        }
                    }
                    // Whatever was not matched above no longer exists.
                    for (path, _) in std::mem::take(&mut previous) {
                        if !send(&tx, &cancel, interval, (FileAction::Removed, path)) {
                            return;
                        }
                    }

                    previous = current;
                }
            })
        };

        Self {
            events: rx,
            cancel,
            listener: Some(listener),
        }
    }

    /// Waits up to `wait` for the next event.
    pub fn poll(&self, wait: Duration) -> Option<(FileAction, PathBuf)> {
        match self.events.recv_timeout(wait) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Asks the listener to stop; it exits within one poll interval.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.cancel();
        if let Some(listener) = self.listener.take() {
            let _ = listener.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn wait_for(watcher: &Watcher, action: FileAction, path: &Path) {
        for _ in 0..100 {
            if let Some((a, p)) = watcher.poll(Duration::from_millis(100)) {
                if a == action && p == path {
                    return;
                }
            }
        }
        panic!("never saw {action:?} for {}", path.display());
    }

    #[test]
    fn reports_added_modified_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let watcher = Watcher::spawn(
            dir.path(),
            WatchOptions {
                poll_interval: Duration::from_millis(10),
            },
        );

        let file = dir.path().join("page.md");
        fs::write(&file, b"one").unwrap();
        wait_for(&watcher, FileAction::Added, &file);

        // Contents alone may not bump the mtime granularity; set it by hand.
        fs::write(&file, b"two").unwrap();
        let later = SystemTime::now() + Duration::from_secs(5);
        if fs::File::open(&file)
            .and_then(|f| f.set_modified(later))
            .is_ok()
        {
            wait_for(&watcher, FileAction::Modified, &file);
        }

        fs::remove_file(&file).unwrap();
        wait_for(&watcher, FileAction::Removed, &file);
    }

    #[test]
    fn cancel_stops_the_listener() {
        let dir = tempfile::tempdir().unwrap();
        let watcher = Watcher::spawn(dir.path(), WatchOptions::default());
        watcher.cancel();
        assert_eq!(watcher.poll(Duration::from_millis(50)), None);
    }
}

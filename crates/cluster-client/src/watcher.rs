use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{info, warn};

use crate::error::Result;
use crate::layout::parse_run_index;

/// Edge-triggered observer of the completion-signal directory.
///
/// The directory listing is snapshotted at construction; entries already
/// present never fire. This is intentional: the watcher reports only runs
/// that complete after it attaches (a caller that wants the pre-existing
/// ones can inspect [`CompletionWatcher::seen`]). Seen entries are recorded
/// permanently for the watcher's lifetime, so each run index fires at most
/// once even across repeated polls.
pub struct CompletionWatcher {
    signal_dir: PathBuf,
    seen: HashSet<String>,
}

impl CompletionWatcher {
    pub fn new(signal_dir: impl Into<PathBuf>) -> Result<Self> {
        let signal_dir = signal_dir.into();
        let seen = list_entries(&signal_dir)?;
        Ok(Self { signal_dir, seen })
    }

    /// Entry names observed so far, including the construction snapshot.
    pub fn seen(&self) -> &HashSet<String> {
        &self.seen
    }

    /// Re-list the signal directory and return the run index of every entry
    /// not seen before, each exactly once. Entries whose names do not parse
    /// as `run<i>` are skipped with a diagnostic and never reported again.
    pub fn poll(&mut self) -> Result<Vec<u32>> {
        let entries = list_entries(&self.signal_dir)?;
        let mut completed = Vec::new();

        for entry in entries {
            if self.seen.contains(&entry) {
                continue;
            }
            match parse_run_index(&entry) {
                Some(index) => {
                    info!(index, "run complete");
                    completed.push(index);
                }
                None => {
                    warn!(%entry, "ignoring unexpected entry in signal directory");
                }
            }
            self.seen.insert(entry);
        }

        completed.sort_unstable();
        Ok(completed)
    }

    /// Subscribe to filesystem-change notifications for the signal directory
    /// and deliver completion indices over a channel. The returned handle
    /// keeps the subscription alive; dropping it stops the watch.
    pub fn watch(self) -> Result<(WatchHandle, Receiver<u32>)> {
        let signal_dir = self.signal_dir.clone();
        let (sender, receiver) = mpsc::channel();
        let state = Arc::new(Mutex::new(self));

        let handler_state = Arc::clone(&state);
        let mut watcher =
            notify::recommended_watcher(move |event: notify::Result<Event>| {
                if let Err(error) = event {
                    warn!(%error, "signal directory watch event error");
                    return;
                }
                let Ok(mut watcher_state) = handler_state.lock() else {
                    warn!("completion watcher state poisoned");
                    return;
                };
                match watcher_state.poll() {
                    Ok(indices) => {
                        for index in indices {
                            let _ = sender.send(index);
                        }
                    }
                    Err(error) => warn!(%error, "failed to re-list signal directory"),
                }
            })?;
        watcher.watch(&signal_dir, RecursiveMode::NonRecursive)?;

        Ok((
            WatchHandle {
                _watcher: watcher,
                state,
            },
            receiver,
        ))
    }
}

/// Keeps a filesystem watch subscription alive.
pub struct WatchHandle {
    _watcher: RecommendedWatcher,
    state: Arc<Mutex<CompletionWatcher>>,
}

impl WatchHandle {
    /// Force a re-listing outside of filesystem events; returns any newly
    /// completed indices not yet delivered through the channel.
    pub fn poll(&self) -> Result<Vec<u32>> {
        let Ok(mut state) = self.state.lock() else {
            return Ok(Vec::new());
        };
        state.poll()
    }
}

fn list_entries(dir: &Path) -> Result<HashSet<String>> {
    let mut entries = HashSet::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        entries.insert(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn initial_snapshot_never_fires() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "run1");
        touch(dir.path(), "run2");

        let mut watcher = CompletionWatcher::new(dir.path()).unwrap();
        assert_eq!(watcher.poll().unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn new_entry_fires_exactly_once() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "run1");
        touch(dir.path(), "run2");

        let mut watcher = CompletionWatcher::new(dir.path()).unwrap();
        touch(dir.path(), "run3");

        assert_eq!(watcher.poll().unwrap(), vec![3]);
        // Unchanged snapshot: no further events.
        assert_eq!(watcher.poll().unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn several_new_entries_fire_together() {
        let dir = tempdir().unwrap();
        let mut watcher = CompletionWatcher::new(dir.path()).unwrap();

        touch(dir.path(), "run10");
        touch(dir.path(), "run4");
        assert_eq!(watcher.poll().unwrap(), vec![4, 10]);
    }

    #[test]
    fn non_conforming_entries_are_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        let mut watcher = CompletionWatcher::new(dir.path()).unwrap();

        touch(dir.path(), "signal_file");
        touch(dir.path(), "run8");
        assert_eq!(watcher.poll().unwrap(), vec![8]);
        // The junk entry is permanently seen, not re-reported.
        assert!(watcher.seen().contains("signal_file"));
        assert_eq!(watcher.poll().unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn missing_directory_is_an_error_at_construction() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nonexistent");
        assert!(CompletionWatcher::new(missing).is_err());
    }
}

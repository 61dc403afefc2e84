//! # Cluster Job Client
//!
//! Minimal file-based job protocol against a remote compute cluster:
//! submission drops an outline plus a signal file into a shared inbox,
//! completion is observed as new entries in an outbox signal directory, and
//! progress is recovered from partially-written run logs.
//!
//! The transport is a capability ([`RemoteStore`]); the real SSH-style
//! copy/exec mechanism lives outside this crate.

pub mod dispatch;
pub mod error;
pub mod layout;
pub mod progress;
pub mod store;
pub mod watcher;

pub use dispatch::JobDispatcher;
pub use error::{ClusterError, Result};
pub use layout::{parse_run_index, run_name, ClusterLayout};
pub use progress::{NoProgress, ProgressReader, PROGRESS_MARKER};
pub use store::{LocalStore, RemoteStore};
pub use watcher::{CompletionWatcher, WatchHandle};

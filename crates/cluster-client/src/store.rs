use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ClusterError, Result};

/// Capability to place and read files on the cluster's shared filesystem.
///
/// The real deployment backs this with an SSH-style copy/exec transport;
/// that transport lives outside this crate. [`LocalStore`] serves a cluster
/// root mounted (or synced) into the local filesystem and backs the tests.
///
/// All calls are synchronous and blocking; invoke them off any interactive
/// thread.
pub trait RemoteStore: Send {
    /// Write `bytes` to `relative` under the cluster root, replacing any
    /// existing file.
    fn put(&self, relative: &str, bytes: &[u8]) -> Result<()>;

    /// Read the full contents of a remote text file.
    fn read_to_string(&self, relative: &str) -> Result<String>;

    /// List the entry names of a remote directory.
    fn list_dir(&self, relative: &str) -> Result<Vec<String>>;

    /// Human-readable description of this store.
    fn description(&self) -> String;
}

/// Store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

impl RemoteStore for LocalStore {
    fn put(&self, relative: &str, bytes: &[u8]) -> Result<()> {
        let path = self.resolve(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ClusterError::Transfer {
                path: relative.to_string(),
                source,
            })?;
        }
        fs::write(&path, bytes).map_err(|source| ClusterError::Transfer {
            path: relative.to_string(),
            source,
        })
    }

    fn read_to_string(&self, relative: &str) -> Result<String> {
        fs::read_to_string(self.resolve(relative)).map_err(|source| ClusterError::Transfer {
            path: relative.to_string(),
            source,
        })
    }

    fn list_dir(&self, relative: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.resolve(relative))? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn description(&self) -> String {
        format!("Local cluster root: {}", self.root.display())
    }
}

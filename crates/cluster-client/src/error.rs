use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    /// A remote put/read failed. Submission is fire-and-forget: the caller
    /// decides whether to resubmit, no retry happens at this layer.
    #[error("Remote transfer failed for {path}: {source}")]
    Transfer {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Filesystem watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClusterError>;

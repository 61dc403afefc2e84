use silhouette::io::outline_to_string;
use silhouette::Outline;
use tracing::info;

use crate::error::Result;
use crate::layout::ClusterLayout;
use crate::store::RemoteStore;

/// Queues simulation jobs against the cluster inbox.
///
/// The presence of the keyed file in `inbox/` *is* the submission signal;
/// there is no acknowledgment message. At-most-once: a transfer error means
/// the submission did not happen and the caller must resubmit. Submitting an
/// index again overwrites the previous signal; no further idempotency is
/// provided.
pub struct JobDispatcher<S: RemoteStore> {
    store: S,
    layout: ClusterLayout,
}

impl<S: RemoteStore> JobDispatcher<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            layout: ClusterLayout::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serialize the transformed outline, publish it at the shared contour
    /// location, then drop the submission signal into the inbox.
    pub fn submit(&self, outline: &Outline, index: u32) -> Result<()> {
        let data = outline_to_string(outline);
        self.store
            .put(&self.layout.contour_file(), data.as_bytes())?;
        self.store
            .put(&self.layout.inbox_signal(index), data.as_bytes())?;
        info!(index, points = outline.len(), "queued run");
        Ok(())
    }
}

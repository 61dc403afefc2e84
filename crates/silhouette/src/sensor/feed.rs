use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::SystemTime;

use tracing::warn;

use crate::error::Result;
use crate::sensor::{FrameAcquirer, FrameSource};
use crate::types::{ColorFrame, DepthFrame};

/// One depth+color capture taken in the same acquisition pass.
#[derive(Debug, Clone)]
pub struct FramePair {
    pub depth: DepthFrame,
    pub color: ColorFrame,
    pub captured_at: SystemTime,
}

/// Continuous acquisition on a dedicated thread.
///
/// The thread owns the device capability exclusively and publishes the most
/// recent capture into a shared slot; consumers read the slot without ever
/// blocking the producer. Capture errors are logged and the previous frame
/// stays published.
pub struct FrameFeed {
    latest: Arc<Mutex<Option<FramePair>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FrameFeed {
    pub fn spawn<S>(mut acquirer: FrameAcquirer<S>) -> Self
    where
        S: FrameSource + Send + 'static,
    {
        let latest = Arc::new(Mutex::new(None));
        let stop = Arc::new(AtomicBool::new(false));

        let slot = Arc::clone(&latest);
        let stop_flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                match capture_pair(&mut acquirer) {
                    Ok(pair) => {
                        if let Ok(mut guard) = slot.lock() {
                            *guard = Some(pair);
                        }
                    }
                    Err(error) => {
                        warn!(%error, "frame acquisition failed, keeping previous frame");
                    }
                }
            }
        });

        Self {
            latest,
            stop,
            handle: Some(handle),
        }
    }

    /// Most recent published capture, if any pass has completed yet.
    pub fn latest(&self) -> Option<FramePair> {
        self.latest.lock().ok().and_then(|guard| guard.clone())
    }

    /// Signal the acquisition thread to stop and wait for it to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("acquisition thread panicked during shutdown");
            }
        }
    }
}

impl Drop for FrameFeed {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn capture_pair<S: FrameSource>(acquirer: &mut FrameAcquirer<S>) -> Result<FramePair> {
    let depth = acquirer.depth()?;
    let color = acquirer.video()?;
    Ok(FramePair {
        depth,
        color,
        captured_at: SystemTime::now(),
    })
}

//! Trailing-edge debounce for durable writes.
//!
//! Each [`Debouncer::request`] restarts the quiet period; the flush callback runs
//! once the period passes without a new request. Requests arriving while a flush
//! runs are remembered and produce another flush afterwards. The callback runs on
//! the blocking thread pool, so it may do synchronous file I/O.
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{runtime::Handle, sync::Notify, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

use crate::error::HostIoError;

/// Background task that coalesces save requests.
///
/// Dropping the debouncer cancels the task; a pending flush is then lost.
/// Call [`Debouncer::shutdown`] and flush explicitly to avoid that.
#[derive(Debug)]
pub struct Debouncer {
    notify: Arc<Notify>,
    token: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Spawn the worker on the current tokio runtime.
    pub fn spawn<F>(delay: Duration, flush: F) -> Result<Self, HostIoError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| HostIoError::NoRuntime)?;
        let notify = Arc::new(Notify::new());
        let token = CancellationToken::new();

        let handle = runtime.spawn(run(notify.clone(), token.clone(), delay, flush));
        debug!(delay_ms = delay.as_millis() as u64, "save debouncer started");

        Ok(Self {
            notify,
            token,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Ask for a flush after the quiet period.
    pub fn request(&self) {
        trace!("save requested");
        self.notify.notify_one();
    }

    /// Stop the worker and wait for it to exit. Pending requests are dropped.
    pub async fn shutdown(&self) {
        self.token.cancel();
        let handle = self.handle.lock().ok().and_then(|mut h| h.take());
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!(error = %e, "save debouncer task failed");
            }
        }
        debug!("save debouncer stopped");
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run<F>(notify: Arc<Notify>, token: CancellationToken, delay: Duration, flush: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let flush = Arc::new(flush);
    loop {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = notify.notified() => {}
        }

        loop {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = notify.notified() => continue,
                _ = tokio::time::sleep(delay) => break,
            }
        }

        trace!("quiet period elapsed; flushing");
        let flush = Arc::clone(&flush);
        if let Err(e) = tokio::task::spawn_blocking(move || flush()).await {
            error!(error = %e, "save flush panicked");
        }
    }
}

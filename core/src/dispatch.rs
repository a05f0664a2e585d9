//! Callback and channel delivery of facade results.
//!
//! A UI-side caller that cannot `.await` directly launches facade
//! operations through a [`CallScope`]. The scope spawns the operation on the
//! runtime it was created with and delivers exactly one `ApiResult` per
//! operation, unless the scope is torn down first, in which case the result
//! is dropped. Teardown does not abort the in-flight request.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::ApiResult;

/// Lifetime of a caller (a screen, a dialog) that receives results.
#[derive(Debug)]
pub struct CallScope {
    handle: Handle,
    alive: Arc<AtomicBool>,
}

impl CallScope {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Scope bound to the runtime of the calling task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    pub fn is_active(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Stop delivering results. Operations already running finish silently.
    pub fn cancel(&self) {
        self.alive.store(false, Ordering::Release);
    }

    /// Run `operation` and hand its result to `on_complete`.
    pub fn launch<T, F, C>(&self, operation: F, on_complete: C) -> JoinHandle<()>
    where
        T: Send + 'static,
        F: Future<Output = ApiResult<T>> + Send + 'static,
        C: FnOnce(ApiResult<T>) + Send + 'static,
    {
        let alive = Arc::clone(&self.alive);
        self.handle.spawn(async move {
            let result = operation.await;
            if alive.load(Ordering::Acquire) {
                on_complete(result);
            } else {
                tracing::debug!("call scope closed, dropping result");
            }
        })
    }

    /// Run `operation` and deliver its result over a oneshot channel. The
    /// sender is dropped without a value if the scope closes first.
    pub fn request<T, F>(&self, operation: F) -> oneshot::Receiver<ApiResult<T>>
    where
        T: Send + 'static,
        F: Future<Output = ApiResult<T>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.launch(operation, move |result| {
            // The receiver may already be gone; nothing to deliver to then.
            let _ = tx.send(result);
        });
        rx
    }
}

impl Drop for CallScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

//! Background dataset loading.
//!
//! The fetch is the only blocking step of the pipeline. [`BackgroundFetch`]
//! runs it (plus normalization) on a worker thread so an interactive front
//! end can keep responding, and hands the finished [`Session`] back when the
//! caller polls.

use crate::app::Session;
use crate::data::{FetchError, Fetcher};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::JoinHandle;

/// Result delivered by a background load
pub type LoadResult = Result<Session, FetchError>;

/// A dataset load running on its own thread
pub struct BackgroundFetch {
    receiver: Mutex<Receiver<LoadResult>>,
    handle: Option<JoinHandle<()>>,
    /// Set once a result (or the failure standing in for one) has been taken
    delivered: AtomicBool,
}

impl BackgroundFetch {
    /// Start loading on a new thread
    pub fn spawn(fetcher: Arc<Fetcher>) -> Self {
        let (sender, receiver) = mpsc::channel();
        let handle = std::thread::Builder::new()
            .name("countryboard-fetch".into())
            .spawn(move || {
                let result = Session::load(&fetcher);
                if sender.send(result).is_err() {
                    tracing::debug!("background: receiver dropped before load finished");
                }
            })
            .map_err(|e| tracing::error!("Failed to spawn fetch thread: {}", e))
            .ok();

        Self {
            receiver: Mutex::new(receiver),
            handle,
            delivered: AtomicBool::new(false),
        }
    }

    /// Take the result if the load has finished.
    ///
    /// Returns `None` while the load is running and after the result has
    /// already been taken. A worker that never ran or died without sending
    /// is reported as a failed load, once.
    pub fn poll(&self) -> Option<LoadResult> {
        match self.receiver.lock().try_recv() {
            Ok(result) => {
                self.delivered.store(true, Ordering::Release);
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                let exited = self.handle.as_ref().is_none_or(JoinHandle::is_finished);
                if exited && !self.delivered.swap(true, Ordering::AcqRel) {
                    tracing::warn!("background: worker exited without a result");
                    Some(spawn_failed())
                } else {
                    None
                }
            }
        }
    }

    /// Block until the load finishes
    pub fn wait(mut self) -> LoadResult {
        let result = self.receiver.lock().recv().unwrap_or_else(|_| spawn_failed());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        result
    }

    /// Whether the worker thread has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

fn spawn_failed() -> LoadResult {
    Err(FetchError::ConnectionFailed("background fetch ended without a result".into()))
}

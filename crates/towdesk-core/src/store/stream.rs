// ── Reactive state streams ──
//
// Subscription types for consuming state changes from an `EntityStore`.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::EntityState;

/// A subscription to one entity store's state.
///
/// Provides point-in-time snapshot access and change notification via
/// [`changed()`](Self::changed) or by converting into a `Stream`.
pub struct StateStream<T: Clone + Send + Sync + 'static> {
    current: Arc<EntityState<T>>,
    receiver: watch::Receiver<Arc<EntityState<T>>>,
}

impl<T: Clone + Send + Sync + 'static> StateStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<Arc<EntityState<T>>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation (or at the last `changed()`).
    pub fn current(&self) -> &Arc<EntityState<T>> {
        &self.current
    }

    /// The latest snapshot, which may have moved on since creation.
    pub fn latest(&self) -> Arc<EntityState<T>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change and return the new snapshot.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<EntityState<T>>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> StateWatchStream<T> {
        StateWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the current state first, then a snapshot after every change.
pub struct StateWatchStream<T: Clone + Send + Sync + 'static> {
    inner: WatchStream<Arc<EntityState<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Stream for StateWatchStream<T> {
    type Item = Arc<EntityState<T>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

//! Invalidate-and-refetch state cell.
//!
//! A change event never patches a slice in place; it marks it stale and the
//! owner re-queries a full snapshot. The cell is the single-writer half of a
//! `tokio::sync::watch` pair; any number of readers observe the latest value.

use tokio::sync::watch;

/// Single-writer state slice backed by a watch channel
#[derive(Debug)]
pub struct StaleCell<T> {
    tx: watch::Sender<T>,
}

impl<T> StaleCell<T> {
    /// Create a cell with its initial snapshot and a reader handle
    pub fn new(initial: T) -> (Self, watch::Receiver<T>) {
        let (tx, rx) = watch::channel(initial);
        (Self { tx }, rx)
    }

    /// Replace the snapshot. Readers that lost interest are fine; the value
    /// is stored either way.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Get another reader handle
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Re-query the snapshot via `fetch` and store the result.
    ///
    /// On error the previous snapshot stays in place and the error is
    /// returned for the caller to log; the slice is then simply stale until
    /// the next invalidation.
    pub async fn refresh<F, Fut, E>(&self, fetch: F) -> Result<(), E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        let value = fetch().await?;
        self.tx.send_replace(value);
        Ok(())
    }
}

//! Crawl frontier: the pending-URL queue plus its outstanding-work counter
//!
//! The counter is the crawl's termination signal. It is incremented on every
//! enqueue, before the URL becomes visible to workers, and decremented only
//! when a worker acknowledges an item, which happens after every URL that item
//! discovered has itself been enqueued. The counter therefore reaches zero
//! only when the queue is empty and no worker holds unacknowledged work.

use tokio::sync::{mpsc, watch, Mutex};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Work queue shared by the coordinator and every fetch worker
pub struct Frontier {
    sender: mpsc::UnboundedSender<Url>,
    receiver: Mutex<mpsc::UnboundedReceiver<Url>>,
    outstanding: watch::Sender<usize>,
    stop: CancellationToken,
}

impl Frontier {
    /// Creates an empty, open frontier
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (outstanding, _) = watch::channel(0);

        Self {
            sender,
            receiver: Mutex::new(receiver),
            outstanding,
            stop: CancellationToken::new(),
        }
    }

    /// Adds a URL to the queue and counts it as outstanding work
    ///
    /// Never blocks. Deduplication is the caller's job.
    pub fn enqueue(&self, url: Url) {
        self.outstanding.send_modify(|count| *count += 1);

        if let Err(mpsc::error::SendError(url)) = self.sender.send(url) {
            self.outstanding
                .send_modify(|count| *count = count.saturating_sub(1));
            tracing::warn!("frontier receiver gone, dropping {}", url);
        }
    }

    /// Waits for the next URL
    ///
    /// Returns `None` once the frontier has been closed, even if the caller
    /// was already blocked waiting. Items still queued at that point are never
    /// handed out.
    pub async fn dequeue(&self) -> Option<Url> {
        tokio::select! {
            biased;
            _ = self.stop.cancelled() => None,
            url = self.next_url() => url,
        }
    }

    async fn next_url(&self) -> Option<Url> {
        self.receiver.lock().await.recv().await
    }

    /// Marks one dequeued item as fully processed
    ///
    /// Must be called after the item's follow-up URLs have been enqueued.
    pub fn acknowledge(&self) {
        self.outstanding.send_modify(|count| {
            debug_assert!(*count > 0, "acknowledge without outstanding work");
            *count = count.saturating_sub(1);
        });
    }

    /// Number of enqueued items not yet acknowledged
    pub fn outstanding(&self) -> usize {
        *self.outstanding.borrow()
    }

    /// Waits until no outstanding work remains
    ///
    /// Returns immediately if the counter is already zero.
    pub async fn await_drained(&self) {
        let mut outstanding = self.outstanding.subscribe();
        if outstanding.wait_for(|count| *count == 0).await.is_err() {
            tracing::warn!("frontier counter closed while waiting for drain");
        }
    }

    /// Stops the frontier: every current and future `dequeue` returns `None`
    pub fn close(&self) {
        self.stop.cancel();
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::errors::CoreError;

/// One immutable, wholesale replacement of a polled collection.
///
/// `seq` is the sequence number of the tick that produced it. Consumers
/// must not assume item identity survives across snapshots — every
/// successful tick publishes a brand new one.
pub struct Snapshot<T> {
    seq: u64,
    items: Arc<Vec<T>>,
}

impl<T> Snapshot<T> {
    pub fn empty() -> Self {
        Self {
            seq: 0,
            items: Arc::new(Vec::new()),
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn items(&self) -> &Arc<Vec<T>> {
        &self.items
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            seq: self.seq,
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> std::fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("seq", &self.seq)
            .field("len", &self.items.len())
            .finish()
    }
}

/// Single-writer, multi-reader store for one polled collection.
///
/// Writers are the polling loop (via `begin_tick` + `apply`) and local
/// optimistic mutations (via `mutate`). Replacement is guarded by sequence
/// number: a fixed-interval timer cannot guarantee at most one request in
/// flight, so each outbound request is tagged with a monotonically
/// increasing tick id and `apply` rejects anything at or below the last
/// applied id. A slow early request that completes after a fast later one
/// therefore cannot clobber the fresher data.
///
/// Readers take cheap `Arc` snapshots (`latest`) or follow updates through
/// a `watch` subscription; either way they see immutable data and never
/// contend with the writer.
pub struct SnapshotStore<T> {
    tx: watch::Sender<Snapshot<T>>,
    next_seq: AtomicU64,
}

impl<T> SnapshotStore<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Snapshot::empty());
        Self {
            tx,
            next_seq: AtomicU64::new(1),
        }
    }

    /// Reserve the sequence number for a tick that is about to fetch.
    pub fn begin_tick(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Publish a fetched snapshot. Returns false (and changes nothing) if a
    /// tick with a higher or equal sequence number already published.
    pub fn apply(&self, seq: u64, items: Vec<T>) -> bool {
        self.tx.send_if_modified(|snapshot| {
            if seq <= snapshot.seq {
                return false;
            }
            *snapshot = Snapshot {
                seq,
                items: Arc::new(items),
            };
            true
        })
    }

    /// Replace the snapshot with a locally derived one (e.g. optimistic
    /// deletion), under a freshly reserved sequence number so that any
    /// response still in flight from an earlier tick cannot overwrite it.
    pub fn mutate(&self, f: impl FnOnce(&[T]) -> Vec<T>) {
        self.tx.send_modify(|snapshot| {
            let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
            let items = f(&snapshot.items);
            *snapshot = Snapshot {
                seq,
                items: Arc::new(items),
            };
        });
    }

    /// The current snapshot's items, cheaply cloned.
    pub fn latest(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.tx.borrow().items)
    }

    /// Sequence number of the last applied snapshot (0 before any apply).
    pub fn last_seq(&self) -> u64 {
        self.tx.borrow().seq
    }

    /// Follow snapshot replacements as they happen.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.tx.subscribe()
    }
}

impl<T> Default for SnapshotStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SnapshotStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("snapshot", &*self.tx.borrow())
            .finish()
    }
}

/// Handle to a running polling loop. Stopping halts the schedule and causes
/// any in-flight response to be discarded on arrival; it is idempotent and
/// also triggered by `Drop`, so a handle going out of scope on view
/// teardown cannot leak its timer.
pub struct PollHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop.borrow()
    }

    /// Whether the loop task has fully wound down.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        let _ = self.stop.send(true);
    }
}

impl std::fmt::Debug for PollHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollHandle")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

/// Start a fixed-period polling loop that keeps `store` fresh with the
/// results of `fetch`.
///
/// The first tick fires immediately, then one per `period`, unconditionally
/// — the fixed re-invocation is the only retry mechanism. A failed tick is
/// logged and swallowed, leaving the previous snapshot in place
/// (stale-but-available). Ticks may overlap if a request outlives the
/// period; each runs concurrently and publishes through the store's
/// sequence guard, so application order follows tick initiation order, not
/// raw completion order.
pub fn spawn_poller<T, F, Fut>(
    store: Arc<SnapshotStore<T>>,
    period: Duration,
    fetch: F,
) -> PollHandle
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Vec<T>, CoreError>> + Send + 'static,
{
    let (stop_tx, stop_rx) = watch::channel(false);
    let task = tokio::spawn(poll_loop(store, period, fetch, stop_rx));
    PollHandle {
        stop: stop_tx,
        task,
    }
}

async fn poll_loop<T, F, Fut>(
    store: Arc<SnapshotStore<T>>,
    period: Duration,
    fetch: F,
    mut stop: watch::Receiver<bool>,
) where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Vec<T>, CoreError>> + Send + 'static,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = stop.changed() => break,
            _ = ticker.tick() => {}
        }
        if *stop.borrow() {
            break;
        }

        let seq = store.begin_tick();
        let request = fetch();
        let store = Arc::clone(&store);
        let stop = stop.clone();
        tokio::spawn(async move {
            match request.await {
                Ok(items) => {
                    if *stop.borrow() {
                        tracing::debug!(seq, "dropping response that arrived after teardown");
                        return;
                    }
                    if !store.apply(seq, items) {
                        tracing::debug!(seq, "discarding response superseded by a later tick");
                    }
                }
                Err(e) => {
                    tracing::debug!(seq, error = %e, "tick failed; keeping previous snapshot");
                }
            }
        });
    }
}

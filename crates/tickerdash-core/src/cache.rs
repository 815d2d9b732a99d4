//! Per-ticker series cache.
//!
//! Holds the latest [`SeriesResult`] for exactly the selected tickers. Each
//! fetch carries a ticket; a completion is written only if its ticket is still
//! the entry's current one, so superseded and deselected fetches are dropped.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::source::{SeriesRequest, SeriesSource};
use crate::window::resolve;
use crate::{SeriesResult, SeriesStatus, Symbol, TimeRange, UtcDateTime};

#[derive(Debug)]
struct Entry {
    request: SeriesRequest,
    ticket: u64,
    result: SeriesResult,
    task: Option<AbortHandle>,
}

impl Entry {
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<Symbol, Entry>,
    next_ticket: u64,
    version: u64,
}

struct Shared {
    inner: Mutex<CacheInner>,
    tx_updates: watch::Sender<u64>,
}

impl Shared {
    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner> {
        self.inner.lock().expect("series cache lock is not poisoned")
    }

    fn publish(&self, inner: &mut CacheInner) {
        inner.version += 1;
        self.tx_updates.send_replace(inner.version);
    }

    /// Writes a completed fetch if `ticket` is still current for `symbol`.
    fn complete(&self, symbol: &Symbol, ticket: u64, result: SeriesResult) -> bool {
        let mut inner = self.lock();
        let Some(entry) = inner.entries.get_mut(symbol) else {
            debug!(symbol = %symbol, ticket, "discarding result for deselected ticker");
            return false;
        };
        if entry.ticket != ticket {
            debug!(
                symbol = %symbol,
                ticket,
                current = entry.ticket,
                "discarding superseded result"
            );
            return false;
        }

        entry.task = None;
        if let Some(reason) = result.failure_reason() {
            warn!(symbol = %symbol, reason, "series fetch failed");
        }
        if entry.result == result {
            return true;
        }

        entry.result = result;
        self.publish(&mut inner);
        true
    }
}

/// Immutable view of the cache at one version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheSnapshot {
    pub version: u64,
    entries: HashMap<Symbol, SeriesResult>,
}

impl CacheSnapshot {
    pub fn get(&self, symbol: &Symbol) -> Option<&SeriesResult> {
        self.entries.get(symbol)
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_pending(&self) -> bool {
        self.entries.values().any(SeriesResult::is_pending)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.entries.keys()
    }
}

/// Tickers touched by one reconcile pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub fetched: Vec<Symbol>,
    pub pruned: Vec<Symbol>,
}

impl SyncOutcome {
    pub fn is_noop(&self) -> bool {
        self.fetched.is_empty() && self.pruned.is_empty()
    }
}

/// Owner of the ticker -> series mapping. Live fetches are spawned on the
/// current Tokio runtime.
pub struct SeriesCache {
    shared: Arc<Shared>,
    source: Arc<dyn SeriesSource>,
}

impl SeriesCache {
    pub fn new(source: Arc<dyn SeriesSource>) -> Self {
        let (tx_updates, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(CacheInner::default()),
                tx_updates,
            }),
            source,
        }
    }

    /// Reconciles the cache with `selection` and `range`.
    ///
    /// Deselected tickers are removed and their fetches cancelled. A fetch is
    /// started only for tickers that are new or whose range changed; others
    /// keep their entry untouched.
    pub fn sync(&self, selection: &[Symbol], range: TimeRange, now: UtcDateTime) -> SyncOutcome {
        self.reconcile(selection, range, now, false)
    }

    /// Like [`sync`](Self::sync) but re-fetches every selected ticker against `now`.
    pub fn refresh(&self, selection: &[Symbol], range: TimeRange, now: UtcDateTime) -> SyncOutcome {
        self.reconcile(selection, range, now, true)
    }

    fn reconcile(
        &self,
        selection: &[Symbol],
        range: TimeRange,
        now: UtcDateTime,
        force: bool,
    ) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();
        let mut inner = self.shared.lock();

        let selected = selection.iter().collect::<HashSet<_>>();
        let stale = inner
            .entries
            .keys()
            .filter(|symbol| !selected.contains(symbol))
            .cloned()
            .collect::<Vec<_>>();
        for symbol in stale {
            if let Some(mut entry) = inner.entries.remove(&symbol) {
                entry.cancel();
                debug!(symbol = %symbol, "pruned deselected ticker");
            }
            outcome.pruned.push(symbol);
        }

        let window = resolve(range, now);
        let mut seen = HashSet::with_capacity(selection.len());
        let distinct = selection.iter().filter(|symbol| seen.insert(*symbol));
        for (slot, symbol) in distinct.enumerate() {
            let up_to_date = inner
                .entries
                .get(symbol)
                .is_some_and(|entry| entry.request.range == range);
            if up_to_date && !force {
                continue;
            }

            let request = SeriesRequest {
                symbol: symbol.clone(),
                range,
                window,
                slot,
            };
            self.start_fetch(&mut inner, request);
            outcome.fetched.push(symbol.clone());
        }

        if !outcome.is_noop() {
            self.shared.publish(&mut inner);
        }
        outcome
    }

    fn start_fetch(&self, inner: &mut CacheInner, request: SeriesRequest) {
        inner.next_ticket += 1;
        let ticket = inner.next_ticket;
        let symbol = request.symbol.clone();

        if let Some(mut previous) = inner.entries.remove(&symbol) {
            previous.cancel();
        }

        debug!(
            symbol = %symbol,
            ticket,
            range = %request.range,
            resolution = request.window.resolution.as_str(),
            "fetching series"
        );

        if let Some(result) = self.source.fetch_now(&request) {
            inner.entries.insert(
                symbol,
                Entry {
                    request,
                    ticket,
                    result,
                    task: None,
                },
            );
            return;
        }

        let shared = Arc::clone(&self.shared);
        let source = Arc::clone(&self.source);
        let task_request = request.clone();
        let task_symbol = symbol.clone();
        let handle = tokio::spawn(async move {
            let result = source.fetch(task_request).await;
            shared.complete(&task_symbol, ticket, result);
        });

        inner.entries.insert(
            symbol,
            Entry {
                request,
                ticket,
                result: SeriesResult::Pending,
                task: Some(handle.abort_handle()),
            },
        );
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        let inner = self.shared.lock();
        CacheSnapshot {
            version: inner.version,
            entries: inner
                .entries
                .iter()
                .map(|(symbol, entry)| (symbol.clone(), entry.result.clone()))
                .collect(),
        }
    }

    pub fn version(&self) -> u64 {
        self.shared.lock().version
    }

    pub fn get(&self, symbol: &Symbol) -> Option<SeriesResult> {
        self.shared
            .lock()
            .entries
            .get(symbol)
            .map(|entry| entry.result.clone())
    }

    pub fn status(&self, symbol: &Symbol) -> Option<SeriesStatus> {
        self.shared
            .lock()
            .entries
            .get(symbol)
            .map(|entry| entry.result.status())
    }

    /// The request an entry currently reflects.
    pub fn request_for(&self, symbol: &Symbol) -> Option<SeriesRequest> {
        self.shared
            .lock()
            .entries
            .get(symbol)
            .map(|entry| entry.request.clone())
    }

    pub fn len(&self) -> usize {
        self.shared.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.lock().entries.is_empty()
    }

    /// Receives the cache version after every visible change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.tx_updates.subscribe()
    }

    /// Waits until no entry is pending and returns that snapshot.
    pub async fn settled(&self) -> CacheSnapshot {
        let mut rx = self.subscribe();
        loop {
            let snapshot = self.snapshot();
            if !snapshot.has_pending() {
                return snapshot;
            }
            if rx.changed().await.is_err() {
                return self.snapshot();
            }
        }
    }
}

impl Drop for SeriesCache {
    fn drop(&mut self) {
        let mut inner = self
            .shared
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for entry in inner.entries.values_mut() {
            entry.cancel();
        }
    }
}

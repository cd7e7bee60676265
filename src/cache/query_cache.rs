use crate::api::{ApiError, ApiResult};
use crate::cache::CacheKey;
use futures::channel::oneshot;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub(crate) type SubscriptionId = u64;

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Entries kept before the least recently used idle ones are evicted.
const DEFAULT_MAX_ENTRIES: usize = 64;

/// Where a cached query is in its lifecycle.
///
/// `Success`/`Error` only go back to `Fetching` when the key is requested
/// again after invalidation (or, for `Error`, when a view re-activates it).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum QueryPhase {
    Idle,
    Fetching,
    Success,
    Error,
}

/// Point-in-time copy of one cache entry.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct QuerySnapshot<V> {
    pub data: Option<V>,
    pub error: Option<ApiError>,
    pub is_fetching: bool,
    pub is_stale: bool,
    /// Id of the attempt that produced `data`/`error`; 0 if nothing settled yet.
    pub attempt: u64,
}

impl<V> Default for QuerySnapshot<V> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_fetching: false,
            is_stale: false,
            attempt: 0,
        }
    }
}

impl<V> QuerySnapshot<V> {
    pub(crate) fn phase(&self) -> QueryPhase {
        if self.is_fetching {
            QueryPhase::Fetching
        } else if self.error.is_some() {
            QueryPhase::Error
        } else if self.data.is_some() {
            QueryPhase::Success
        } else {
            QueryPhase::Idle
        }
    }
}

struct Entry<V> {
    data: Option<V>,
    error: Option<ApiError>,
    settled_attempt: u64,
    /// Attempt that currently owns the entry. Results of any other attempt
    /// are dropped on arrival.
    in_flight: Option<u64>,
    stale: bool,
    waiters: Vec<oneshot::Sender<ApiResult<V>>>,
    last_used: u64,
}

impl<V> Default for Entry<V> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            settled_attempt: 0,
            in_flight: None,
            stale: false,
            waiters: Vec::new(),
            last_used: 0,
        }
    }
}

impl<V: Clone> Entry<V> {
    fn snapshot(&self) -> QuerySnapshot<V> {
        QuerySnapshot {
            data: self.data.clone(),
            error: self.error.clone(),
            is_fetching: self.in_flight.is_some(),
            is_stale: self.stale,
            attempt: self.settled_attempt,
        }
    }
}

enum Plan<V> {
    Fresh(V),
    Join(oneshot::Receiver<ApiResult<V>>),
    Lead(u64),
}

struct Inner<K, V> {
    entries: HashMap<K, Entry<V>>,
    max_entries: usize,
    /// Logical clock for `Entry::last_used`.
    clock: u64,
    last_attempt: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    last_listener: SubscriptionId,
}

impl<K: CacheKey, V: Clone> Inner<K, V> {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn plan(&mut self, key: &K) -> Plan<V> {
        let now = self.tick();
        let entry = self.entries.entry(key.clone()).or_default();
        entry.last_used = now;

        if entry.in_flight.is_some() && !entry.stale {
            let (tx, rx) = oneshot::channel();
            entry.waiters.push(tx);
            return Plan::Join(rx);
        }

        if entry.in_flight.is_none() && !entry.stale && entry.error.is_none() {
            if let Some(data) = &entry.data {
                return Plan::Fresh(data.clone());
            }
        }

        self.last_attempt += 1;
        entry.in_flight = Some(self.last_attempt);
        entry.stale = false;
        let attempt = self.last_attempt;

        self.evict_idle();
        Plan::Lead(attempt)
    }

    /// Drop least recently used entries over `max_entries`. Entries with a
    /// request in flight are never evicted.
    fn evict_idle(&mut self) {
        while self.entries.len() > self.max_entries {
            let victim = self
                .entries
                .iter()
                .filter(|(_, e)| e.in_flight.is_none() && e.waiters.is_empty())
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone());

            match victim {
                Some(key) => {
                    tracing::debug!(?key, "evicting cached query");
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

/// Clears the entry's in-flight marker if the leading fetch is dropped
/// before it settles, so joined callers are released and the key can be
/// fetched again.
struct AbandonOnDrop<'a, K: CacheKey, V: Clone> {
    cache: &'a QueryCache<K, V>,
    key: &'a K,
    attempt: u64,
    armed: bool,
}

impl<K: CacheKey, V: Clone> Drop for AbandonOnDrop<'_, K, V> {
    fn drop(&mut self) {
        if self.armed {
            self.cache.abandon(self.key, self.attempt);
        }
    }
}

/// Read-through cache of remote query results.
///
/// Cloning yields another handle to the same cache. All mutation happens
/// under a short lock that is never held across an `.await`.
pub(crate) struct QueryCache<K, V> {
    inner: Arc<Mutex<Inner<K, V>>>,
}

impl<K, V> Clone for QueryCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: CacheKey, V: Clone> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: CacheKey, V: Clone> QueryCache<K, V> {
    pub(crate) fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    pub(crate) fn with_max_entries(max_entries: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                max_entries: max_entries.max(1),
                clock: 0,
                last_attempt: 0,
                listeners: Vec::new(),
                last_listener: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve `key`, calling `fetcher` only when no fresh value and no
    /// in-flight request exist for it.
    ///
    /// Concurrent callers for the same key share a single `fetcher` call and
    /// all receive its result.
    pub(crate) async fn fetch<F, Fut>(&self, key: K, fetcher: F) -> ApiResult<V>
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = ApiResult<V>>,
    {
        let plan = self.lock().plan(&key);

        match plan {
            Plan::Fresh(data) => Ok(data),
            Plan::Join(rx) => rx.await.unwrap_or(Err(ApiError::Dropped)),
            Plan::Lead(attempt) => {
                self.notify();
                tracing::debug!(?key, attempt, "query fetch started");

                let mut guard = AbandonOnDrop {
                    cache: self,
                    key: &key,
                    attempt,
                    armed: true,
                };
                let result = fetcher(key.clone()).await;
                guard.armed = false;
                self.settle(&key, attempt, &result);
                result
            }
        }
    }

    /// Warm `key` ahead of the first render that needs it.
    pub(crate) async fn prefetch<F, Fut>(&self, key: K, fetcher: F)
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = ApiResult<V>>,
    {
        if let Err(e) = self.fetch(key.clone(), fetcher).await {
            tracing::warn!(?key, error = %e, "prefetch failed");
        }
    }

    fn settle(&self, key: &K, attempt: u64, result: &ApiResult<V>) {
        let waiters = {
            let mut inner = self.lock();
            let Some(entry) = inner.entries.get_mut(key) else {
                return;
            };

            if entry.in_flight != Some(attempt) {
                tracing::debug!(?key, attempt, "discarding superseded query result");
                return;
            }

            entry.in_flight = None;
            entry.settled_attempt = attempt;
            match result {
                Ok(data) => {
                    entry.data = Some(data.clone());
                    entry.error = None;
                }
                Err(e) => {
                    tracing::warn!(?key, attempt, error = %e, "query fetch failed");
                    entry.error = Some(e.clone());
                }
            }
            std::mem::take(&mut entry.waiters)
        };

        for waiter in waiters {
            let _ = waiter.send(result.clone());
        }
        self.notify();
    }

    /// Current state of `key`. Also counts as a use for eviction.
    pub(crate) fn snapshot(&self, key: &K) -> QuerySnapshot<V> {
        let mut inner = self.lock();
        let now = inner.tick();
        inner
            .entries
            .get_mut(key)
            .map(|e| {
                e.last_used = now;
                e.snapshot()
            })
            .unwrap_or_default()
    }

    /// The leader of `attempt` went away without a result. Its joiners get
    /// `ApiError::Dropped` and the entry is left stale for the next fetch.
    fn abandon(&self, key: &K, attempt: u64) {
        let released = {
            let mut inner = self.lock();
            let Some(entry) = inner.entries.get_mut(key) else {
                return;
            };
            if entry.in_flight != Some(attempt) {
                return;
            }
            entry.in_flight = None;
            entry.stale = true;
            std::mem::take(&mut entry.waiters)
        };

        tracing::debug!(?key, attempt, waiters = released.len(), "query fetch abandoned");
        drop(released);
        self.notify();
    }

    /// Mark every entry matching `pred` stale. Data stays readable until a
    /// refetch replaces it. Returns how many entries were marked.
    pub(crate) fn invalidate_where(&self, pred: impl Fn(&K) -> bool) -> usize {
        let count = {
            let mut inner = self.lock();
            let mut count = 0;
            for (key, entry) in inner.entries.iter_mut() {
                if pred(key) {
                    entry.stale = true;
                    count += 1;
                }
            }
            count
        };

        tracing::debug!(count, "invalidated queries");
        if count > 0 {
            self.notify();
        }
        count
    }

    pub(crate) fn invalidate_namespace(&self, namespace: &str) -> usize {
        self.invalidate_where(|k| k.namespace() == namespace)
    }

    pub(crate) fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> SubscriptionId {
        let mut inner = self.lock();
        inner.last_listener += 1;
        let id = inner.last_listener;
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().listeners.retain(|(lid, _)| *lid != id);
    }

    fn notify(&self) {
        let listeners: Vec<Listener> = self
            .lock()
            .listeners
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{NotesKey, NOTES_NAMESPACE};
    use crate::models::{Note, NotePage, NoteTag};
    use futures::executor::block_on;
    use futures::task::noop_waker_ref;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::Context;

    type Cache = QueryCache<NotesKey, NotePage>;

    fn page(titles: &[&str], total_pages: u32) -> NotePage {
        NotePage {
            notes: titles
                .iter()
                .enumerate()
                .map(|(i, t)| Note {
                    id: format!("n{i}"),
                    title: t.to_string(),
                    content: String::new(),
                    tag: NoteTag::Todo,
                    created_at: String::new(),
                    updated_at: String::new(),
                })
                .collect(),
            total_pages,
        }
    }

    fn first() -> NotesKey {
        NotesKey::first_page(None)
    }

    #[test]
    fn test_fresh_entry_is_served_without_refetch() {
        let cache = Cache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let got = block_on(cache.fetch(first(), |_| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(page(&["a"], 1))
            }));
            assert_eq!(got, Ok(page(&["a"], 1)));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.snapshot(&first()).phase(), QueryPhase::Success);
    }

    #[test]
    fn test_concurrent_fetches_of_one_key_share_a_single_call() {
        let cache = Cache::new();
        let calls = AtomicUsize::new(0);
        let (release, gate) = oneshot::channel::<()>();

        let leader = cache.fetch(first(), |_| async {
            calls.fetch_add(1, Ordering::SeqCst);
            let _ = gate.await;
            Ok(page(&["shared"], 1))
        });
        let follower = cache.fetch(first(), |_| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(page(&["duplicate"], 1))
        });
        let open_gate = async {
            let _ = release.send(());
        };

        let (a, b, ()) = block_on(async { futures::join!(leader, follower, open_gate) });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a, Ok(page(&["shared"], 1)));
        assert_eq!(b, Ok(page(&["shared"], 1)));
    }

    #[test]
    fn test_snapshot_reports_fetching_while_in_flight() {
        let cache = Cache::new();
        let (release, gate) = oneshot::channel::<()>();

        let fetch = cache.fetch(first(), |_| async {
            let _ = gate.await;
            Ok(page(&["a"], 1))
        });
        let probe = async {
            let snap = cache.snapshot(&first());
            let _ = release.send(());
            snap
        };

        let (_, snap) = block_on(async { futures::join!(fetch, probe) });
        assert_eq!(snap.phase(), QueryPhase::Fetching);
        assert!(snap.data.is_none());
        assert_eq!(cache.snapshot(&first()).phase(), QueryPhase::Success);
    }

    #[test]
    fn test_failed_fetch_settles_in_error_and_retries_on_next_request() {
        let cache = Cache::new();
        let calls = AtomicUsize::new(0);

        let err = block_on(cache.fetch(first(), |_| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::Network("offline".to_string()))
        }));
        assert_eq!(err, Err(ApiError::Network("offline".to_string())));

        let snap = cache.snapshot(&first());
        assert_eq!(snap.phase(), QueryPhase::Error);
        assert_eq!(snap.attempt, 1);

        let ok = block_on(cache.fetch(first(), |_| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(page(&["back"], 1))
        }));
        assert!(ok.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let snap = cache.snapshot(&first());
        assert_eq!(snap.phase(), QueryPhase::Success);
        assert_eq!(snap.attempt, 2);
        assert!(snap.error.is_none());
    }

    #[test]
    fn test_invalidate_keeps_data_until_refetch_resolves() {
        let cache = Cache::new();
        block_on(cache.fetch(first(), |_| async { Ok(page(&["old"], 1)) })).ok();

        assert_eq!(cache.invalidate_namespace(NOTES_NAMESPACE), 1);
        let snap = cache.snapshot(&first());
        assert!(snap.is_stale);
        assert_eq!(snap.data, Some(page(&["old"], 1)));

        let (release, gate) = oneshot::channel::<()>();
        let refetch = cache.fetch(first(), |_| async {
            let _ = gate.await;
            Ok(page(&["old", "new"], 1))
        });
        let probe = async {
            let snap = cache.snapshot(&first());
            let _ = release.send(());
            snap
        };
        let (_, during) = block_on(async { futures::join!(refetch, probe) });

        assert_eq!(during.data, Some(page(&["old"], 1)));
        assert_eq!(during.phase(), QueryPhase::Fetching);

        let after = cache.snapshot(&first());
        assert_eq!(after.data, Some(page(&["old", "new"], 1)));
        assert!(!after.is_stale);
    }

    #[test]
    fn test_invalidate_by_namespace_matches_every_page_search_and_tag() {
        let cache = Cache::new();
        let keys = [
            NotesKey::new(1, "", None),
            NotesKey::new(2, "milk", None),
            NotesKey::new(1, "", Some(NoteTag::Work)),
        ];
        for k in &keys {
            block_on(cache.fetch(k.clone(), |_| async { Ok(page(&["x"], 2)) })).ok();
        }

        assert_eq!(cache.invalidate_namespace(NOTES_NAMESPACE), 3);
        assert!(keys.iter().all(|k| cache.snapshot(k).is_stale));
        assert_eq!(cache.invalidate_namespace("other"), 0);
    }

    #[test]
    fn test_superseded_result_never_overwrites_newer_one() {
        let cache = Cache::new();
        let (release_old, old_gate) = oneshot::channel::<()>();

        let old = cache.fetch(first(), |_| async {
            let _ = old_gate.await;
            Ok(page(&["old"], 1))
        });
        let newer = async {
            cache.invalidate_namespace(NOTES_NAMESPACE);
            let r = cache
                .fetch(first(), |_| async { Ok(page(&["new"], 1)) })
                .await;
            let _ = release_old.send(());
            r
        };

        let (old_result, new_result) = block_on(async { futures::join!(old, newer) });

        assert_eq!(old_result, Ok(page(&["old"], 1)));
        assert_eq!(new_result, Ok(page(&["new"], 1)));
        let snap = cache.snapshot(&first());
        assert_eq!(snap.data, Some(page(&["new"], 1)));
        assert_eq!(snap.attempt, 2);
    }

    #[test]
    fn test_listeners_are_notified_until_unsubscribed() {
        let cache = Cache::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let id = cache.subscribe(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });

        block_on(cache.fetch(first(), |_| async { Ok(page(&[], 0)) })).ok();
        // started + settled
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        cache.invalidate_namespace(NOTES_NAMESPACE);
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        cache.unsubscribe(id);
        cache.invalidate_namespace(NOTES_NAMESPACE);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unknown_key_is_idle() {
        let cache = Cache::new();
        let snap = cache.snapshot(&NotesKey::new(4, "none", None));
        assert_eq!(snap.phase(), QueryPhase::Idle);
        assert_eq!(snap.attempt, 0);
    }

    #[test]
    fn test_dropped_leader_releases_joiners_and_allows_refetch() {
        let cache = Cache::new();
        let (_release, gate) = oneshot::channel::<()>();
        let mut cx = Context::from_waker(noop_waker_ref());

        let mut leader = Box::pin(cache.fetch(first(), |_| async move {
            let _ = gate.await;
            Ok(page(&["never"], 1))
        }));
        assert!(leader.as_mut().poll(&mut cx).is_pending());

        let mut joiner = Box::pin(cache.fetch(first(), |_| async {
            Err(ApiError::Network("not called".to_string()))
        }));
        assert!(joiner.as_mut().poll(&mut cx).is_pending());
        assert!(cache.snapshot(&first()).is_fetching);

        drop(leader);
        let snap = cache.snapshot(&first());
        assert!(!snap.is_fetching);
        assert!(snap.is_stale);
        assert_eq!(block_on(joiner), Err(ApiError::Dropped));

        let got = block_on(cache.fetch(first(), |_| async { Ok(page(&["again"], 1)) }));
        assert_eq!(got, Ok(page(&["again"], 1)));
    }

    #[test]
    fn test_least_recently_used_idle_entry_is_evicted() {
        let cache = Cache::with_max_entries(2);
        let a = NotesKey::new(1, "a", None);
        let b = NotesKey::new(1, "b", None);
        let c = NotesKey::new(1, "c", None);

        for key in [&a, &b] {
            block_on(cache.fetch(key.clone(), |_| async { Ok(page(&["x"], 1)) })).ok();
        }
        // `a` is still on screen; `b` is not.
        cache.snapshot(&a);
        block_on(cache.fetch(c.clone(), |_| async { Ok(page(&["y"], 1)) })).ok();

        assert_eq!(cache.snapshot(&b).phase(), QueryPhase::Idle);
        assert_eq!(cache.snapshot(&a).phase(), QueryPhase::Success);
        assert_eq!(cache.snapshot(&c).data, Some(page(&["y"], 1)));
    }

    #[test]
    fn test_prefetch_warms_entry() {
        let cache = Cache::new();
        block_on(cache.prefetch(first(), |_| async { Ok(page(&["warm"], 1)) }));
        assert_eq!(cache.snapshot(&first()).data, Some(page(&["warm"], 1)));
    }
}

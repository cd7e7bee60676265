/// Quiet period before typed search text is committed.
pub(crate) const SEARCH_DEBOUNCE_MS: i64 = 1000;

#[derive(Clone, Debug, PartialEq, Eq)]
struct PendingSearch {
    value: String,
    due_ms: i64,
}

/// Collapses a burst of keystrokes into one committed search term.
///
/// Time is supplied by the caller; the page feeds it `now_ms()` from a
/// browser timeout, tests feed it fixed numbers.
#[derive(Clone, Debug)]
pub(crate) struct SearchDebouncer {
    quiet_ms: i64,
    pending: Option<PendingSearch>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE_MS)
    }
}

impl SearchDebouncer {
    pub(crate) fn new(quiet_ms: i64) -> Self {
        Self {
            quiet_ms: quiet_ms.max(0),
            pending: None,
        }
    }

    pub(crate) fn quiet_ms(&self) -> i64 {
        self.quiet_ms
    }

    /// Record raw input. Any earlier uncommitted value is replaced and the
    /// quiet period restarts. Returns when the value becomes due.
    pub(crate) fn input(&mut self, value: impl Into<String>, now_ms: i64) -> i64 {
        let due_ms = now_ms.saturating_add(self.quiet_ms);
        self.pending = Some(PendingSearch {
            value: value.into(),
            due_ms,
        });
        due_ms
    }

    /// Commit the pending value if its quiet period has elapsed.
    pub(crate) fn poll(&mut self, now_ms: i64) -> Option<String> {
        match &self.pending {
            Some(p) if now_ms >= p.due_ms => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    pub(crate) fn cancel(&mut self) {
        self.pending = None;
    }
}

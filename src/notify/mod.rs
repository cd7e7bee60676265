use crate::state::{Outcome, SettledAttempt};
use std::collections::VecDeque;

pub(crate) const TOAST_TTL_MS: u64 = 4000;
const MAX_VISIBLE_TOASTS: usize = 4;
const LEDGER_CAPACITY: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Notice {
    FetchFailed,
    NotFound,
    CreateFailed,
}

impl Notice {
    pub(crate) fn message(self) -> &'static str {
        match self {
            Notice::FetchFailed | Notice::CreateFailed => "Something went wrong",
            Notice::NotFound => "Notes not found.",
        }
    }
}

/// Remembers which list attempts were already announced so a settled
/// attempt produces at most one toast, however often it is re-observed.
///
/// Only the most recent announcements are kept. Attempt ids only grow, so
/// anything at or below the newest forgotten id is treated as announced.
#[derive(Clone, Debug, Default)]
pub(crate) struct NoticeLedger {
    recent: VecDeque<u64>,
    floor: u64,
}

impl NoticeLedger {
    pub(crate) fn observe(&mut self, settled: Option<SettledAttempt>) -> Option<Notice> {
        let s = settled?;
        let notice = match s.outcome {
            Outcome::Found => return None,
            Outcome::Empty => Notice::NotFound,
            Outcome::Failed => Notice::FetchFailed,
        };

        if s.attempt <= self.floor || self.recent.contains(&s.attempt) {
            return None;
        }

        self.recent.push_back(s.attempt);
        while self.recent.len() > LEDGER_CAPACITY {
            if let Some(old) = self.recent.pop_front() {
                self.floor = self.floor.max(old);
            }
        }
        Some(notice)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Toast {
    pub id: u64,
    pub notice: Notice,
}

/// Visible error toasts, oldest first.
#[derive(Clone, Debug, Default)]
pub(crate) struct Toaster {
    toasts: VecDeque<Toast>,
    last_id: u64,
}

impl Toaster {
    pub(crate) fn push(&mut self, notice: Notice) -> u64 {
        self.last_id += 1;
        let id = self.last_id;
        tracing::info!(id, message = notice.message(), "toast");

        self.toasts.push_back(Toast { id, notice });
        while self.toasts.len() > MAX_VISIBLE_TOASTS {
            self.toasts.pop_front();
        }
        id
    }

    pub(crate) fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub(crate) fn visible(&self) -> Vec<Toast> {
        self.toasts.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled(attempt: u64, outcome: Outcome) -> Option<SettledAttempt> {
        Some(SettledAttempt { attempt, outcome })
    }

    #[test]
    fn test_each_failed_attempt_is_announced_exactly_once() {
        let mut ledger = NoticeLedger::default();
        assert_eq!(
            ledger.observe(settled(3, Outcome::Failed)),
            Some(Notice::FetchFailed)
        );
        for _ in 0..5 {
            assert_eq!(ledger.observe(settled(3, Outcome::Failed)), None);
        }
        // A retry is a new attempt.
        assert_eq!(
            ledger.observe(settled(4, Outcome::Failed)),
            Some(Notice::FetchFailed)
        );
    }

    #[test]
    fn test_ledger_stays_bounded_without_repeating_old_attempts() {
        let mut ledger = NoticeLedger::default();
        let total = LEDGER_CAPACITY as u64 * 3;
        for attempt in 1..=total {
            assert!(ledger.observe(settled(attempt, Outcome::Failed)).is_some());
        }
        assert_eq!(ledger.recent.len(), LEDGER_CAPACITY);

        // Returning to a long-failed key shows its old attempt again.
        assert_eq!(ledger.observe(settled(1, Outcome::Failed)), None);
        assert_eq!(ledger.observe(settled(total, Outcome::Failed)), None);
        assert!(ledger.observe(settled(total + 1, Outcome::Empty)).is_some());
    }

    #[test]
    fn test_empty_result_announces_not_found() {
        let mut ledger = NoticeLedger::default();
        let n = ledger.observe(settled(1, Outcome::Empty));
        assert_eq!(n, Some(Notice::NotFound));
        assert_eq!(n.map(Notice::message), Some("Notes not found."));
        assert_eq!(ledger.observe(settled(1, Outcome::Empty)), None);
    }

    #[test]
    fn test_found_and_pending_are_silent() {
        let mut ledger = NoticeLedger::default();
        assert_eq!(ledger.observe(settled(1, Outcome::Found)), None);
        assert_eq!(ledger.observe(None), None);
    }

    #[test]
    fn test_toaster_push_dismiss_and_bound() {
        let mut t = Toaster::default();
        let first = t.push(Notice::CreateFailed);
        for _ in 0..MAX_VISIBLE_TOASTS {
            t.push(Notice::FetchFailed);
        }
        let visible = t.visible();
        assert_eq!(visible.len(), MAX_VISIBLE_TOASTS);
        assert!(visible.iter().all(|toast| toast.id != first));

        let last = visible[visible.len() - 1].id;
        t.dismiss(last);
        assert!(t.visible().iter().all(|toast| toast.id != last));
        assert_eq!(Notice::CreateFailed.message(), "Something went wrong");
    }
}

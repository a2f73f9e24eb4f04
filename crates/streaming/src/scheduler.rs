//! Search scheduling: debounce, last-writer-wins, stale response guard.
//!
//! The scheduler is a pure state machine driven by the host's events:
//!
//! - [`SearchScheduler::submit`] on every user edit,
//! - [`SearchScheduler::poll`] whenever the host's clock advances,
//! - [`SearchScheduler::complete`] when a fetch resolves or rejects.
//!
//! It never performs I/O. Issued requests are handed back as [`Issue`]s and
//! the host performs the fetch.

use std::time::Duration;

use foundation::time::Time;
use runtime::event_bus::EventBus;
use runtime::metrics::Metrics;
use runtime::timer::DebounceTimer;

use crate::epoch::Epoch;
use crate::error::FetchError;
use crate::query::SearchQuery;
use crate::request::FetchRequest;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SchedulerConfig {
    pub debounce: Duration,
    /// In-flight requests older than this fail with [`FetchError::Timeout`].
    pub request_timeout: Option<Duration>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(1000),
            request_timeout: Some(Duration::from_secs(15)),
        }
    }
}

/// What triggered a submit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubmitKind {
    /// Typing; coalesced through the debounce window.
    TextEdit,
    /// Discrete filter change; fires immediately.
    LanguageToggle,
}

/// A fetch the host must perform now.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub epoch: Epoch,
    pub request: FetchRequest,
}

/// Result of [`SearchScheduler::poll`].
#[derive(Debug, Clone, PartialEq)]
pub enum PollAction {
    Issue(Issue),
    TimedOut {
        epoch: Epoch,
        request: FetchRequest,
        error: FetchError,
    },
}

/// Result of [`SearchScheduler::complete`].
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Applied { epoch: Epoch, request: FetchRequest },
    /// A newer request took over; the result was dropped unseen.
    Superseded { epoch: Epoch },
    Failed { epoch: Epoch, error: FetchError },
}

#[derive(Debug, Clone, PartialEq)]
struct InFlight {
    epoch: Epoch,
    request: FetchRequest,
    issued_at: Time,
}

#[derive(Debug)]
pub struct SearchScheduler {
    config: SchedulerConfig,
    timer: DebounceTimer,
    desired: Option<SearchQuery>,
    applied: Option<SearchQuery>,
    latest: Epoch,
    in_flight: Option<InFlight>,
    error: Option<FetchError>,
    bus: EventBus,
    metrics: Metrics,
}

impl SearchScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            timer: DebounceTimer::new(config.debounce),
            desired: None,
            applied: None,
            latest: Epoch::default(),
            in_flight: None,
            error: None,
            bus: EventBus::new(),
            metrics: Metrics::new(),
        }
    }

    /// `true` while a debounce window is open or a request is in flight.
    pub fn is_pending(&self) -> bool {
        self.timer.is_armed() || self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<(Epoch, &FetchRequest)> {
        self.in_flight.as_ref().map(|f| (f.epoch, &f.request))
    }

    /// Next instant [`poll`](Self::poll) has something to do.
    pub fn next_deadline(&self) -> Option<Time> {
        let timeout = match (self.config.request_timeout, &self.in_flight) {
            (Some(t), Some(f)) => Some(f.issued_at.after(t)),
            _ => None,
        };
        match (self.timer.deadline(), timeout) {
            (Some(a), Some(b)) => Some(if a <= b { a } else { b }),
            (a, b) => a.or(b),
        }
    }

    pub fn applied(&self) -> Option<&SearchQuery> {
        self.applied.as_ref()
    }

    /// Most recent failure, until dismissed or cleared by a successful apply.
    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) -> Option<FetchError> {
        self.error.take()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Records a user edit.
    ///
    /// Text edits (re)open the debounce window; language toggles issue at
    /// once. Returns the request to perform if one is due immediately.
    pub fn submit(&mut self, now: Time, query: SearchQuery, kind: SubmitKind) -> Option<Issue> {
        if query.is_blank() {
            self.bus.emit(now, "ignored", "blank query");
            return None;
        }

        if self.applied.as_ref() == Some(&query) {
            // Back to what is already on screen: nothing older may land on top.
            self.timer.cancel();
            self.desired = None;
            if self.in_flight_search().is_some() {
                self.supersede_in_flight(now);
            }
            return None;
        }

        if self.in_flight_search() == Some(&query) {
            self.timer.cancel();
            self.desired = Some(query);
            return None;
        }

        self.desired = Some(query.clone());
        match kind {
            SubmitKind::TextEdit => {
                if self.timer.arm(now) {
                    self.metrics.incr("debounce.restarted");
                }
                self.bus.emit(now, "schedule", format!("text={:?}", query.text));
                None
            }
            SubmitKind::LanguageToggle => {
                self.timer.cancel();
                Some(self.issue(now, FetchRequest::Search(query)))
            }
        }
    }

    /// Issues `request` immediately, bypassing the debounce window.
    ///
    /// Used for the initial seed and for recentering. A query still waiting
    /// in the debounce window is not lost: it gets a fresh window once this
    /// request resolves.
    pub fn request_now(&mut self, now: Time, request: FetchRequest) -> Issue {
        self.timer.cancel();
        self.issue(now, request)
    }

    /// Advances the clock: fires an elapsed debounce window or times out a
    /// stuck request.
    pub fn poll(&mut self, now: Time) -> Option<PollAction> {
        if self.timer.fire_if_due(now) {
            if let Some(query) = self.desired.clone() {
                return Some(PollAction::Issue(self.issue(now, FetchRequest::Search(query))));
            }
        }

        let timeout = self.config.request_timeout?;
        let expired = self
            .in_flight
            .as_ref()
            .is_some_and(|f| now >= f.issued_at.after(timeout));
        if !expired {
            return None;
        }
        let flight = self.in_flight.take()?;
        let error = FetchError::Timeout {
            after_ms: timeout.as_millis() as u64,
        };
        self.metrics.incr("fetch.failed");
        self.bus.emit(now, "timeout", format!("epoch={}", flight.epoch));
        self.error = Some(error.clone());
        self.settle(now, &flight.request);
        Some(PollAction::TimedOut {
            epoch: flight.epoch,
            request: flight.request,
            error,
        })
    }

    /// Resolves the fetch issued as `epoch`.
    ///
    /// Results for anything but the request currently in flight are dropped.
    /// Otherwise `apply` installs the payload; an `Err` from either the fetch
    /// or `apply` becomes the user-visible error and nothing is recorded as
    /// applied.
    pub fn complete<T, F>(
        &mut self,
        now: Time,
        epoch: Epoch,
        result: Result<T, FetchError>,
        apply: F,
    ) -> Completion
    where
        F: FnOnce(&FetchRequest, T) -> Result<(), FetchError>,
    {
        let Some(flight) = self.in_flight.take_if(|f| f.epoch == epoch) else {
            self.metrics.incr("fetch.superseded");
            self.bus.emit(now, "superseded", format!("epoch={epoch}"));
            return Completion::Superseded { epoch };
        };

        let latency_ms = (now.since(flight.issued_at) * 1000.0).round() as i64;
        self.metrics.record("fetch.latency_ms", latency_ms);

        match result.and_then(|payload| apply(&flight.request, payload)) {
            Ok(()) => {
                if let FetchRequest::Search(query) = &flight.request {
                    self.applied = Some(query.clone());
                }
                self.error = None;
                self.settle(now, &flight.request);
                self.metrics.incr("fetch.applied");
                self.bus.emit(
                    now,
                    "apply",
                    format!("epoch={epoch} kind={}", flight.request.kind()),
                );
                Completion::Applied {
                    epoch,
                    request: flight.request,
                }
            }
            Err(error) => {
                self.metrics.incr("fetch.failed");
                self.bus.emit(now, "failure", format!("epoch={epoch} {error}"));
                self.error = Some(error.clone());
                self.settle(now, &flight.request);
                Completion::Failed { epoch, error }
            }
        }
    }

    /// Bookkeeping once the in-flight `request` has resolved, either way.
    ///
    /// A resolved search is no longer desired. Any other desired query was
    /// parked by [`request_now`](Self::request_now) and gets a new window.
    fn settle(&mut self, now: Time, request: &FetchRequest) {
        if let FetchRequest::Search(query) = request {
            if self.desired.as_ref() == Some(query) {
                self.desired = None;
            }
        }
        if self.desired.is_some() && !self.timer.is_armed() {
            self.timer.arm(now);
            self.bus.emit(now, "schedule", "resuming parked query");
        }
    }

    fn in_flight_search(&self) -> Option<&SearchQuery> {
        self.in_flight.as_ref().and_then(|f| f.request.as_search())
    }

    fn supersede_in_flight(&mut self, now: Time) {
        if let Some(old) = self.in_flight.take() {
            self.bus.emit(now, "supersede", format!("epoch={}", old.epoch));
        }
    }

    fn issue(&mut self, now: Time, request: FetchRequest) -> Issue {
        self.supersede_in_flight(now);
        self.latest = self.latest.next();
        let epoch = self.latest;
        self.metrics.incr("fetch.issued");
        self.bus
            .emit(now, "issue", format!("epoch={epoch} kind={}", request.kind()));
        self.in_flight = Some(InFlight {
            epoch,
            request: request.clone(),
            issued_at: now,
        });
        Issue { epoch, request }
    }
}

#[cfg(test)]
mod tests {
    use super::{Completion, PollAction, SchedulerConfig, SearchScheduler, SubmitKind};
    use crate::error::FetchError;
    use crate::query::SearchQuery;
    use crate::request::{FetchRequest, RecenterQuery};
    use foundation::time::Time;
    use std::time::Duration;

    fn q(text: &str) -> SearchQuery {
        SearchQuery::new(text, ["English"], 20)
    }

    fn scheduler() -> SearchScheduler {
        SearchScheduler::new(SchedulerConfig {
            debounce: Duration::from_millis(1000),
            request_timeout: Some(Duration::from_secs(10)),
        })
    }

    fn ok(_: &FetchRequest, _: ()) -> Result<(), FetchError> {
        Ok(())
    }

    fn expect_issue(action: Option<PollAction>) -> super::Issue {
        match action {
            Some(PollAction::Issue(issue)) => issue,
            other => panic!("expected issue, got {other:?}"),
        }
    }

    #[test]
    fn rapid_edits_issue_one_fetch_for_last_query() {
        let mut s = scheduler();
        assert!(s.submit(Time(0.0), q("a"), SubmitKind::TextEdit).is_none());
        assert!(s.submit(Time(0.4), q("ab"), SubmitKind::TextEdit).is_none());
        assert!(s.poll(Time(1.0)).is_none());

        let issue = expect_issue(s.poll(Time(1.5)));
        assert_eq!(issue.request, FetchRequest::Search(q("ab")));
        assert!(s.poll(Time(5.0)).is_none());
        assert_eq!(s.metrics().counter("fetch.issued"), 1);
        assert_eq!(s.metrics().counter("debounce.restarted"), 1);
    }

    #[test]
    fn language_toggle_bypasses_debounce() {
        let mut s = scheduler();
        s.submit(Time(0.0), q("a"), SubmitKind::TextEdit);
        let issue = s
            .submit(Time(0.1), SearchQuery::new("a", ["English", "French"], 20), SubmitKind::LanguageToggle)
            .expect("immediate issue");
        assert_eq!(issue.epoch.0, 1);
        // The text timer was cancelled, not left to fire a duplicate.
        assert!(s.poll(Time(2.0)).is_none());
    }

    #[test]
    fn older_response_arriving_late_is_discarded() {
        let mut s = scheduler();
        let a = s.request_now(Time(0.0), FetchRequest::Search(q("a")));
        let b = s.request_now(Time(0.1), FetchRequest::Search(q("b")));

        let applied_b = s.complete(Time(0.2), b.epoch, Ok(()), ok);
        assert!(matches!(applied_b, Completion::Applied { .. }));

        let mut touched = false;
        let late_a = s.complete(Time(0.3), a.epoch, Ok(()), |_, _: ()| {
            touched = true;
            Ok(())
        });
        assert_eq!(late_a, Completion::Superseded { epoch: a.epoch });
        assert!(!touched);
        assert_eq!(s.applied(), Some(&q("b")));
        assert!(s.error().is_none());
    }

    #[test]
    fn older_response_arriving_first_is_also_discarded() {
        let mut s = scheduler();
        let a = s.request_now(Time(0.0), FetchRequest::Search(q("a")));
        let b = s.request_now(Time(0.1), FetchRequest::Search(q("b")));
        assert_eq!(
            s.complete(Time(0.2), a.epoch, Ok(()), ok),
            Completion::Superseded { epoch: a.epoch }
        );
        assert!(s.is_pending());
        assert!(matches!(
            s.complete(Time(0.3), b.epoch, Ok(()), ok),
            Completion::Applied { .. }
        ));
        assert!(!s.is_pending());
    }

    #[test]
    fn resubmitting_applied_query_is_a_no_op() {
        let mut s = scheduler();
        let issue = s.request_now(Time(0.0), FetchRequest::Search(q("cat")));
        s.complete(Time(0.1), issue.epoch, Ok(()), ok);

        assert!(s.submit(Time(1.0), q("cat"), SubmitKind::TextEdit).is_none());
        assert!(!s.is_pending());
        assert!(s.poll(Time(5.0)).is_none());
        assert_eq!(s.metrics().counter("fetch.issued"), 1);
    }

    #[test]
    fn returning_to_applied_query_cancels_pending_work() {
        let mut s = scheduler();
        let first = s.request_now(Time(0.0), FetchRequest::Search(q("cat")));
        s.complete(Time(0.1), first.epoch, Ok(()), ok);

        s.submit(Time(1.0), q("cats"), SubmitKind::TextEdit);
        let cats = expect_issue(s.poll(Time(2.0)));
        assert!(s.submit(Time(2.1), q("cat"), SubmitKind::TextEdit).is_none());
        assert!(!s.is_pending());

        assert_eq!(
            s.complete(Time(2.5), cats.epoch, Ok(()), ok),
            Completion::Superseded { epoch: cats.epoch }
        );
        assert_eq!(s.applied(), Some(&q("cat")));
    }

    #[test]
    fn resubmitting_in_flight_query_does_not_refetch() {
        let mut s = scheduler();
        s.submit(Time(0.0), q("cat"), SubmitKind::TextEdit);
        let issue = expect_issue(s.poll(Time(1.0)));
        s.submit(Time(1.1), q("cats"), SubmitKind::TextEdit);
        assert!(s.submit(Time(1.2), q("cat"), SubmitKind::TextEdit).is_none());
        assert!(s.poll(Time(3.0)).is_none());
        assert!(matches!(
            s.complete(Time(3.1), issue.epoch, Ok(()), ok),
            Completion::Applied { .. }
        ));
        assert_eq!(s.metrics().counter("fetch.issued"), 1);
    }

    #[test]
    fn blank_text_is_ignored() {
        let mut s = scheduler();
        assert!(s.submit(Time(0.0), q("  "), SubmitKind::TextEdit).is_none());
        assert!(!s.is_pending());
        assert_eq!(s.events_mut().count_kind("ignored"), 1);
    }

    #[test]
    fn failure_surfaces_error_and_clears_pending() {
        let mut s = scheduler();
        let issue = s.request_now(Time(0.0), FetchRequest::Search(q("cat")));
        let out = s.complete(
            Time(0.5),
            issue.epoch,
            Err::<(), _>(FetchError::network("connection refused")),
            ok,
        );
        assert!(matches!(out, Completion::Failed { .. }));
        assert!(!s.is_pending());
        assert!(s.applied().is_none());
        assert!(s.error().is_some());
        assert!(s.dismiss_error().is_some());
        assert!(s.error().is_none());
    }

    #[test]
    fn apply_error_is_a_failure_and_nothing_is_applied() {
        let mut s = scheduler();
        let issue = s.request_now(Time(0.0), FetchRequest::Search(q("cat")));
        let out = s.complete(Time(0.1), issue.epoch, Ok(()), |_, _| {
            Err(FetchError::ResultMismatch {
                missing: vec!["y".into()],
            })
        });
        assert!(matches!(out, Completion::Failed { .. }));
        assert!(s.applied().is_none());
    }

    #[test]
    fn success_clears_previous_error() {
        let mut s = scheduler();
        let a = s.request_now(Time(0.0), FetchRequest::Search(q("a")));
        s.complete(Time(0.1), a.epoch, Err::<(), _>(FetchError::network("x")), ok);
        let b = s.request_now(Time(1.0), FetchRequest::Search(q("b")));
        s.complete(Time(1.1), b.epoch, Ok(()), ok);
        assert!(s.error().is_none());
    }

    #[test]
    fn stuck_request_times_out_and_late_answer_is_dropped() {
        let mut s = scheduler();
        let issue = s.request_now(Time(0.0), FetchRequest::Index);
        assert_eq!(s.next_deadline(), Some(Time(10.0)));
        assert!(s.poll(Time(9.9)).is_none());
        match s.poll(Time(10.0)) {
            Some(PollAction::TimedOut { epoch, request, error }) => {
                assert_eq!(epoch, issue.epoch);
                assert_eq!(request, FetchRequest::Index);
                assert_eq!(error, FetchError::Timeout { after_ms: 10_000 });
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert!(!s.is_pending());
        assert_eq!(
            s.complete(Time(11.0), issue.epoch, Ok(()), ok),
            Completion::Superseded { epoch: issue.epoch }
        );
    }

    #[test]
    fn next_deadline_prefers_the_earlier_event() {
        let mut s = scheduler();
        s.request_now(Time(0.0), FetchRequest::Index);
        s.submit(Time(0.5), q("a"), SubmitKind::TextEdit);
        assert_eq!(s.next_deadline(), Some(Time(1.5)));
    }

    #[test]
    fn text_typed_before_recenter_is_searched_after_it() {
        let mut s = scheduler();
        s.submit(Time(1.0), q("dog"), SubmitKind::TextEdit);
        let recenter = s.request_now(Time(1.5), FetchRequest::Recenter(RecenterQuery::default()));
        assert!(s.poll(Time(2.0)).is_none());

        s.complete(Time(2.0), recenter.epoch, Ok(()), ok);
        assert!(s.is_pending());
        assert_eq!(s.next_deadline(), Some(Time(3.0)));

        let issue = expect_issue(s.poll(Time(3.0)));
        assert_eq!(issue.request, FetchRequest::Search(q("dog")));
        s.complete(Time(3.5), issue.epoch, Ok(()), ok);
        assert_eq!(s.applied(), Some(&q("dog")));
        assert!(!s.is_pending());
    }

    #[test]
    fn parked_text_survives_a_failed_recenter() {
        let mut s = scheduler();
        s.submit(Time(1.0), q("dog"), SubmitKind::TextEdit);
        let recenter = s.request_now(Time(1.5), FetchRequest::Recenter(RecenterQuery::default()));
        s.complete(Time(2.0), recenter.epoch, Err::<(), _>(FetchError::network("reset")), ok);

        let issue = expect_issue(s.poll(Time(3.0)));
        assert_eq!(issue.request, FetchRequest::Search(q("dog")));
    }

    #[test]
    fn parked_text_survives_a_timed_out_recenter() {
        let mut s = scheduler();
        s.submit(Time(1.0), q("dog"), SubmitKind::TextEdit);
        s.request_now(Time(2.0), FetchRequest::Recenter(RecenterQuery::default()));
        assert!(matches!(s.poll(Time(12.0)), Some(PollAction::TimedOut { .. })));

        let issue = expect_issue(s.poll(Time(13.0)));
        assert_eq!(issue.request, FetchRequest::Search(q("dog")));
    }

    #[test]
    fn failed_search_is_not_retried_by_a_later_recenter() {
        let mut s = scheduler();
        s.submit(Time(0.0), q("dog"), SubmitKind::TextEdit);
        let search = expect_issue(s.poll(Time(1.0)));
        s.complete(Time(1.5), search.epoch, Err::<(), _>(FetchError::network("x")), ok);

        let recenter = s.request_now(Time(2.0), FetchRequest::Recenter(RecenterQuery::default()));
        s.complete(Time(2.5), recenter.epoch, Ok(()), ok);
        assert!(!s.is_pending());
        assert!(s.poll(Time(20.0)).is_none());
        assert_eq!(s.metrics().counter("fetch.issued"), 2);
    }
}

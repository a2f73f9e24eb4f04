//! Async host loop.
//!
//! A single task owns the [`Session`] and multiplexes user input, fetch
//! completions, scheduler deadlines and frame ticks. Fetches run on spawned
//! tasks and report back over a channel, so a slow response never blocks
//! input handling.

use std::sync::Arc;
use std::time::Duration;

use foundation::time::Time;
use runtime::frame::Frame;
use streaming::epoch::Epoch;
use streaming::scheduler::{Completion, Issue};
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::backend::{FetchResult, SearchBackend};
use crate::logging::log_events;
use crate::session::{RenderSnapshot, Session};

/// User events fed into the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    /// Language code, e.g. `"fr"`.
    ToggleLanguage(String),
    ToggleSelection(String),
    Recenter,
    DismissError,
}

type Done = mpsc::UnboundedSender<(Epoch, FetchResult)>;

pub struct ExplorerRuntime {
    session: Session,
    backend: Arc<dyn SearchBackend>,
    frame_interval: Duration,
}

impl ExplorerRuntime {
    pub fn new(session: Session, backend: Arc<dyn SearchBackend>, frame_interval: Duration) -> Self {
        Self {
            session,
            backend,
            frame_interval,
        }
    }

    /// Channel the loop publishes a snapshot on every frame.
    pub fn snapshot_channel(&self) -> (watch::Sender<RenderSnapshot>, watch::Receiver<RenderSnapshot>) {
        watch::channel(self.session.snapshot(Time::ZERO))
    }

    /// Runs until `inputs` is closed, then hands the session back.
    pub async fn run(
        mut self,
        mut inputs: mpsc::Receiver<Input>,
        snapshots: watch::Sender<RenderSnapshot>,
    ) -> Session {
        let clock = Instant::now();
        let now = move || Time(clock.elapsed().as_secs_f64());
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();

        let seed = self.session.start(now());
        self.dispatch(seed, &done_tx);

        let mut ticker = time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut frame = Frame::first(now());

        loop {
            let deadline = self.session.next_deadline();
            let wake = deadline.map(|t| clock + Duration::from_secs_f64(t.as_secs()));

            tokio::select! {
                input = inputs.recv() => {
                    let Some(input) = input else { break };
                    if let Some(issue) = self.handle_input(now(), input) {
                        self.dispatch(issue, &done_tx);
                    }
                }
                Some((epoch, result)) = done_rx.recv() => {
                    self.handle_completion(now(), epoch, result);
                }
                () = sleep_until(wake) => {
                    // `now()` may round to just short of the deadline.
                    let at = match deadline {
                        Some(d) if now() < d => d,
                        _ => now(),
                    };
                    if let Some(issue) = self.session.poll(at) {
                        self.dispatch(issue, &done_tx);
                    }
                }
                _ = ticker.tick() => {
                    frame = frame.advance_to(now());
                    self.session.tick(&frame);
                    snapshots.send_replace(self.session.snapshot(frame.time));
                }
            }

            log_events(self.session.drain_events());
        }

        info!(summary = %self.session.metrics().summary(), "explorer loop stopped");
        self.session
    }

    fn handle_input(&mut self, now: Time, input: Input) -> Option<Issue> {
        match input {
            Input::Text(text) => self.session.set_text(now, text),
            Input::ToggleLanguage(code) => self.session.toggle_language(now, &code),
            Input::ToggleSelection(word) => {
                let selected = self.session.toggle_selection(&word);
                debug!(
                    %word,
                    selected,
                    all = ?self.session.selection().sorted(),
                    "selection toggled"
                );
                None
            }
            Input::Recenter => Some(self.session.recenter(now)),
            Input::DismissError => {
                self.session.dismiss_error();
                None
            }
        }
    }

    fn handle_completion(&mut self, now: Time, epoch: Epoch, result: FetchResult) {
        match self.session.complete(now, epoch, result) {
            Completion::Applied { request, .. } => info!(
                %epoch,
                kind = request.kind(),
                words = self.session.corpus().len(),
                "corpus updated"
            ),
            Completion::Superseded { .. } => debug!(%epoch, "dropped superseded response"),
            Completion::Failed { error, .. } => {
                warn!(%epoch, class = ?error.class(), %error, "fetch failed")
            }
        }
    }

    fn dispatch(&self, issue: Issue, done: &Done) {
        let wire = self.session.wire_request(&issue.request);
        let backend = Arc::clone(&self.backend);
        let done = done.clone();
        debug!(epoch = %issue.epoch, kind = issue.request.kind(), "dispatching fetch");
        tokio::spawn(async move {
            let result = backend.send(wire).await;
            // The loop may have exited; nobody is left to apply the result.
            let _ = done.send((issue.epoch, result));
        });
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

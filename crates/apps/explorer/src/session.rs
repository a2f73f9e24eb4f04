//! The top-level controller.
//!
//! `Session` owns every piece of view state and exposes one method per
//! event (user input, timer, fetch completion, frame tick). Each method is a
//! synchronous state transition; the async runtime only decides *when* to
//! call them and performs the fetches they hand back.

use std::collections::BTreeSet;

use foundation::math::Vec3;
use foundation::time::Time;
use runtime::event_bus::Event;
use runtime::frame::Frame;
use runtime::metrics::Metrics;
use scene::corpus::Corpus;
use scene::framing::{frame_corpus, CameraFrame, FramerParams};
use scene::language::{self, NEUTRAL_COLOR};
use scene::motion::{MotionParams, MotionSet};
use scene::reconcile::{reconcile_checked, MergeMode};
use scene::selection::SelectionSet;
use scene::visual::visual_weight;
use scene::word::WordPoint;
use streaming::epoch::Epoch;
use streaming::error::FetchError;
use streaming::protocol::{CorpusResponse, ProjectionId};
use streaming::query::SearchQuery;
use streaming::request::{FetchRequest, RecenterQuery};
use streaming::scheduler::{
    Completion, Issue, PollAction, SchedulerConfig, SearchScheduler, SubmitKind,
};

use crate::backend::{FetchResult, WireRequest};

pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub scheduler: SchedulerConfig,
    pub words_per_language: usize,
    pub search_merge: MergeMode,
    pub motion: MotionParams,
    pub framer: FramerParams,
    /// Submitted as a text edit once the index seed has resolved.
    pub initial_text: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            words_per_language: 20,
            search_merge: MergeMode::Replace,
            motion: MotionParams::default(),
            framer: FramerParams::default(),
            initial_text: String::new(),
        }
    }
}

/// One word as the renderer should draw it this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedWord {
    pub word: String,
    pub position: Vec3,
    pub opacity: f32,
    pub scale: f32,
    pub color: [f32; 4],
    pub is_origin: bool,
}

/// Consistent per-frame view of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub time: Time,
    pub words: Vec<RenderedWord>,
    /// Marker for the applied query text, pinned at the origin.
    pub origin: Option<RenderedWord>,
    pub camera: CameraFrame,
    pub loading: bool,
    /// A search is scheduled or running.
    pub pending: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    scheduler: SearchScheduler,
    corpus: Corpus,
    selection: SelectionSet,
    languages: BTreeSet<&'static str>,
    motions: MotionSet,
    camera: CameraFrame,
    projection_id: Option<ProjectionId>,
    history: Vec<String>,
    text: String,
    has_loaded: bool,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let corpus = Corpus::new();
        let camera = frame_corpus(&corpus, &config.framer);
        Self {
            scheduler: SearchScheduler::new(config.scheduler),
            motions: MotionSet::new(config.motion),
            languages: BTreeSet::from([DEFAULT_LANGUAGE]),
            selection: SelectionSet::new(),
            projection_id: None,
            history: Vec::new(),
            text: config.initial_text.clone(),
            has_loaded: false,
            corpus,
            camera,
            config,
        }
    }

    // ---- reads ----

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Selected language codes, sorted.
    pub fn selected_languages(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.languages.iter().copied()
    }

    pub fn projection_id(&self) -> Option<&str> {
        self.projection_id.as_deref()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// `true` once any corpus has been installed.
    pub fn has_loaded(&self) -> bool {
        self.has_loaded
    }

    /// `true` while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.scheduler.in_flight().is_some()
    }

    pub fn camera(&self) -> CameraFrame {
        self.camera
    }

    pub fn motions(&self) -> &MotionSet {
        &self.motions
    }

    pub fn scheduler(&self) -> &SearchScheduler {
        &self.scheduler
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.scheduler.error()
    }

    pub fn next_deadline(&self) -> Option<Time> {
        self.scheduler.next_deadline()
    }

    pub fn metrics(&self) -> &Metrics {
        self.scheduler.metrics()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.scheduler.events_mut().drain()
    }

    /// Query for the current text and language filter.
    pub fn current_query(&self) -> SearchQuery {
        let names = self
            .languages
            .iter()
            .filter_map(|code| language::by_code(code))
            .map(|l| l.name);
        SearchQuery::new(self.text.clone(), names, self.config.words_per_language)
    }

    /// Words that pass the language filter. Untagged words always do.
    pub fn visible_words(&self) -> impl Iterator<Item = &WordPoint> + '_ {
        self.corpus.iter().filter(|point| self.is_visible(point))
    }

    /// Wire form of `request`, carrying the current projection id.
    pub fn wire_request(&self, request: &FetchRequest) -> WireRequest {
        WireRequest::from_fetch(request, self.projection_id.as_deref())
    }

    // ---- events ----

    /// Issues the index seed.
    pub fn start(&mut self, now: Time) -> Issue {
        let issue = self.scheduler.request_now(now, FetchRequest::Index);
        self.resync(now);
        issue
    }

    pub fn set_text(&mut self, now: Time, text: impl Into<String>) -> Option<Issue> {
        self.text = text.into();
        let query = self.current_query();
        let issue = self.scheduler.submit(now, query, SubmitKind::TextEdit);
        self.resync(now);
        issue
    }

    /// Flips a language filter. The last selected language stays selected;
    /// unknown codes are ignored.
    pub fn toggle_language(&mut self, now: Time, code: &str) -> Option<Issue> {
        let lang = language::by_code(code)?;
        if self.languages.contains(lang.code) {
            if self.languages.len() == 1 {
                return None;
            }
            self.languages.remove(lang.code);
        } else {
            self.languages.insert(lang.code);
        }
        let query = self.current_query();
        let issue = self
            .scheduler
            .submit(now, query, SubmitKind::LanguageToggle);
        self.resync(now);
        issue
    }

    /// Returns whether `word` is selected afterwards.
    pub fn toggle_selection(&mut self, word: &str) -> bool {
        self.selection.toggle(word)
    }

    /// Recomputes coordinates for the active words and the search history.
    pub fn recenter(&mut self, now: Time) -> Issue {
        let query = RecenterQuery {
            active: self.corpus.active().map(|p| p.word().to_string()).collect(),
            history: self.history.clone(),
        };
        let issue = self
            .scheduler
            .request_now(now, FetchRequest::Recenter(query));
        self.resync(now);
        issue
    }

    pub fn dismiss_error(&mut self) -> Option<FetchError> {
        self.scheduler.dismiss_error()
    }

    /// Fires due timers. Returns a fetch to perform, if any.
    pub fn poll(&mut self, now: Time) -> Option<Issue> {
        let issue = match self.scheduler.poll(now)? {
            PollAction::Issue(issue) => Some(issue),
            PollAction::TimedOut { request, .. } => {
                if request == FetchRequest::Index {
                    self.submit_initial_text(now);
                }
                None
            }
        };
        self.resync(now);
        issue
    }

    /// Installs (or drops) the outcome of the fetch issued as `epoch`.
    pub fn complete(&mut self, now: Time, epoch: Epoch, result: FetchResult) -> Completion {
        let seeding = self
            .scheduler
            .in_flight()
            .is_some_and(|(e, r)| e == epoch && *r == FetchRequest::Index);

        let search_merge = self.config.search_merge;
        let corpus = &mut self.corpus;
        let projection_id = &mut self.projection_id;
        let history = &mut self.history;
        let has_loaded = &mut self.has_loaded;

        let outcome = self.scheduler.complete(
            now,
            epoch,
            result,
            |request, response: CorpusResponse| {
                let (mode, required) = match request {
                    FetchRequest::Index => (MergeMode::Replace, BTreeSet::new()),
                    FetchRequest::Search(_) => (search_merge, BTreeSet::new()),
                    FetchRequest::Recenter(q) => (MergeMode::UnionRefresh, q.required()),
                };
                *corpus = reconcile_checked(corpus, &response.words, mode, &required)?;
                if response.projection_id.is_some() {
                    *projection_id = response.projection_id;
                }
                if let FetchRequest::Search(q) = request {
                    history.push(q.text.clone());
                }
                *has_loaded = true;
                Ok(())
            },
        );

        if seeding {
            self.submit_initial_text(now);
        }
        self.resync(now);
        outcome
    }

    /// Queues the text typed before the seed resolved, whatever its outcome.
    fn submit_initial_text(&mut self, now: Time) {
        if !self.text.trim().is_empty() {
            let query = self.current_query();
            self.scheduler.submit(now, query, SubmitKind::TextEdit);
        }
    }

    /// Steps the springs by one frame.
    pub fn tick(&mut self, frame: &Frame) {
        self.motions.advance(frame);
    }

    pub fn snapshot(&self, t: Time) -> RenderSnapshot {
        let loading = self.is_loading();
        let origin_text = self.scheduler.applied().map(|q| q.text.as_str());

        let words = self
            .visible_words()
            .filter(|point| Some(point.word()) != origin_text)
            .filter_map(|point| {
                let position = self.motions.sample(point.word(), t)?;
                let weight = visual_weight(
                    loading || point.is_stale(),
                    self.selection.is_selected(point.word()),
                );
                Some(RenderedWord {
                    word: point.word().to_string(),
                    position,
                    opacity: weight.opacity,
                    scale: weight.scale,
                    color: language::color_for(point.language()),
                    is_origin: false,
                })
            })
            .collect();

        let origin = origin_text.map(|text| {
            let weight = visual_weight(loading, self.selection.is_selected(text));
            RenderedWord {
                word: text.to_string(),
                position: Vec3::ZERO,
                opacity: weight.opacity,
                scale: weight.scale,
                color: NEUTRAL_COLOR,
                is_origin: true,
            }
        });

        RenderSnapshot {
            time: t,
            words,
            origin,
            camera: self.camera,
            loading,
            pending: self.scheduler.is_pending(),
            error: self.error().map(ToString::to_string),
        }
    }

    fn is_visible(&self, point: &WordPoint) -> bool {
        match point.language() {
            None => true,
            Some(name) => language::by_name(name).is_some_and(|l| self.languages.contains(l.code)),
        }
    }

    fn resync(&mut self, now: Time) {
        let awaiting = self.is_loading();
        self.motions.sync(&self.corpus, awaiting, now);
        self.camera = frame_corpus(&self.corpus, &self.config.framer);
    }
}

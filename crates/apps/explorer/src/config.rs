//! Explorer configuration, read from `WORDSPACE_*` environment variables.

use std::str::FromStr;
use std::time::Duration;

use scene::motion::MotionParams;
use scene::framing::FramerParams;
use scene::reconcile::MergeMode;
use streaming::scheduler::SchedulerConfig;

use crate::session::SessionConfig;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_INITIAL_TEXT: &str = "when u don't wanna get out of bed";

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    /// Base URL of the embedding service, without trailing slash.
    pub api_url: String,
    pub debounce: Duration,
    /// `None` waits forever.
    pub request_timeout: Option<Duration>,
    pub words_per_language: usize,
    /// Merge policy for per-keystroke searches.
    pub search_merge: MergeMode,
    pub frame_hz: u32,
    pub token: Option<String>,
    pub initial_text: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            debounce: Duration::from_millis(1000),
            request_timeout: Some(Duration::from_millis(15_000)),
            words_per_language: 20,
            search_merge: MergeMode::Replace,
            frame_hz: 60,
            token: None,
            initial_text: DEFAULT_INITIAL_TEXT.to_string(),
        }
    }
}

impl ExplorerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unset or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let timeout_ms = env_var_u64(&lookup, "WORDSPACE_REQUEST_TIMEOUT_MS", 15_000);
        Self {
            api_url: lookup("WORDSPACE_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.api_url),
            debounce: Duration::from_millis(env_var_u64(&lookup, "WORDSPACE_DEBOUNCE_MS", 1000)),
            request_timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
            words_per_language: env_var_usize(&lookup, "WORDSPACE_WORDS_PER_LANGUAGE", 20),
            search_merge: env_var_parse(&lookup, "WORDSPACE_SEARCH_MERGE", MergeMode::Replace),
            frame_hz: env_var_u32(&lookup, "WORDSPACE_FRAME_HZ", 60).max(1),
            token: lookup("WORDSPACE_TOKEN").filter(|t| !t.is_empty()),
            initial_text: lookup("WORDSPACE_INITIAL_TEXT").unwrap_or(defaults.initial_text),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_hz.max(1)))
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            debounce: self.debounce,
            request_timeout: self.request_timeout,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            scheduler: self.scheduler_config(),
            words_per_language: self.words_per_language,
            search_merge: self.search_merge,
            motion: MotionParams::default(),
            framer: FramerParams::default(),
            initial_text: self.initial_text.clone(),
        }
    }
}

fn env_var_parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_var_u32(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u32) -> u32 {
    env_var_parse(lookup, key, default)
}

fn env_var_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    env_var_parse(lookup, key, default)
}

fn env_var_usize(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> usize {
    env_var_parse(lookup, key, default)
}

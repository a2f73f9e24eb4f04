//! Corpus reconciliation: installs a fetch result into the displayed corpus.
//!
//! Reconciliation is a pure function of `(previous, fetched, mode)`. It never
//! mutates `previous`; on failure the caller keeps displaying it untouched.

use std::collections::BTreeSet;

use crate::corpus::Corpus;
use crate::word::{FetchedCorpus, WordPoint};

/// How a fetch result is merged into the previously displayed corpus.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// Next corpus holds exactly the fetched words.
    #[default]
    Replace,
    /// Next corpus is `previous ∪ fetched`; words missing from the result
    /// keep their last position and are flagged stale.
    UnionRefresh,
}

impl MergeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            MergeMode::Replace => "replace",
            MergeMode::UnionRefresh => "union",
        }
    }
}

impl std::str::FromStr for MergeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(MergeMode::Replace),
            "union" | "union-refresh" | "union_refresh" => Ok(MergeMode::UnionRefresh),
            other => Err(format!("unknown merge mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// The result does not cover every word the caller required.
    ResultMismatch { missing: Vec<String> },
}

impl std::fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileError::ResultMismatch { missing } => {
                write!(
                    f,
                    "result is missing {} required word(s): {}",
                    missing.len(),
                    missing.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for ReconcileError {}

/// Merges `fetched` into `previous` according to `mode`.
pub fn reconcile(previous: &Corpus, fetched: &FetchedCorpus, mode: MergeMode) -> Corpus {
    match mode {
        MergeMode::Replace => {
            let mut next = Corpus::new();
            for (word, f) in fetched {
                // Reuse the previous point so its identity carries over.
                let point = match previous.get(word) {
                    Some(prev) => {
                        let mut p = prev.clone();
                        p.refresh(f.position, f.language.clone());
                        p
                    }
                    None => WordPoint::active(word.clone(), f.position, f.language.clone()),
                };
                next.insert(point);
            }
            next
        }
        MergeMode::UnionRefresh => {
            let mut next = previous.clone();
            for word in previous.keys().filter(|w| !fetched.contains_key(*w)) {
                if let Some(point) = next.get_mut(word) {
                    point.mark_stale();
                }
            }
            for (word, f) in fetched {
                match next.get_mut(word) {
                    Some(point) => point.refresh(f.position, f.language.clone()),
                    None => next.insert(WordPoint::active(word.clone(), f.position, f.language.clone())),
                }
            }
            next
        }
    }
}

/// Like [`reconcile`], but fails without producing a corpus if any word in
/// `required` is absent from `fetched`.
pub fn reconcile_checked(
    previous: &Corpus,
    fetched: &FetchedCorpus,
    mode: MergeMode,
    required: &BTreeSet<String>,
) -> Result<Corpus, ReconcileError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|w| !fetched.contains_key(w.as_str()))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(ReconcileError::ResultMismatch { missing });
    }
    Ok(reconcile(previous, fetched, mode))
}

#[cfg(test)]
mod tests {
    use super::{MergeMode, ReconcileError, reconcile, reconcile_checked};
    use crate::corpus::Corpus;
    use crate::word::{FetchedCorpus, FetchedWord, WordPoint};
    use foundation::math::Vec3;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn fetched(entries: &[(&str, [f64; 3])]) -> FetchedCorpus {
        entries
            .iter()
            .map(|(w, p)| (w.to_string(), FetchedWord::new(Vec3::from_array(*p), None)))
            .collect()
    }

    fn corpus(entries: &[(&str, [f64; 3])]) -> Corpus {
        Corpus::from_fetched(&fetched(entries))
    }

    #[test]
    fn replace_drops_words_missing_from_result() {
        let prev = corpus(&[("cat", [1.0, 0.0, 0.0])]);
        let next = reconcile(&prev, &fetched(&[("dog", [0.0, 1.0, 0.0])]), MergeMode::Replace);
        assert_eq!(next, corpus(&[("dog", [0.0, 1.0, 0.0])]));
        assert!(!next.contains("cat"));
    }

    #[test]
    fn replace_is_idempotent() {
        let prev = corpus(&[("cat", [1.0, 0.0, 0.0]), ("owl", [0.0, 0.0, 1.0])]);
        let f = fetched(&[("cat", [2.0, 0.0, 0.0]), ("dog", [0.0, 1.0, 0.0])]);
        let once = reconcile(&prev, &f, MergeMode::Replace);
        let twice = reconcile(&once, &f, MergeMode::Replace);
        assert_eq!(once, twice);
    }

    #[test]
    fn replace_refreshes_stale_words_it_contains() {
        let mut prev = corpus(&[("cat", [1.0, 0.0, 0.0])]);
        if let Some(p) = prev.get_mut("cat") {
            p.mark_stale();
        }
        let next = reconcile(&prev, &fetched(&[("cat", [3.0, 0.0, 0.0])]), MergeMode::Replace);
        let cat = next.get("cat").unwrap();
        assert!(!cat.is_stale());
        assert_eq!(cat.position(), Some(Vec3::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn union_refresh_keeps_history_as_stale() {
        let prev = corpus(&[("cat", [1.0, 0.0, 0.0]), ("dog", [0.0, 1.0, 0.0])]);
        let next = reconcile(
            &prev,
            &fetched(&[("cat", [2.0, 0.0, 0.0])]),
            MergeMode::UnionRefresh,
        );

        let mut expected = Corpus::new();
        expected.insert(WordPoint::active("cat", Vec3::new(2.0, 0.0, 0.0), None));
        let mut dog = WordPoint::active("dog", Vec3::new(0.0, 1.0, 0.0), None);
        dog.mark_stale();
        expected.insert(dog);
        assert_eq!(next, expected);
    }

    #[test]
    fn union_refresh_preserves_every_previous_word() {
        let prev = corpus(&[("a", [1.0, 0.0, 0.0]), ("b", [0.0, 1.0, 0.0]), ("c", [0.0, 0.0, 1.0])]);
        let next = reconcile(
            &prev,
            &fetched(&[("b", [5.0, 5.0, 5.0]), ("z", [1.0, 1.0, 1.0])]),
            MergeMode::UnionRefresh,
        );
        for word in prev.keys() {
            assert!(next.contains(word), "{word} dropped");
        }
        assert!(next.contains("z"));
    }

    #[test]
    fn missing_required_word_fails_and_leaves_previous_alone() {
        let prev = corpus(&[("x", [1.0, 0.0, 0.0])]);
        let before = prev.clone();
        let required: BTreeSet<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        let err = reconcile_checked(
            &prev,
            &fetched(&[("x", [9.0, 9.0, 9.0])]),
            MergeMode::UnionRefresh,
            &required,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ReconcileError::ResultMismatch {
                missing: vec!["y".to_string()]
            }
        );
        assert_eq!(prev, before);
    }

    #[test]
    fn merge_mode_parses_config_names() {
        assert_eq!("replace".parse::<MergeMode>(), Ok(MergeMode::Replace));
        assert_eq!(" Union ".parse::<MergeMode>(), Ok(MergeMode::UnionRefresh));
        assert!("sideways".parse::<MergeMode>().is_err());
    }
}

use std::collections::BTreeMap;

use foundation::math::Vec3;

use crate::word::{FetchedCorpus, WordPoint};

/// The set of words currently displayed, keyed by word.
///
/// Backed by a `BTreeMap` so iteration (and therefore render order and
/// test output) is stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    words: BTreeMap<String, WordPoint>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// A corpus holding exactly the fetched words, all active.
    pub fn from_fetched(fetched: &FetchedCorpus) -> Self {
        let words = fetched
            .iter()
            .map(|(word, f)| {
                (
                    word.clone(),
                    WordPoint::active(word.clone(), f.position, f.language.clone()),
                )
            })
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    pub fn get(&self, word: &str) -> Option<&WordPoint> {
        self.words.get(word)
    }

    pub fn get_mut(&mut self, word: &str) -> Option<&mut WordPoint> {
        self.words.get_mut(word)
    }

    pub fn insert(&mut self, point: WordPoint) {
        self.words.insert(point.word().to_string(), point);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordPoint> + '_ {
        self.words.values()
    }

    /// Points with current coordinates.
    pub fn active(&self) -> impl Iterator<Item = &WordPoint> + '_ {
        self.words.values().filter(|p| !p.is_stale())
    }

    pub fn stale(&self) -> impl Iterator<Item = &WordPoint> + '_ {
        self.words.values().filter(|p| p.is_stale())
    }

    /// Scene-space positions of the active points.
    pub fn active_world_positions(&self) -> Vec<Vec3> {
        self.active().filter_map(WordPoint::world_position).collect()
    }
}

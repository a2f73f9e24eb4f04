use std::collections::BTreeMap;

use foundation::math::Vec3;

/// Embedding coordinates are small (roughly unit range); the scene spreads
/// them out by this factor.
pub const WORLD_SCALE: f64 = 10.0;

/// One word's visual state.
///
/// Invariant: a non-stale point always has a position. The fields are private
/// so the only ways to change staleness go through [`WordPoint::mark_stale`]
/// and [`WordPoint::refresh`].
#[derive(Debug, Clone, PartialEq)]
pub struct WordPoint {
    word: String,
    position: Option<Vec3>,
    language: Option<String>,
    stale: bool,
}

impl WordPoint {
    /// A point with freshly confirmed coordinates.
    pub fn active(word: impl Into<String>, position: Vec3, language: Option<String>) -> Self {
        Self {
            word: word.into(),
            position: Some(position),
            language,
            stale: false,
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// Latest confirmed embedding coordinates.
    pub fn position(&self) -> Option<Vec3> {
        self.position
    }

    /// Confirmed coordinates in scene units.
    pub fn world_position(&self) -> Option<Vec3> {
        self.position.map(|p| p.scale(WORLD_SCALE))
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Keeps the last position but flags it as awaiting new coordinates.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Installs new coordinates in place, clearing staleness.
    pub fn refresh(&mut self, position: Vec3, language: Option<String>) {
        self.position = Some(position);
        if language.is_some() {
            self.language = language;
        }
        self.stale = false;
    }
}

/// One entry of a fetch result, already decoded from the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedWord {
    pub position: Vec3,
    pub language: Option<String>,
}

impl FetchedWord {
    pub fn new(position: Vec3, language: Option<String>) -> Self {
        Self { position, language }
    }
}

/// A fetch result: word → coordinates.
pub type FetchedCorpus = BTreeMap<String, FetchedWord>;

#[cfg(test)]
mod tests {
    use super::{WORLD_SCALE, WordPoint};
    use foundation::math::Vec3;

    #[test]
    fn stale_point_keeps_last_position() {
        let mut p = WordPoint::active("cat", Vec3::new(1.0, 0.0, 0.0), None);
        p.mark_stale();
        assert!(p.is_stale());
        assert_eq!(p.position(), Some(Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn refresh_clears_stale_and_keeps_known_language() {
        let mut p = WordPoint::active("gato", Vec3::ZERO, Some("Spanish".into()));
        p.mark_stale();
        p.refresh(Vec3::new(0.0, 2.0, 0.0), None);
        assert!(!p.is_stale());
        assert_eq!(p.language(), Some("Spanish"));
        assert_eq!(p.world_position(), Some(Vec3::new(0.0, 2.0 * WORLD_SCALE, 0.0)));
    }
}

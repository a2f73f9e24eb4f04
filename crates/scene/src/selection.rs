use std::collections::HashSet;

/// Set of selected words.
///
/// Membership is keyed by the word string, not by any corpus entry, so a
/// selection survives reconciliation untouched. A selected word that has left
/// the corpus simply has nothing to highlight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    words: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn is_selected(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Flips membership of `word`.
    ///
    /// Returns `true` if the word is selected afterwards.
    pub fn toggle(&mut self, word: &str) -> bool {
        if self.words.remove(word) {
            return false;
        }
        self.words.insert(word.to_string());
        true
    }

    /// Selected words in sorted order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.words.iter().map(String::as_str).collect();
        out.sort_unstable();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionSet;

    #[test]
    fn toggle_flips_membership() {
        let mut s = SelectionSet::new();
        assert!(s.is_empty());
        assert!(s.toggle("cat"));
        assert!(s.is_selected("cat"));
        assert_eq!(s.len(), 1);
        assert!(!s.toggle("cat"));
        assert!(!s.is_selected("cat"));
    }

    #[test]
    fn double_toggle_restores_original_state() {
        let mut s = SelectionSet::new();
        s.toggle("a");
        s.toggle("b");
        let before = s.clone();
        s.toggle("c");
        s.toggle("c");
        s.toggle("a");
        s.toggle("a");
        assert_eq!(s, before);
    }

    #[test]
    fn sorted_is_stable() {
        let mut s = SelectionSet::new();
        s.toggle("zebra");
        s.toggle("apple");
        s.toggle("mango");
        assert_eq!(s.sorted(), vec!["apple", "mango", "zebra"]);
    }
}

use std::collections::VecDeque;

pub const HISTORY_LIMIT: usize = 5;

/// Recently searched city names, most recent first, unique, capped at [`HISTORY_LIMIT`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHistory {
    entries: VecDeque<String>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `label` to the front, dropping any earlier copy and the oldest overflow.
    /// Blank labels are ignored.
    pub fn record(&mut self, label: &str) {
        if label.trim().is_empty() {
            return;
        }

        self.entries.retain(|e| e != label);
        self.entries.push_front(label.to_string());
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(history: &SearchHistory) -> Vec<&str> {
        history.iter().collect()
    }

    #[test]
    fn keeps_only_five_most_recent() {
        let mut history = SearchHistory::new();
        for city in ["A", "B", "C", "D", "E", "F", "G"] {
            history.record(city);
            assert!(history.len() <= HISTORY_LIMIT);
        }
        assert_eq!(collect(&history), ["G", "F", "E", "D", "C"]);
    }

    #[test]
    fn duplicate_moves_to_front() {
        let mut history = SearchHistory::new();
        for city in ["C", "B", "A"] {
            history.record(city);
        }
        assert_eq!(collect(&history), ["A", "B", "C"]);

        history.record("B");
        assert_eq!(collect(&history), ["B", "A", "C"]);
    }

    #[test]
    fn equality_is_case_sensitive() {
        let mut history = SearchHistory::new();
        history.record("paris");
        history.record("Paris");
        assert_eq!(collect(&history), ["Paris", "paris"]);
    }

    #[test]
    fn blank_labels_are_ignored() {
        let mut history = SearchHistory::new();
        history.record("   ");
        history.record("");
        assert!(history.is_empty());
    }
}

use std::collections::VecDeque;

use serde::Serialize;

use super::sentiment::Emotion;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub user_input: String,
    pub response: String,
    pub emotion: Emotion,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mood {
    pub emotion: Emotion,
    /// the polarity that produced the emotion
    pub intensity: f64,
}

impl Default for Mood {
    fn default() -> Self {
        Mood {
            emotion: Emotion::Neutral,
            intensity: 0.0,
        }
    }
}

/// state for a single session's chat. nothing here is shared between
/// sessions
#[derive(Debug, Clone)]
pub struct Conversation {
    history: VecDeque<HistoryEntry>,
    limit: usize,
    pub mood: Mood,
}

impl Conversation {
    pub fn new(limit: usize) -> Self {
        Conversation {
            history: VecDeque::new(),
            limit,
            mood: Mood::default(),
        }
    }

    pub fn history(&self) -> &VecDeque<HistoryEntry> {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// appends the entry and drops the oldest ones past the limit
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.limit == 0 {
            return;
        }

        self.history.push_back(entry);

        while self.history.len() > self.limit {
            self.history.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.mood = Mood::default();
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Conversation::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry {
            user_input: format!("input {n}"),
            response: format!("response {n}"),
            emotion: Emotion::NotAnalyzed,
        }
    }

    #[test]
    fn trims_oldest_first() {
        let mut conversation = Conversation::new(3);

        for n in 0..5 {
            conversation.push(entry(n));
        }

        assert_eq!(conversation.len(), 3);
        assert_eq!(conversation.history().front().unwrap().user_input, "input 2");
        assert_eq!(conversation.history().back().unwrap().user_input, "input 4");
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        let mut conversation = Conversation::new(0);
        conversation.push(entry(0));

        assert!(conversation.is_empty());
    }
}

// src/history/mod.rs
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
}

impl HistoryEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { question: question.into(), answer: answer.into() }
    }
}

/// Bounded list of the most recent entries. Appending past capacity evicts the oldest.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    /// A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { entries: VecDeque::with_capacity(capacity + 1), capacity }
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                tracing::trace!("Evicted history entry: '{}'", evicted.question);
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries most recent first.
    pub fn to_display_order(&self) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

/// Per-session state, created when the session starts and dropped when it ends.
#[derive(Debug, Default)]
pub struct Session {
    history: History,
}

impl Session {
    pub fn new(history_capacity: usize) -> Self {
        Self { history: History::new(history_capacity) }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn record(&mut self, question: &str, answer: &str) {
        self.history.append(HistoryEntry::new(question, answer));
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        tracing::info!("History cleared");
    }

    /// Renders the history most recent first, or `None` when it is empty.
    pub fn render_history(&self) -> Option<String> {
        if self.history.is_empty() {
            return None;
        }
        let blocks: Vec<String> = self
            .history
            .to_display_order()
            .iter()
            .map(|e| format!("Question: {}\nAnswer: {}", e.question, e.answer))
            .collect();
        Some(blocks.join("\n\n"))
    }
}

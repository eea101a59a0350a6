//! Navigation stack
//!
//! Comma-joined list of the cursors a client has paged through. The entries
//! are opaque here; only the listing decides what to push and pop.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationStack {
    entries: Vec<String>,
}

impl NavigationStack {
    /// Parse a comma-joined stack. Empty segments are dropped.
    pub fn parse(raw: &str) -> Self {
        Self {
            entries: raw
                .split(',')
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn push(&mut self, token: impl Into<String>) {
        let token = token.into();
        if !token.is_empty() {
            self.entries.push(token);
        }
    }

    pub fn pop(&mut self) -> Option<String> {
        self.entries.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Comma-joined form, `None` when there is nothing to carry.
    pub fn encode(&self) -> Option<String> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.join(","))
        }
    }
}

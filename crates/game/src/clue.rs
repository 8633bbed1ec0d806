//! Evidence items.

/// A piece of evidence lying in the mansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clue {
    pub label: String,
    pub category: &'static str,
    pub description: String,
    found: bool,
}

impl Clue {
    pub fn new(label: impl Into<String>, category: &'static str, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            category,
            description: description.into(),
            found: false,
        }
    }

    pub fn is_found(&self) -> bool {
        self.found
    }

    /// Flip to found. Returns false if it already was; found never resets.
    pub(crate) fn mark_found(&mut self) -> bool {
        if self.found {
            return false;
        }
        self.found = true;
        true
    }
}

//! Collector for non-fatal conversion anomalies.

/// Non-fatal anomalies gathered during a run.
///
/// Every entry is also emitted through `log::warn!` as it is recorded, so an
/// operator console sees it immediately while callers still get the full list
/// back in the conversion result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings {
    messages: Vec<String>,
}

impl Warnings {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log a warning.
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.messages.push(message);
    }

    /// Append all warnings of another collector without logging them again.
    pub fn extend(&mut self, other: Warnings) {
        self.messages.extend(other.messages);
    }

    /// Number of recorded warnings.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate over the recorded messages.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// Consume the collector.
    pub fn into_vec(self) -> Vec<String> {
        self.messages
    }
}

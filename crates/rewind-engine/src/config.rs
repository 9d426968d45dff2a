//! Configuration for attaching history to a container.

/// Configuration for history behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Record history for this container at all.
    pub enabled: bool,
    /// Maximum number of undo steps kept (unbounded when `None`).
    pub max_history: Option<usize>,
    /// Capacity of the history event channel.
    pub event_capacity: usize,
    /// Name used in log output.
    pub label: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_history: None,
            event_capacity: 100,
            label: "store".to_string(),
        }
    }
}

impl HistoryConfig {
    /// A configuration that attaches nothing.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// Builder for history configuration.
pub struct HistoryConfigBuilder {
    config: HistoryConfig,
}

impl HistoryConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: HistoryConfig::default(),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn max_history(mut self, max: usize) -> Self {
        self.config.max_history = Some(max);
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.config.max_history = None;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = label.into();
        self
    }

    pub fn build(self) -> HistoryConfig {
        self.config
    }
}

impl Default for HistoryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

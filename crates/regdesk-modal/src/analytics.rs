//! Analytics events

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt::Debug;

/// Event name emitted after an accepted registration
pub const FORM_SUBMISSION: &str = "form_submission";

/// A named event with string properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsEvent {
    /// Event name
    pub name: String,
    /// Properties, in insertion order
    pub properties: IndexMap<String, String>,
}

impl AnalyticsEvent {
    /// Event with no properties
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: IndexMap::new(),
        }
    }

    /// Add a property
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Property value
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Destination for analytics events
pub trait AnalyticsSink: Send + Sync + Debug {
    /// Record an event
    fn track(&self, event: AnalyticsEvent);
}

/// Logs events at `info`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        let properties = serde_json::to_string(&event.properties).unwrap_or_default();
        tracing::info!(event = %event.name, %properties, "Analytics event");
    }
}

/// Records events in memory
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl EventLog {
    /// Empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far
    #[must_use]
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().clone()
    }

    /// Events with the given name
    #[must_use]
    pub fn named(&self, name: &str) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.name == name)
            .cloned()
            .collect()
    }
}

impl AnalyticsSink for EventLog {
    fn track(&self, event: AnalyticsEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_log_filters_by_name() {
        let log = EventLog::new();
        log.track(AnalyticsEvent::new("page_view"));
        log.track(
            AnalyticsEvent::new(FORM_SUBMISSION)
                .with("competition", "hackathon")
                .with("team_size", "3"),
        );

        let submissions = log.named(FORM_SUBMISSION);
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].property("team_size"), Some("3"));
        assert_eq!(log.events().len(), 2);
    }
}

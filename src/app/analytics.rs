/// Receives named usage events with string properties.
pub trait AnalyticsSink {
    fn track(&self, event: &str, properties: &[(&str, String)]);
}

/// Emits analytics as `tracing` events under the `cvpage::analytics` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn track(&self, event: &str, properties: &[(&str, String)]) {
        tracing::info!(target: "cvpage::analytics", event, ?properties, "analytics event");
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingAnalytics {
    events: std::cell::RefCell<Vec<(String, Vec<(String, String)>)>>,
}

#[cfg(test)]
impl RecordingAnalytics {
    pub fn names(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn last(&self) -> Option<(String, Vec<(String, String)>)> {
        self.events.borrow().last().cloned()
    }
}

#[cfg(test)]
impl AnalyticsSink for RecordingAnalytics {
    fn track(&self, event: &str, properties: &[(&str, String)]) {
        self.events.borrow_mut().push((
            event.to_string(),
            properties
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        ));
    }
}

use crate::logging::{LogEvent, LogFields, LogLevel};
use crate::resolve::PassStats;
use serde_json::json;

/// Running totals across resolution passes.
#[derive(Debug, Default, Clone)]
pub struct ResolutionMetrics {
    passes: u64,
    failed_passes: u64,
    nodes_visited: u64,
    substitutions: u64,
    final_skips: u64,
}

impl ResolutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pass(&mut self, stats: &PassStats) {
        self.passes = self.passes.saturating_add(1);
        self.nodes_visited = self.nodes_visited.saturating_add(stats.nodes_visited as u64);
        self.substitutions = self.substitutions.saturating_add(stats.substitutions as u64);
        self.final_skips = self.final_skips.saturating_add(stats.final_skips as u64);
    }

    pub fn record_failure(&mut self) {
        self.failed_passes = self.failed_passes.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            passes: self.passes,
            failed_passes: self.failed_passes,
            nodes_visited: self.nodes_visited,
            substitutions: self.substitutions,
            final_skips: self.final_skips,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub passes: u64,
    pub failed_passes: u64,
    pub nodes_visited: u64,
    pub substitutions: u64,
    pub final_skips: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "resolution_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("passes".to_string(), json!(self.passes));
        map.insert("failed_passes".to_string(), json!(self.failed_passes));
        map.insert("nodes_visited".to_string(), json!(self.nodes_visited));
        map.insert("substitutions".to_string(), json!(self.substitutions));
        map.insert("final_skips".to_string(), json!(self.final_skips));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_pass_stats() {
        let mut metrics = ResolutionMetrics::new();
        let stats = PassStats {
            nodes_visited: 4,
            substitutions: 1,
            final_skips: 2,
        };
        metrics.record_pass(&stats);
        metrics.record_pass(&stats);
        metrics.record_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.passes, 2);
        assert_eq!(snapshot.failed_passes, 1);
        assert_eq!(snapshot.nodes_visited, 8);
        assert_eq!(snapshot.substitutions, 2);
        assert_eq!(snapshot.final_skips, 4);
    }

    #[test]
    fn snapshot_log_event_carries_fields() {
        let event = ResolutionMetrics::new()
            .snapshot()
            .to_log_event("layout::resolve.metrics");
        assert_eq!(event.message, "resolution_metrics");
        assert_eq!(event.target, "layout::resolve.metrics");
        assert_eq!(event.fields.get("passes"), Some(&json!(0)));
    }
}

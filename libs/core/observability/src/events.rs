//! Event-store metrics.

use metrics::counter;

/// Counters for event-store operations
pub struct EventStoreMetrics;

impl EventStoreMetrics {
    /// Count one store operation, e.g. `("create", "ok")` or `("get", "not_found")`
    pub fn record_operation(operation: &'static str, outcome: &'static str) {
        counter!(
            "event_store_operations_total",
            "operation" => operation,
            "outcome" => outcome
        )
        .increment(1);
    }

    /// Count a rejected creation; `reason` is `request_id` or `title_date`
    pub fn record_duplicate(reason: &'static str) {
        counter!("event_store_duplicates_total", "reason" => reason).increment(1);

        tracing::debug!(reason = reason, "Duplicate event rejected");
    }
}

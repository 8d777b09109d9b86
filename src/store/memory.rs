//! The Store: current snapshot plus bounded activity and insight logs.

use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use super::bounded_log::BoundedLog;
use super::classify::{classify_report, ReportSeverity};
use super::webhook::WebhookUpdate;
use crate::config::RetentionConfig;
use crate::types::{
    ActivityEntry, ActivityKind, InsightEntry, ServiceHealthSnapshot,
};

/// Fixed feed line for a healthy AI report.
pub const HEALTHY_REPORT_MESSAGE: &str = "System Health Check: All Systems Normal";

/// What a webhook changed.
#[derive(Debug, Clone, Default)]
pub struct WebhookOutcome {
    pub snapshot_replaced: bool,
    pub severity: Option<ReportSeverity>,
    pub activity: Option<ActivityEntry>,
    pub insight_id: Option<u64>,
}

/// Process-wide monitoring state. Share it behind an `Arc`.
#[derive(Debug)]
pub struct Store {
    inner: Mutex<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    snapshot: ServiceHealthSnapshot,
    activity: BoundedLog<ActivityEntry>,
    insights: BoundedLog<InsightEntry>,
    last_id: u64,
}

impl StoreInner {
    /// Millisecond clock reading, bumped so ids strictly increase across both logs.
    fn next_id(&mut self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        self.last_id = millis.max(self.last_id + 1);
        self.last_id
    }

    fn push_activity(&mut self, message: String, kind: ActivityKind) -> ActivityEntry {
        let timestamp = Utc::now();
        let entry = ActivityEntry {
            id: self.next_id(timestamp),
            timestamp,
            message,
            kind,
        };
        if self.activity.push(entry.clone()) > 0 {
            debug!(capacity = self.activity.capacity(), "Activity log full, dropped oldest entry");
        }
        entry
    }

    fn push_insight(&mut self, analysis: String) -> u64 {
        let timestamp = Utc::now();
        let id = self.next_id(timestamp);
        if self.insights.push(InsightEntry { id, timestamp, analysis }) > 0 {
            debug!(capacity = self.insights.capacity(), "Insight log full, dropped oldest entry");
        }
        id
    }
}

impl Store {
    /// Store seeded with every known service at code 0.
    pub fn new<I, S>(known_services: I, retention: &RetentionConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: Mutex::new(StoreInner {
                snapshot: ServiceHealthSnapshot::with_services(known_services),
                activity: BoundedLog::with_capacity(retention.activity_capacity),
                insights: BoundedLog::with_capacity(retention.insight_capacity),
                last_id: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(|e| {
            warn!("Store mutex poisoned, recovering");
            e.into_inner()
        })
    }

    pub fn snapshot(&self) -> ServiceHealthSnapshot {
        self.lock().snapshot.clone()
    }

    /// Activity feed, newest first.
    pub fn activity(&self) -> Vec<ActivityEntry> {
        self.lock().activity.to_vec()
    }

    /// Stored insights, newest first.
    pub fn insights(&self) -> Vec<InsightEntry> {
        self.lock().insights.to_vec()
    }

    /// Append a feed line, evicting the oldest one past capacity.
    pub fn record_activity(&self, message: impl Into<String>, kind: ActivityKind) -> ActivityEntry {
        self.lock().push_activity(message.into(), kind)
    }

    /// Apply a webhook update in one critical section.
    ///
    /// - `metrics` replaces the service table wholesale and refreshes `lastUpdated`
    /// - a CRITICAL/DEGRADED report is logged verbatim as an alert
    /// - otherwise a HEALTHY report logs [`HEALTHY_REPORT_MESSAGE`] (every time)
    /// - `raw_analysis` is stored as an insight without inspection
    pub fn apply_webhook(&self, update: WebhookUpdate) -> WebhookOutcome {
        let mut inner = self.lock();
        let mut outcome = WebhookOutcome::default();

        if let Some(services) = update.metrics {
            inner.snapshot = ServiceHealthSnapshot {
                services,
                last_updated: Utc::now(),
            };
            outcome.snapshot_replaced = true;
        }

        if let Some(report) = update.ai_report {
            outcome.severity = classify_report(&report);
            outcome.activity = match outcome.severity {
                Some(severity) if severity.is_incident() => {
                    Some(inner.push_activity(report, severity.activity_kind()))
                }
                Some(ReportSeverity::Healthy) => Some(
                    inner.push_activity(HEALTHY_REPORT_MESSAGE.to_string(), ActivityKind::Success),
                ),
                _ => None,
            };
        }

        if let Some(analysis) = update.raw_analysis {
            outcome.insight_id = Some(inner.push_insight(analysis));
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ServiceHealth;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn store() -> Store {
        Store::new(["auth", "payment", "notification"], &RetentionConfig::default())
    }

    fn metrics(entries: &[(&str, i64)]) -> BTreeMap<String, ServiceHealth> {
        entries
            .iter()
            .map(|(n, c)| ((*n).to_string(), ServiceHealth::new(*c)))
            .collect()
    }

    fn report(text: &str) -> WebhookUpdate {
        WebhookUpdate {
            ai_report: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_snapshot_has_known_services_unknown() {
        let snap = store().snapshot();
        assert_eq!(snap.services.len(), 3);
        assert!(snap.services.values().all(|h| h.code == 0));
        assert!(store().activity().is_empty());
        assert!(store().insights().is_empty());
    }

    #[test]
    fn test_metrics_replace_wholesale() {
        let store = store();
        let before = store.snapshot().last_updated;
        let outcome = store.apply_webhook(WebhookUpdate {
            metrics: Some(metrics(&[("auth", 200), ("payment", 200)])),
            ..Default::default()
        });

        assert!(outcome.snapshot_replaced);
        let snap = store.snapshot();
        assert_eq!(snap.code_of("auth"), Some(200));
        assert_eq!(snap.code_of("payment"), Some(200));
        assert_eq!(snap.code_of("notification"), None);
        assert_eq!(snap.services.len(), 2);
        assert!(snap.last_updated >= before);
    }

    #[test]
    fn test_no_metrics_keeps_snapshot() {
        let store = store();
        store.apply_webhook(WebhookUpdate {
            metrics: Some(metrics(&[("auth", 503)])),
            ..Default::default()
        });
        let first = store.snapshot();
        store.apply_webhook(report("All systems HEALTHY"));
        assert_eq!(store.snapshot(), first);
    }

    #[test]
    fn test_critical_report_logs_full_text_as_alert() {
        let store = store();
        let text = "System is CRITICAL: payment down";
        let outcome = store.apply_webhook(report(text));

        assert_eq!(outcome.severity, Some(ReportSeverity::Critical));
        let activity = store.activity();
        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0].kind, ActivityKind::Alert);
        assert_eq!(activity[0].message, text);
    }

    #[test]
    fn test_degraded_report_logs_alert() {
        let store = store();
        store.apply_webhook(report("notification DEGRADED"));
        let activity = store.activity();
        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0].kind, ActivityKind::Alert);
    }

    #[test]
    fn test_healthy_report_is_not_deduplicated() {
        let store = store();
        store.apply_webhook(report("All systems HEALTHY"));
        store.apply_webhook(report("All systems HEALTHY"));

        let activity = store.activity();
        assert_eq!(activity.len(), 2);
        for entry in &activity {
            assert_eq!(entry.kind, ActivityKind::Success);
            assert_eq!(entry.message, HEALTHY_REPORT_MESSAGE);
        }
    }

    #[test]
    fn test_unclassified_report_logs_nothing() {
        let store = store();
        let outcome = store.apply_webhook(report("routine check complete"));
        assert!(outcome.activity.is_none());
        assert!(store.activity().is_empty());
    }

    #[test]
    fn test_raw_analysis_stored_verbatim() {
        let store = store();
        let raw = r#"{"severity":"critical","summary":"payment CRITICAL"}"#;
        let outcome = store.apply_webhook(WebhookUpdate {
            raw_analysis: Some(raw.to_string()),
            ..Default::default()
        });

        let insights = store.insights();
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].analysis, raw);
        assert_eq!(outcome.insight_id, Some(insights[0].id));
        // Insight alone never touches the feed
        assert!(store.activity().is_empty());
    }

    #[test]
    fn test_activity_capped_at_fifty_newest_first() {
        let store = store();
        for i in 0..73 {
            store.record_activity(format!("event {i}"), ActivityKind::Info);
        }
        let activity = store.activity();
        assert_eq!(activity.len(), 50);
        assert_eq!(activity[0].message, "event 72");
        assert_eq!(activity[49].message, "event 23");
        assert!(activity.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[test]
    fn test_insights_capped_at_twenty_newest_first() {
        let store = store();
        for i in 0..31 {
            store.apply_webhook(WebhookUpdate {
                raw_analysis: Some(format!("analysis {i}")),
                ..Default::default()
            });
        }
        let insights = store.insights();
        assert_eq!(insights.len(), 20);
        assert_eq!(insights[0].analysis, "analysis 30");
        assert_eq!(insights[19].analysis, "analysis 11");
    }

    #[test]
    fn test_ids_unique_across_logs() {
        let store = store();
        let a = store.record_activity("one", ActivityKind::Info);
        let outcome = store.apply_webhook(WebhookUpdate {
            ai_report: Some("payment CRITICAL".to_string()),
            raw_analysis: Some("x".to_string()),
            ..Default::default()
        });
        let b = outcome.activity.unwrap();
        let c = outcome.insight_id.unwrap();
        assert!(a.id < b.id);
        assert!(b.id < c);
    }

    #[test]
    fn test_custom_retention() {
        let store = Store::new(
            ["auth"],
            &RetentionConfig {
                activity_capacity: 2,
                insight_capacity: 1,
            },
        );
        for _ in 0..5 {
            store.record_activity("x", ActivityKind::Success);
        }
        assert_eq!(store.activity().len(), 2);
    }

    #[test]
    fn test_concurrent_appends_respect_cap() {
        let store = Arc::new(store());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store.record_activity(format!("{t}-{i}"), ActivityKind::Info);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let activity = store.activity();
        assert_eq!(activity.len(), 50);
        assert!(activity.windows(2).all(|w| w[0].id > w[1].id));
    }
}

// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the Memcached operator.
//!
//! Every collector lives in [`METRICS_REGISTRY`], which prefixes names with
//! `memcached_operator_`. Besides reconcile counts and latency, the operator exports
//! what it does to Deployments and how far each `Memcached` is from its desired size:
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `reconciliations_total` | counter | `result` |
//! | `reconcile_duration_seconds` | histogram | |
//! | `requeues_total` | counter | `reason` |
//! | `reconcile_errors_total` | counter | `cause` |
//! | `deployments_created_total` | counter | |
//! | `deployment_create_conflicts_total` | counter | |
//! | `deployments_scaled_total` | counter | `direction` |
//! | `spec_validation_failures_total` | counter | |
//! | `desired_replicas` | gauge | `namespace`, `name` |
//! | `available_replicas` | gauge | `namespace`, `name` |

use prometheus::core::Collector;
use prometheus::{
    histogram_opts, opts, Encoder, Histogram, IntCounter, IntCounterVec, IntGaugeVec, Registry,
    TextEncoder,
};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::warn;

const METRICS_PREFIX: &str = "memcached_operator";

/// Registry served on `/metrics`.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(|| {
    Registry::new_custom(Some(METRICS_PREFIX.to_string()), None)
        .expect("metrics prefix is not empty")
});

fn register<C: Collector + Clone + 'static>(collector: C) -> C {
    if let Err(e) = METRICS_REGISTRY.register(Box::new(collector.clone())) {
        warn!(error = %e, "Failed to register metric");
    }
    collector
}

/// Why a `Memcached` was put back on the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequeueReason {
    /// Deployment is available, periodic resync
    Ready,
    /// Waiting for replicas to become available
    NotReady,
    /// Reconcile failed
    Error,
}

impl RequeueReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::NotReady => "not_ready",
            Self::Error => "error",
        }
    }
}

/// What made a reconcile fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCause {
    /// The `Memcached` spec is out of bounds
    InvalidSpec,
    /// A call to the Kubernetes API failed
    Api,
    /// Anything else
    Other,
}

impl ErrorCause {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidSpec => "invalid_spec",
            Self::Api => "api",
            Self::Other => "other",
        }
    }
}

pub static RECONCILIATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register(
        IntCounterVec::new(
            opts!("reconciliations_total", "Memcached reconciles by result"),
            &["result"],
        )
        .expect("valid reconciliations_total"),
    )
});

pub static RECONCILE_DURATION_SECONDS: LazyLock<Histogram> = LazyLock::new(|| {
    register(
        Histogram::with_opts(histogram_opts!(
            "reconcile_duration_seconds",
            "Time spent reconciling one Memcached",
            vec![0.005, 0.025, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
        ))
        .expect("valid reconcile_duration_seconds"),
    )
});

pub static REQUEUES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register(
        IntCounterVec::new(
            opts!("requeues_total", "Memcached requeues by reason"),
            &["reason"],
        )
        .expect("valid requeues_total"),
    )
});

pub static RECONCILE_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register(
        IntCounterVec::new(
            opts!("reconcile_errors_total", "Failed Memcached reconciles by cause"),
            &["cause"],
        )
        .expect("valid reconcile_errors_total"),
    )
});

pub static DEPLOYMENTS_CREATED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    register(
        IntCounter::new(
            "deployments_created_total",
            "Deployments created for Memcached resources",
        )
        .expect("valid deployments_created_total"),
    )
});

pub static DEPLOYMENT_CREATE_CONFLICTS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    register(
        IntCounter::new(
            "deployment_create_conflicts_total",
            "Deployment creates that found the Deployment already present",
        )
        .expect("valid deployment_create_conflicts_total"),
    )
});

pub static DEPLOYMENTS_SCALED_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register(
        IntCounterVec::new(
            opts!("deployments_scaled_total", "Deployment replica patches by direction"),
            &["direction"],
        )
        .expect("valid deployments_scaled_total"),
    )
});

pub static SPEC_VALIDATION_FAILURES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    register(
        IntCounter::new(
            "spec_validation_failures_total",
            "Memcached specs rejected before touching the Deployment",
        )
        .expect("valid spec_validation_failures_total"),
    )
});

pub static DESIRED_REPLICAS: LazyLock<IntGaugeVec> = LazyLock::new(|| {
    register(
        IntGaugeVec::new(
            opts!("desired_replicas", "spec.size of each Memcached"),
            &["namespace", "name"],
        )
        .expect("valid desired_replicas"),
    )
});

pub static AVAILABLE_REPLICAS: LazyLock<IntGaugeVec> = LazyLock::new(|| {
    register(
        IntGaugeVec::new(
            opts!(
                "available_replicas",
                "Available replicas of the Deployment owned by each Memcached"
            ),
            &["namespace", "name"],
        )
        .expect("valid available_replicas"),
    )
});

/// Count a finished reconcile and observe how long it took.
pub fn observe_reconcile(succeeded: bool, elapsed: Duration) {
    let result = if succeeded { "success" } else { "error" };
    RECONCILIATIONS_TOTAL.with_label_values(&[result]).inc();
    RECONCILE_DURATION_SECONDS.observe(elapsed.as_secs_f64());
}

pub fn record_requeue(reason: RequeueReason) {
    REQUEUES_TOTAL.with_label_values(&[reason.as_str()]).inc();
}

pub fn record_reconcile_error(cause: ErrorCause) {
    RECONCILE_ERRORS_TOTAL.with_label_values(&[cause.as_str()]).inc();
}

pub fn record_deployment_created() {
    DEPLOYMENTS_CREATED_TOTAL.inc();
}

pub fn record_deployment_create_conflict() {
    DEPLOYMENT_CREATE_CONFLICTS_TOTAL.inc();
}

/// Count a replica patch. A Deployment without `spec.replicas` counts as 0.
pub fn record_deployment_scaled(from: Option<i32>, to: i32) {
    let direction = if to >= from.unwrap_or(0) { "up" } else { "down" };
    DEPLOYMENTS_SCALED_TOTAL.with_label_values(&[direction]).inc();
}

pub fn record_spec_validation_failure() {
    SPEC_VALIDATION_FAILURES_TOTAL.inc();
}

/// Publish desired and available replicas for one `Memcached`.
pub fn set_replicas(namespace: &str, name: &str, desired: i32, available: i32) {
    DESIRED_REPLICAS
        .with_label_values(&[namespace, name])
        .set(i64::from(desired));
    AVAILABLE_REPLICAS
        .with_label_values(&[namespace, name])
        .set(i64::from(available));
}

/// Drop the replica gauges of a `Memcached` that is going away.
pub fn forget_memcached(namespace: &str, name: &str) {
    // Missing series are fine: the object may never have been reconciled
    let _ = DESIRED_REPLICAS.remove_label_values(&[namespace, name]);
    let _ = AVAILABLE_REPLICAS.remove_label_values(&[namespace, name]);
}

/// Encode every registered metric in the Prometheus text format.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&METRICS_REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replica_gauges_track_convergence() {
        let labels = ["metrics-ns", "converging"];

        set_replicas("metrics-ns", "converging", 3, 1);
        assert_eq!(DESIRED_REPLICAS.with_label_values(&labels).get(), 3);
        assert_eq!(AVAILABLE_REPLICAS.with_label_values(&labels).get(), 1);

        set_replicas("metrics-ns", "converging", 3, 3);
        assert_eq!(AVAILABLE_REPLICAS.with_label_values(&labels).get(), 3);
    }

    #[test]
    fn test_forget_memcached_removes_series() {
        set_replicas("metrics-ns", "deleted", 2, 2);
        forget_memcached("metrics-ns", "deleted");

        let text = gather_metrics().unwrap();
        assert!(!text.contains("name=\"deleted\""));

        // Forgetting twice is harmless
        forget_memcached("metrics-ns", "deleted");
    }

    #[test]
    fn test_scale_direction() {
        let up = DEPLOYMENTS_SCALED_TOTAL.with_label_values(&["up"]);
        let down = DEPLOYMENTS_SCALED_TOTAL.with_label_values(&["down"]);
        let (up_before, down_before) = (up.get(), down.get());

        record_deployment_scaled(Some(2), 3);
        record_deployment_scaled(None, 1);
        record_deployment_scaled(Some(3), 0);

        assert!(up.get() >= up_before + 2);
        assert!(down.get() > down_before);
    }

    #[test]
    fn test_reconcile_outcomes_are_split_by_result() {
        let errors = RECONCILIATIONS_TOTAL.with_label_values(&["error"]);
        let before = errors.get();
        let samples_before = RECONCILE_DURATION_SECONDS.get_sample_count();

        observe_reconcile(false, Duration::from_millis(20));

        assert!(errors.get() > before);
        assert!(RECONCILE_DURATION_SECONDS.get_sample_count() > samples_before);
    }

    #[test]
    fn test_exposition_uses_operator_prefix() {
        record_spec_validation_failure();
        record_requeue(RequeueReason::NotReady);

        let text = gather_metrics().unwrap();
        assert!(text.contains("memcached_operator_spec_validation_failures_total"));
        assert!(text.contains("memcached_operator_requeues_total{reason=\"not_ready\"}"));
    }
}

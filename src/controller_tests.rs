// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `controller.rs`

#[cfg(test)]
mod tests {
    use super::super::{error_policy, reconcile, requeue_action, ReconcileError};
    use crate::config::OperatorConfig;
    use crate::context::Context;
    use crate::crd::{Memcached, MemcachedSpec, MemcachedStatus};
    use crate::metrics::{self, ErrorCause};
    use crate::reconcilers::status::create_condition;
    use crate::reconcilers::validate_spec;
    use http::{Request, Response};
    use kube::client::Body;
    use kube::runtime::controller::Action;
    use kube::{Client, Resource};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    /// Context whose client has no apiserver behind it
    fn offline_context(config: OperatorConfig) -> Arc<Context> {
        let (mock_service, _handle) = tower_test::mock::pair::<Request<Body>, Response<Body>>();
        Arc::new(Context::new(Client::new(mock_service, "default"), config))
    }

    fn test_memcached() -> Memcached {
        let mut memcached = Memcached::new(
            "controller-test",
            MemcachedSpec {
                size: 2,
                container_port: 11211,
            },
        );
        memcached.meta_mut().namespace = Some("controller-ns".into());
        memcached
    }

    fn status_with_available(value: &str) -> MemcachedStatus {
        MemcachedStatus {
            conditions: vec![create_condition("Available", value, "Test", "test")],
            ..Default::default()
        }
    }

    #[test]
    fn test_requeue_when_available() {
        let config = OperatorConfig::default();
        let action = requeue_action(&status_with_available("True"), &config);
        assert_eq!(action, Action::requeue(Duration::from_secs(300)));
    }

    #[test]
    fn test_requeue_when_not_available() {
        let config = OperatorConfig::default();

        assert_eq!(
            requeue_action(&status_with_available("False"), &config),
            Action::requeue(Duration::from_secs(30))
        );
        assert_eq!(
            requeue_action(&MemcachedStatus::default(), &config),
            Action::requeue(Duration::from_secs(30)),
            "missing conditions count as not available"
        );
    }

    #[test]
    fn test_requeue_uses_configured_intervals() {
        let config = OperatorConfig {
            ready_requeue_secs: 600,
            not_ready_requeue_secs: 5,
            ..OperatorConfig::default()
        };

        assert_eq!(
            requeue_action(&status_with_available("True"), &config),
            Action::requeue(Duration::from_secs(600))
        );
        assert_eq!(
            requeue_action(&status_with_available("Unknown"), &config),
            Action::requeue(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_reconcile_error_is_transparent() {
        let err: ReconcileError = anyhow::anyhow!("failed to get Deployment test-ns/cache").into();
        assert_eq!(err.to_string(), "failed to get Deployment test-ns/cache");
    }

    #[test]
    fn test_reconcile_error_cause() {
        let invalid = validate_spec(&MemcachedSpec {
            size: -1,
            container_port: 11211,
        })
        .unwrap_err();
        let err: ReconcileError = anyhow::Error::new(invalid)
            .context("invalid spec for Memcached ns/cache")
            .into();
        assert_eq!(err.cause(), ErrorCause::InvalidSpec);

        let decode = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: ReconcileError = anyhow::Error::new(kube::Error::SerdeError(decode))
            .context("failed to get Deployment ns/cache")
            .into();
        assert_eq!(err.cause(), ErrorCause::Api);

        let err: ReconcileError = anyhow::anyhow!("something else").into();
        assert_eq!(err.cause(), ErrorCause::Other);
    }

    #[tokio::test]
    async fn test_error_policy_requeues_after_error_interval() {
        let ctx = offline_context(OperatorConfig {
            error_requeue_secs: 7,
            ..OperatorConfig::default()
        });
        let errors = metrics::RECONCILE_ERRORS_TOTAL.with_label_values(&["other"]);
        let requeues = metrics::REQUEUES_TOTAL.with_label_values(&["error"]);
        let (errors_before, requeues_before) = (errors.get(), requeues.get());

        let err: ReconcileError = anyhow::anyhow!("apiserver unavailable").into();
        let action = error_policy(Arc::new(test_memcached()), &err, ctx);

        assert_eq!(action, Action::requeue(Duration::from_secs(7)));
        assert!(errors.get() > errors_before, "error counter increments");
        assert!(requeues.get() > requeues_before, "error requeue is counted");
    }

    #[tokio::test]
    async fn test_error_policy_counts_invalid_spec() {
        let ctx = offline_context(OperatorConfig::default());
        let errors = metrics::RECONCILE_ERRORS_TOTAL.with_label_values(&["invalid_spec"]);
        let before = errors.get();

        let invalid = validate_spec(&MemcachedSpec {
            size: 1,
            container_port: 0,
        })
        .unwrap_err();
        let err: ReconcileError = anyhow::Error::new(invalid).into();
        let action = error_policy(Arc::new(test_memcached()), &err, ctx);

        assert_eq!(action, Action::requeue(Duration::from_secs(30)));
        assert!(errors.get() > before);
    }

    #[tokio::test]
    async fn test_reconcile_wrapper_requeues_and_counts_success() {
        let ctx = offline_context(OperatorConfig {
            not_ready_requeue_secs: 12,
            ..OperatorConfig::default()
        });
        let successes = metrics::RECONCILIATIONS_TOTAL.with_label_values(&["success"]);
        let before = successes.get();

        // Objects being deleted are skipped without any API call
        let mut memcached = test_memcached();
        memcached.meta_mut().deletion_timestamp =
            Some(serde_json::from_value(json!("2025-06-01T12:00:00Z")).unwrap());

        let action = reconcile(Arc::new(memcached), ctx)
            .await
            .expect("deleted objects reconcile cleanly");

        assert_eq!(action, Action::requeue(Duration::from_secs(12)));
        assert!(successes.get() > before);
    }
}

// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Status computation and patching for `Memcached` resources.
//!
//! The status reports what the operator last observed on the owned Deployment,
//! expressed as three conditions following the Kubernetes conventions:
//!
//! - `Available` - at least `spec.size` replicas are available
//! - `Progressing` - the Deployment is being created or scaled
//! - `Degraded` - the spec cannot be reconciled as written
//!
//! # Example
//!
//! ```rust,no_run
//! use memcached_operator::reconcilers::status::create_condition;
//!
//! let condition = create_condition(
//!     "Available",
//!     "True",
//!     "AllReplicasAvailable",
//!     "All 3 replicas are available",
//! );
//! ```

use super::status_changed;
use crate::crd::{Condition, Memcached, MemcachedStatus};
use crate::status_reasons::{
    CONDITION_STATUS_FALSE, CONDITION_STATUS_TRUE, CONDITION_STATUS_UNKNOWN,
    CONDITION_TYPE_AVAILABLE, CONDITION_TYPE_DEGRADED, CONDITION_TYPE_PROGRESSING,
    REASON_ALL_REPLICAS_AVAILABLE, REASON_CONFIGURATION_INVALID, REASON_CONFIGURATION_VALID,
    REASON_DEPLOYMENT_CREATED, REASON_MINIMUM_REPLICAS_UNAVAILABLE, REASON_REPLICAS_CONVERGED,
    REASON_SCALING_REPLICA_SET,
};
use anyhow::{Context as _, Result};
use chrono::Utc;
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, ResourceExt};
use serde_json::json;
use tracing::debug;

/// What the reconciler did to the Deployment during this pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeploymentChange {
    /// The Deployment did not exist and was created
    Created,
    /// The Deployment replica count was patched to `spec.size`
    Scaled,
    /// The Deployment already matched
    Unchanged,
}

/// Create a new Kubernetes condition with the current timestamp.
///
/// # Arguments
///
/// * `condition_type` - The type of condition (e.g., "Available")
/// * `status` - The status: "True", "False", or "Unknown"
/// * `reason` - A programmatic identifier in `CamelCase`
/// * `message` - A human-readable explanation
#[must_use]
pub fn create_condition(
    condition_type: &str,
    status: &str,
    reason: &str,
    message: &str,
) -> Condition {
    Condition {
        r#type: condition_type.to_string(),
        status: status.to_string(),
        reason: Some(reason.to_string()),
        message: Some(message.to_string()),
        last_transition_time: Some(Utc::now().to_rfc3339()),
    }
}

/// Find a condition by type in a list of conditions.
#[must_use]
pub fn find_condition<'a>(
    conditions: &'a [Condition],
    condition_type: &str,
) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.r#type == condition_type)
}

/// Update or add a condition in a mutable conditions list (in-memory, no API call).
///
/// Preserves the `lastTransitionTime` if the status hasn't changed, or sets a new
/// timestamp if it has.
pub fn update_condition_in_memory(
    conditions: &mut Vec<Condition>,
    condition_type: &str,
    status: &str,
    reason: &str,
    message: &str,
) {
    if let Some(existing) = conditions.iter_mut().find(|c| c.r#type == condition_type) {
        let last_transition_time = if existing.status == status {
            existing
                .last_transition_time
                .clone()
                .unwrap_or_else(|| Utc::now().to_rfc3339())
        } else {
            Utc::now().to_rfc3339()
        };

        existing.status = status.to_string();
        existing.reason = Some(reason.to_string());
        existing.message = Some(message.to_string());
        existing.last_transition_time = Some(last_transition_time);
    } else {
        conditions.push(create_condition(condition_type, status, reason, message));
    }
}

/// Compare two condition lists ignoring `lastTransitionTime`.
///
/// # Returns
///
/// * `true` - The conditions are semantically equal (no update needed)
/// * `false` - The conditions differ (update needed)
#[must_use]
pub fn conditions_equal(current: &[Condition], new: &[Condition]) -> bool {
    if current.len() != new.len() {
        return false;
    }

    new.iter().all(|new_cond| {
        find_condition(current, &new_cond.r#type).is_some_and(|curr_cond| {
            curr_cond.status == new_cond.status
                && curr_cond.reason == new_cond.reason
                && curr_cond.message == new_cond.message
        })
    })
}

/// Check whether `new` differs from the status currently stored on the resource.
///
/// Writing an unchanged status would trigger another watch event and another
/// reconcile, so callers skip the patch when this returns `false`.
#[must_use]
pub fn status_needs_update(current: Option<&MemcachedStatus>, new: &MemcachedStatus) -> bool {
    let Some(current) = current else {
        return true;
    };

    status_changed(&current.observed_generation, &new.observed_generation)
        || status_changed(&current.replicas, &new.replicas)
        || status_changed(&current.ready_replicas, &new.ready_replicas)
        || status_changed(&current.available_replicas, &new.available_replicas)
        || !conditions_equal(&current.conditions, &new.conditions)
}

/// Compute the `Memcached` status from the Deployment the reconciler just observed or wrote.
///
/// Existing conditions are carried over so their `lastTransitionTime` is kept when
/// their status does not flip.
#[must_use]
pub fn compute_status(
    memcached: &Memcached,
    deployment: &Deployment,
    change: DeploymentChange,
) -> MemcachedStatus {
    let desired = memcached.spec.size;
    let deployment_status = deployment.status.as_ref();
    let ready = deployment_status
        .and_then(|s| s.ready_replicas)
        .unwrap_or(0);
    let available = deployment_status
        .and_then(|s| s.available_replicas)
        .unwrap_or(0);

    let mut conditions = existing_conditions(memcached);

    if available >= desired {
        update_condition_in_memory(
            &mut conditions,
            CONDITION_TYPE_AVAILABLE,
            CONDITION_STATUS_TRUE,
            REASON_ALL_REPLICAS_AVAILABLE,
            &format!("All {desired} replicas are available"),
        );
    } else {
        update_condition_in_memory(
            &mut conditions,
            CONDITION_TYPE_AVAILABLE,
            CONDITION_STATUS_FALSE,
            REASON_MINIMUM_REPLICAS_UNAVAILABLE,
            &format!("{available}/{desired} replicas are available"),
        );
    }

    let (progressing_status, progressing_reason, progressing_message) = match change {
        DeploymentChange::Created => (
            CONDITION_STATUS_TRUE,
            REASON_DEPLOYMENT_CREATED,
            format!("Created Deployment with {desired} replicas"),
        ),
        DeploymentChange::Scaled => (
            CONDITION_STATUS_TRUE,
            REASON_SCALING_REPLICA_SET,
            format!("Scaling Deployment to {desired} replicas"),
        ),
        DeploymentChange::Unchanged if available < desired => (
            CONDITION_STATUS_TRUE,
            REASON_SCALING_REPLICA_SET,
            format!("Waiting for {desired} replicas to become available"),
        ),
        DeploymentChange::Unchanged => (
            CONDITION_STATUS_FALSE,
            REASON_REPLICAS_CONVERGED,
            format!("Deployment has {desired} available replicas"),
        ),
    };
    update_condition_in_memory(
        &mut conditions,
        CONDITION_TYPE_PROGRESSING,
        progressing_status,
        progressing_reason,
        &progressing_message,
    );

    update_condition_in_memory(
        &mut conditions,
        CONDITION_TYPE_DEGRADED,
        CONDITION_STATUS_FALSE,
        REASON_CONFIGURATION_VALID,
        "Spec is valid",
    );

    MemcachedStatus {
        conditions,
        observed_generation: memcached.metadata.generation,
        replicas: Some(desired),
        ready_replicas: Some(ready),
        available_replicas: Some(available),
    }
}

/// Status reported when the spec fails validation.
///
/// Replica counts from the previous status are kept since the Deployment was not touched.
#[must_use]
pub fn invalid_spec_status(memcached: &Memcached, message: &str) -> MemcachedStatus {
    let previous = memcached.status.clone().unwrap_or_default();
    let mut conditions = previous.conditions.clone();

    update_condition_in_memory(
        &mut conditions,
        CONDITION_TYPE_DEGRADED,
        CONDITION_STATUS_TRUE,
        REASON_CONFIGURATION_INVALID,
        message,
    );

    if find_condition(&conditions, CONDITION_TYPE_AVAILABLE).is_none() {
        update_condition_in_memory(
            &mut conditions,
            CONDITION_TYPE_AVAILABLE,
            CONDITION_STATUS_UNKNOWN,
            REASON_CONFIGURATION_INVALID,
            "Deployment is not reconciled while the spec is invalid",
        );
    }

    MemcachedStatus {
        conditions,
        observed_generation: memcached.metadata.generation,
        ..previous
    }
}

fn existing_conditions(memcached: &Memcached) -> Vec<Condition> {
    memcached
        .status
        .as_ref()
        .map(|s| s.conditions.clone())
        .unwrap_or_default()
}

/// Patch the `Memcached` status subresource if it changed.
///
/// # Returns
///
/// `true` when a patch was sent, `false` when the status was already current.
///
/// # Errors
///
/// Returns an error if the status patch fails.
pub async fn update_status(
    client: &Client,
    memcached: &Memcached,
    new_status: &MemcachedStatus,
) -> Result<bool> {
    let namespace = memcached.namespace().unwrap_or_default();
    let name = memcached.name_any();

    if !status_needs_update(memcached.status.as_ref(), new_status) {
        debug!(
            "Status unchanged for Memcached {}/{}, skipping patch",
            namespace, name
        );
        return Ok(false);
    }

    let api: Api<Memcached> = Api::namespaced(client.clone(), &namespace);
    let patch = json!({ "status": new_status });
    api.patch_status(&name, &PatchParams::default(), &Patch::Merge(patch))
        .await
        .with_context(|| format!("failed to patch status of Memcached {namespace}/{name}"))?;

    debug!(
        namespace = %namespace,
        name = %name,
        available = new_status.is_available(),
        "Patched Memcached status"
    );

    Ok(true)
}

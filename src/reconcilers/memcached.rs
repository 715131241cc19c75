// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `Memcached` reconciliation logic.
//!
//! Each `Memcached` owns exactly one `Deployment` with the same name and namespace.
//! The reconciler makes sure that Deployment exists and runs `spec.size` replicas,
//! then reports what it observed in the `Memcached` status.

use super::should_reconcile;
use super::status::{compute_status, invalid_spec_status, update_status, DeploymentChange};
use crate::constants::{FIELD_MANAGER, MAX_CONTAINER_PORT, MAX_MEMCACHED_SIZE, MIN_CONTAINER_PORT};
use crate::context::Context;
use crate::crd::{Memcached, MemcachedSpec, MemcachedStatus};
use crate::memcached_resources::{build_deployment, deployment_replicas, replicas_need_update};
use crate::metrics;
use anyhow::{Context as _, Result};
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::{Patch, PatchParams, PostParams};
use kube::{Api, Client, ResourceExt};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A `Memcached` spec field is out of bounds.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct InvalidSpecError(String);

/// Validate a `Memcached` spec before touching the cluster.
///
/// The CRD schema already bounds both fields, but objects written before the schema
/// was installed (or with validation disabled) can still carry bad values.
///
/// # Errors
///
/// Returns an [`InvalidSpecError`] describing the first invalid field.
pub fn validate_spec(spec: &MemcachedSpec) -> Result<(), InvalidSpecError> {
    if spec.size < 0 {
        return Err(InvalidSpecError(format!(
            "spec.size must not be negative, got {}",
            spec.size
        )));
    }
    if spec.size > MAX_MEMCACHED_SIZE {
        return Err(InvalidSpecError(format!(
            "spec.size must be at most {MAX_MEMCACHED_SIZE}, got {}",
            spec.size
        )));
    }
    if !(MIN_CONTAINER_PORT..=MAX_CONTAINER_PORT).contains(&spec.container_port) {
        return Err(InvalidSpecError(format!(
            "spec.containerPort must be between {MIN_CONTAINER_PORT} and {MAX_CONTAINER_PORT}, got {}",
            spec.container_port
        )));
    }
    Ok(())
}

/// Make sure the Deployment for `memcached` exists with `spec.size` replicas.
///
/// - Absent: created from [`build_deployment`]
/// - Present with a different replica count: `spec.replicas` is merge-patched
/// - Present and matching: left alone
///
/// A create that loses a race with another writer (HTTP 409) falls back to the
/// existing Deployment.
///
/// # Errors
///
/// Returns an error if any Kubernetes API call fails.
pub async fn ensure_deployment(
    client: &Client,
    memcached: &Memcached,
    image: &str,
) -> Result<(Deployment, DeploymentChange)> {
    let namespace = memcached.namespace().unwrap_or_default();
    let name = memcached.name_any();
    let desired = memcached.spec.size;
    let api: Api<Deployment> = Api::namespaced(client.clone(), &namespace);

    let existing = api
        .get_opt(&name)
        .await
        .with_context(|| format!("failed to get Deployment {namespace}/{name}"))?;

    let existing = match existing {
        Some(deployment) => deployment,
        None => {
            let deployment = build_deployment(memcached, image);
            let params = PostParams {
                field_manager: Some(FIELD_MANAGER.to_string()),
                ..Default::default()
            };

            match api.create(&params, &deployment).await {
                Ok(created) => {
                    info!(
                        namespace = %namespace,
                        name = %name,
                        replicas = desired,
                        "Created Deployment for Memcached"
                    );
                    metrics::record_deployment_created();
                    return Ok((created, DeploymentChange::Created));
                }
                Err(kube::Error::Api(ae)) if ae.code == 409 => {
                    metrics::record_deployment_create_conflict();
                    debug!(
                        "Deployment {}/{} was created concurrently, using existing one",
                        namespace, name
                    );
                    api.get(&name)
                        .await
                        .with_context(|| format!("failed to get Deployment {namespace}/{name}"))?
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("failed to create Deployment {namespace}/{name}"));
                }
            }
        }
    };

    if !replicas_need_update(&existing, desired) {
        debug!(
            "Deployment {}/{} already has {} replicas",
            namespace, name, desired
        );
        return Ok((existing, DeploymentChange::Unchanged));
    }

    let current = deployment_replicas(&existing);
    let patch = json!({ "spec": { "replicas": desired } });
    let params = PatchParams {
        field_manager: Some(FIELD_MANAGER.to_string()),
        ..Default::default()
    };
    let scaled = api
        .patch(&name, &params, &Patch::Merge(&patch))
        .await
        .with_context(|| format!("failed to scale Deployment {namespace}/{name}"))?;

    info!(
        namespace = %namespace,
        name = %name,
        from = ?current,
        to = desired,
        "Scaled Deployment for Memcached"
    );
    metrics::record_deployment_scaled(current, desired);

    Ok((scaled, DeploymentChange::Scaled))
}

/// Reconciles a `Memcached` resource.
///
/// Steps:
/// 1. Skip objects that are being deleted (the owner reference lets the garbage
///    collector remove the Deployment)
/// 2. Validate the spec, reporting `Degraded` when it is invalid
/// 3. Create or scale the Deployment
/// 4. Patch the status subresource if anything changed
///
/// # Returns
///
/// The status computed for this pass. The caller uses it to pick the requeue interval.
///
/// # Errors
///
/// Returns an error if the spec is invalid or a Kubernetes API call fails.
pub async fn reconcile_memcached(
    ctx: Arc<Context>,
    memcached: Arc<Memcached>,
) -> Result<MemcachedStatus> {
    let namespace = memcached.namespace().unwrap_or_default();
    let name = memcached.name_any();

    if memcached.metadata.deletion_timestamp.is_some() {
        debug!(
            "Memcached {}/{} is being deleted, leaving cleanup to garbage collection",
            namespace, name
        );
        metrics::forget_memcached(&namespace, &name);
        return Ok(memcached.status.clone().unwrap_or_default());
    }

    let observed_generation = memcached.status.as_ref().and_then(|s| s.observed_generation);
    if should_reconcile(memcached.metadata.generation, observed_generation) {
        info!(
            namespace = %namespace,
            name = %name,
            size = memcached.spec.size,
            generation = ?memcached.metadata.generation,
            "Reconciling Memcached spec change"
        );
    } else {
        debug!("Reconciling Memcached {}/{}", namespace, name);
    }

    if let Err(e) = validate_spec(&memcached.spec) {
        warn!(
            namespace = %namespace,
            name = %name,
            error = %e,
            "Memcached spec is invalid"
        );
        metrics::record_spec_validation_failure();
        let status = invalid_spec_status(&memcached, &e.to_string());
        update_status(&ctx.client, &memcached, &status).await?;
        return Err(anyhow::Error::new(e)
            .context(format!("invalid spec for Memcached {namespace}/{name}")));
    }

    let (deployment, change) =
        ensure_deployment(&ctx.client, &memcached, &ctx.config.memcached_image).await?;

    let status = compute_status(&memcached, &deployment, change);
    metrics::set_replicas(
        &namespace,
        &name,
        memcached.spec.size,
        status.available_replicas.unwrap_or(0),
    );
    update_status(&ctx.client, &memcached, &status).await?;

    Ok(status)
}

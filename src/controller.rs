// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Controller wiring for `Memcached` resources.
//!
//! Watches `Memcached` objects and the Deployments they own. Any change to either
//! enqueues the owning `Memcached` for [`reconcile_memcached`].

use crate::config::OperatorConfig;
use crate::context::Context;
use crate::crd::{Memcached, MemcachedStatus};
use crate::metrics::{self, ErrorCause, RequeueReason};
use crate::reconcilers::{reconcile_memcached, InvalidSpecError};
use anyhow::{Context as _, Result};
use futures::StreamExt;
use kube::{
    api::ListParams,
    runtime::{controller::Action, watcher::Config, Controller},
    ResourceExt,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Error type returned to the controller runtime.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ReconcileError(#[from] anyhow::Error);

impl ReconcileError {
    /// Classify the failure by the typed errors found in its chain.
    #[must_use]
    pub fn cause(&self) -> ErrorCause {
        if self.0.chain().any(|e| e.is::<InvalidSpecError>()) {
            ErrorCause::InvalidSpec
        } else if self.0.chain().any(|e| e.is::<kube::Error>()) {
            ErrorCause::Api
        } else {
            ErrorCause::Other
        }
    }
}

/// Pick the next requeue from the status the reconcile just produced.
///
/// Available resources are checked rarely. Everything else is polled more often
/// until the Deployment converges.
#[must_use]
pub fn requeue_action(status: &MemcachedStatus, config: &OperatorConfig) -> Action {
    if status.is_available() {
        Action::requeue(config.ready_requeue())
    } else {
        Action::requeue(config.not_ready_requeue())
    }
}

/// Reconcile wrapper for `Memcached`
pub(crate) async fn reconcile(
    memcached: Arc<Memcached>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    let start = Instant::now();
    let namespace = memcached.namespace().unwrap_or_default();
    let name = memcached.name_any();

    match reconcile_memcached(ctx.clone(), memcached).await {
        Ok(status) => {
            info!("Successfully reconciled Memcached: {}/{}", namespace, name);
            metrics::observe_reconcile(true, start.elapsed());
            metrics::record_requeue(if status.is_available() {
                RequeueReason::Ready
            } else {
                RequeueReason::NotReady
            });

            Ok(requeue_action(&status, &ctx.config))
        }
        Err(e) => {
            error!("Failed to reconcile Memcached {}/{}: {:#}", namespace, name, e);
            metrics::observe_reconcile(false, start.elapsed());
            Err(e.into())
        }
    }
}

/// Error policy for the `Memcached` controller
pub(crate) fn error_policy(
    memcached: Arc<Memcached>,
    err: &ReconcileError,
    ctx: Arc<Context>,
) -> Action {
    warn!(
        namespace = ?memcached.namespace(),
        name = %memcached.name_any(),
        error = %err,
        cause = err.cause().as_str(),
        "Requeueing Memcached after error"
    );
    metrics::record_reconcile_error(err.cause());
    metrics::record_requeue(RequeueReason::Error);
    Action::requeue(ctx.config.error_requeue())
}

/// Run the `Memcached` controller until `shutdown` resolves.
///
/// The watch covers every namespace unless the configuration names one.
///
/// # Errors
///
/// Returns an error if the `Memcached` CRD is not served by the cluster.
pub async fn run(
    ctx: Arc<Context>,
    shutdown: impl Future<Output = ()> + Send + Sync + 'static,
) -> Result<()> {
    let memcacheds = ctx.memcached_api();
    let deployments = ctx.deployment_api();

    match &ctx.config.watch_namespace {
        Some(namespace) => info!("Starting Memcached controller in namespace {}", namespace),
        None => info!("Starting Memcached controller for all namespaces"),
    }

    memcacheds
        .list(&ListParams::default().limit(1))
        .await
        .context("Memcached CRD is not queryable; is it installed?")?;

    Controller::new(memcacheds, Config::default())
        .owns(deployments, Config::default())
        .graceful_shutdown_on(shutdown)
        .run(reconcile, error_policy, ctx)
        .for_each(|result| {
            if let Err(e) = result {
                debug!("Controller event error: {}", e);
            }
            futures::future::ready(())
        })
        .await;

    info!("Memcached controller stopped");
    Ok(())
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;

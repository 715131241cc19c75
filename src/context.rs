// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context passed to the `Memcached` controller.

use crate::config::OperatorConfig;
use crate::crd::Memcached;
use k8s_openapi::api::apps::v1::Deployment;
use kube::{Api, Client};
use std::sync::Arc;

/// Shared context passed to every reconcile.
///
/// This context provides access to:
/// - Kubernetes client for API operations
/// - Operator configuration (image, requeue intervals, watch scope)
#[derive(Clone)]
pub struct Context {
    /// Kubernetes client for API operations
    pub client: Client,

    /// Operator configuration
    pub config: Arc<OperatorConfig>,
}

impl Context {
    #[must_use]
    pub fn new(client: Client, config: OperatorConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// `Memcached` API scoped to the configured watch namespace, or to all namespaces.
    #[must_use]
    pub fn memcached_api(&self) -> Api<Memcached> {
        match self.config.watch_namespace.as_deref() {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        }
    }

    /// `Deployment` API with the same scope as [`Context::memcached_api`].
    #[must_use]
    pub fn deployment_api(&self) -> Api<Deployment> {
        match self.config.watch_namespace.as_deref() {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod context_tests;

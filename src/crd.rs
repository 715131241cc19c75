// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Custom Resource Definition for Memcached deployments.
//!
//! A [`Memcached`] declares how many memcached replicas should run and which port the
//! container listens on. The operator turns each one into a `Deployment` with the same
//! name and namespace.
//!
//! # Example
//!
//! ```rust,no_run
//! use memcached_operator::crd::{Memcached, MemcachedSpec};
//!
//! let memcached = Memcached::new(
//!     "test-memcache",
//!     MemcachedSpec {
//!         size: 2,
//!         container_port: 8090,
//!     },
//! );
//! ```
//!
//! As a manifest (see `config/samples/`):
//!
//! ```yaml
//! apiVersion: cache.example.com/v1alpha1
//! kind: Memcached
//! metadata:
//!   name: memcached-sample
//!   namespace: default
//! spec:
//!   size: 2
//!   containerPort: 8090
//! ```

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition represents an observation of a resource's current state.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition: Available, Progressing or Degraded.
    pub r#type: String,

    /// Status of the condition: True, False, or Unknown.
    pub status: String,

    /// Brief CamelCase reason for the condition's last transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable message indicating details about the transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Last time the condition transitioned from one status to another (RFC3339 format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

// Doc comments on these types become CRD schema descriptions. Regenerate
// config/crd/bases with `cargo run --bin crdgen` after changing them.

/// `Memcached` describes a desired memcached deployment.
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "cache.example.com",
    version = "v1alpha1",
    kind = "Memcached",
    plural = "memcacheds",
    shortname = "mc",
    namespaced,
    doc = "Memcached is the Schema for the memcacheds API. Each Memcached is reconciled into a Deployment with the same name running spec.size memcached replicas."
)]
#[kube(status = "MemcachedStatus")]
#[kube(printcolumn = r#"{"name":"Size","type":"integer","jsonPath":".spec.size"}"#)]
#[kube(printcolumn = r#"{"name":"Ready","type":"integer","jsonPath":".status.readyReplicas"}"#)]
#[kube(printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#)]
#[serde(rename_all = "camelCase")]
pub struct MemcachedSpec {
    /// Number of memcached replicas the Deployment should run.
    #[schemars(range(min = 0, max = 100))]
    pub size: i32,

    /// Port the memcached container listens on.
    #[schemars(range(min = 1, max = 65535))]
    pub container_port: i32,
}

/// `Memcached` status
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemcachedStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Generation of the spec most recently acted on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// Desired replicas as last written to the Deployment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_replicas: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_replicas: Option<i32>,
}

impl MemcachedStatus {
    /// Look up a condition by type.
    #[must_use]
    pub fn condition(&self, condition_type: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.r#type == condition_type)
    }

    /// `true` when the `Available` condition is `True`.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.condition(crate::status_reasons::CONDITION_TYPE_AVAILABLE)
            .is_some_and(|c| c.status == crate::status_reasons::CONDITION_STATUS_TRUE)
    }
}

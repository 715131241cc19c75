// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the Memcached operator.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group for the `Memcached` CRD
pub const API_GROUP: &str = "cache.example.com";

/// API version for the `Memcached` CRD
pub const API_VERSION: &str = "v1alpha1";

/// Kind name for `Memcached` resource
pub const KIND_MEMCACHED: &str = "Memcached";

/// Field manager name used for all writes made by the operator
pub const FIELD_MANAGER: &str = "memcached-operator";

// ============================================================================
// Memcached Container Constants
// ============================================================================

/// Image used when `MEMCACHED_IMAGE` is not set
pub const DEFAULT_MEMCACHED_IMAGE: &str = "memcached:1.4.36-alpine";

/// Name of the memcached container in the pod template
pub const CONTAINER_NAME_MEMCACHED: &str = "memcached";

/// Name of the memcached container port
pub const CONTAINER_PORT_NAME: &str = "memcached";

/// Memory limit passed to memcached with `-m`, in megabytes
pub const MEMCACHED_MEMORY_MB: u32 = 64;

/// Non-root UID the memcached container runs as
pub const MEMCACHED_NONROOT_UID: i64 = 1001;

/// Upper bound for `spec.size`
pub const MAX_MEMCACHED_SIZE: i32 = 100;

/// Lowest valid container port
pub const MIN_CONTAINER_PORT: i32 = 1;

/// Highest valid container port
pub const MAX_CONTAINER_PORT: i32 = 65535;

// ============================================================================
// Controller Requeue Constants
// ============================================================================

/// Requeue interval once the Deployment is fully available (5 minutes)
pub const READY_REQUEUE_DURATION_SECS: u64 = 300;

/// Requeue interval while replicas are still rolling out (30 seconds)
pub const NOT_READY_REQUEUE_DURATION_SECS: u64 = 30;

/// Requeue duration for controller errors (30 seconds)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 30;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Default bind address of the metrics and health HTTP server
pub const DEFAULT_METRICS_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Number of tokio worker threads for the controller runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

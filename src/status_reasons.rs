// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Standard Kubernetes status condition types and reasons for `Memcached` resources.
//!
//! Reasons are programmatic identifiers in CamelCase that explain why a condition has
//! a particular status.
//!
//! # Example Status
//!
//! ```yaml
//! status:
//!   observedGeneration: 2
//!   replicas: 3
//!   readyReplicas: 2
//!   availableReplicas: 2
//!   conditions:
//!     - type: Available
//!       status: "False"
//!       reason: MinimumReplicasUnavailable
//!       message: "2/3 replicas are available"
//!     - type: Progressing
//!       status: "True"
//!       reason: ScalingReplicaSet
//!       message: "Scaling Deployment to 3 replicas"
//!     - type: Degraded
//!       status: "False"
//!       reason: ConfigurationValid
//! ```

// ============================================================================
// Condition Types
// ============================================================================

/// The Deployment has at least `spec.size` available replicas.
pub const CONDITION_TYPE_AVAILABLE: &str = "Available";

/// The Deployment is being created or scaled.
pub const CONDITION_TYPE_PROGRESSING: &str = "Progressing";

/// The `Memcached` cannot be reconciled as written.
pub const CONDITION_TYPE_DEGRADED: &str = "Degraded";

// ============================================================================
// Condition Status Values
// ============================================================================

pub const CONDITION_STATUS_TRUE: &str = "True";
pub const CONDITION_STATUS_FALSE: &str = "False";
pub const CONDITION_STATUS_UNKNOWN: &str = "Unknown";

// ============================================================================
// Reasons
// ============================================================================

/// Every requested replica is available.
pub const REASON_ALL_REPLICAS_AVAILABLE: &str = "AllReplicasAvailable";

/// Fewer replicas are available than requested.
pub const REASON_MINIMUM_REPLICAS_UNAVAILABLE: &str = "MinimumReplicasUnavailable";

/// The Deployment was just created.
pub const REASON_DEPLOYMENT_CREATED: &str = "DeploymentCreated";

/// The Deployment replica count is converging on `spec.size`.
pub const REASON_SCALING_REPLICA_SET: &str = "ScalingReplicaSet";

/// The Deployment has converged.
pub const REASON_REPLICAS_CONVERGED: &str = "ReplicasConverged";

/// The spec passed validation.
pub const REASON_CONFIGURATION_VALID: &str = "ConfigurationValid";

/// The spec failed validation.
pub const REASON_CONFIGURATION_INVALID: &str = "ConfigurationInvalid";

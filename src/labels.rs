// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common label constants used on every resource the operator creates.

// ============================================================================
// Kubernetes Standard Labels
// https://kubernetes.io/docs/concepts/overview/working-with-objects/common-labels/
// ============================================================================

/// Standard label for the component name within the architecture
pub const K8S_COMPONENT: &str = "app.kubernetes.io/component";

/// Standard label for the tool being used to manage the operation of an application
pub const K8S_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Standard label for the name of the application
pub const K8S_NAME: &str = "app.kubernetes.io/name";

/// Standard label for a unique name identifying the instance of an application
pub const K8S_INSTANCE: &str = "app.kubernetes.io/instance";

/// Standard label for the name of a higher-level application this one is part of
pub const K8S_PART_OF: &str = "app.kubernetes.io/part-of";

// ============================================================================
// Label Values
// ============================================================================

/// Application name for memcached workloads
pub const APP_NAME_MEMCACHED: &str = "memcached";

/// Component value for the cache server pods
pub const COMPONENT_CACHE: &str = "cache";

/// Value for `app.kubernetes.io/managed-by`
pub const MANAGED_BY_OPERATOR: &str = "memcached-operator";

/// Value for `app.kubernetes.io/part-of`
pub const PART_OF_MEMCACHED_OPERATOR: &str = "memcached-operator";

// ============================================================================
// Selector Labels
// ============================================================================

/// Short `app` label kept for compatibility with existing selectors
pub const APP_LABEL: &str = "app";

/// Label carrying the name of the owning `Memcached`
pub const MEMCACHED_CR_LABEL: &str = "memcached_cr";

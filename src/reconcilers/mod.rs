// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation logic for `Memcached` resources.
//!
//! The operator follows the standard Kubernetes controller pattern:
//!
//! 1. **Watch** - `Memcached` objects and the Deployments they own
//! 2. **Reconcile** - Compare `spec.size` with the owned Deployment
//! 3. **Update** - Create the Deployment or patch its replica count
//! 4. **Status** - Report replica counts and conditions back on the `Memcached`
//!
//! Every step is idempotent, so a reconcile can be retried or repeated at any time.
//!
//! # Example: Using the Reconciler
//!
//! ```rust,no_run
//! use memcached_operator::context::Context;
//! use memcached_operator::crd::Memcached;
//! use memcached_operator::reconcilers::reconcile_memcached;
//! use std::sync::Arc;
//!
//! async fn reconcile(ctx: Arc<Context>, memcached: Arc<Memcached>) -> anyhow::Result<()> {
//!     let status = reconcile_memcached(ctx, memcached).await?;
//!     println!("available: {}", status.is_available());
//!     Ok(())
//! }
//! ```

pub mod memcached;
pub mod status;


pub use memcached::{ensure_deployment, reconcile_memcached, validate_spec, InvalidSpecError};

/// Check if a resource's spec has changed by comparing generation with `observed_generation`.
///
/// The `metadata.generation` field is incremented by Kubernetes only when the spec changes,
/// while `status.observed_generation` is set by the controller after processing a spec.
///
/// This does not gate any work. Drift on the owned Deployment leaves the generation
/// untouched, so every pass still reconciles; the result only picks whether the pass
/// is logged at `info` (spec change) or `debug` (resync or owned-object event).
///
/// # Returns
///
/// * `true` - The spec changed since the last reconcile, or this is the first one
/// * `false` - Nothing new in the spec (status-only update or owned-resource event)
#[must_use]
pub fn should_reconcile(current_generation: Option<i64>, observed_generation: Option<i64>) -> bool {
    match (current_generation, observed_generation) {
        (Some(current), Some(observed)) => current != observed,
        (Some(_), None) => true, // First reconciliation
        _ => false,
    }
}

/// Check if a status value has actually changed compared to the current status.
///
/// Status writes produce watch events which trigger another reconcile, so fields
/// are only written when they differ.
#[must_use]
pub fn status_changed<T: PartialEq>(current_value: &Option<T>, new_value: &Option<T>) -> bool {
    current_value != new_value
}

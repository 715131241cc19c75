// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # Memcached Operator for Kubernetes
//!
//! A Kubernetes operator that manages memcached deployments through a `Memcached`
//! Custom Resource Definition.
//!
//! ## Overview
//!
//! For every `Memcached` object the operator keeps one `Deployment` with the same name
//! and namespace running `spec.size` memcached replicas, and reports the observed replica
//! counts and conditions back on the `Memcached` status.
//!
//! ## Modules
//!
//! - [`crd`] - Custom Resource Definition types
//! - [`memcached_resources`] - Builders for the owned `Deployment`
//! - [`reconcilers`] - Reconciliation logic and status computation
//! - [`controller`] - kube-rs controller wiring and requeue policy
//! - [`config`] - Command line and environment configuration
//! - [`metrics`] / [`metrics_server`] - Prometheus metrics and health endpoints
//!
//! ## Example
//!
//! ```rust,no_run
//! use memcached_operator::crd::{Memcached, MemcachedSpec};
//! use memcached_operator::memcached_resources::build_deployment;
//!
//! let memcached = Memcached::new(
//!     "memcached-sample",
//!     MemcachedSpec {
//!         size: 3,
//!         container_port: 11211,
//!     },
//! );
//! let deployment = build_deployment(&memcached, "memcached:1.4.36-alpine");
//! ```

pub mod config;
pub mod constants;
pub mod context;
pub mod controller;
pub mod crd;
pub mod labels;
pub mod memcached_resources;
pub mod metrics;
pub mod metrics_server;
pub mod reconcilers;
pub mod status_reasons;

#[cfg(test)]
mod status_reasons_tests;

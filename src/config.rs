// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Operator configuration.
//!
//! Every setting can be given as a command line flag or through the environment.
//! The defaults match what the operator expects when it runs inside the cluster
//! with no extra configuration.
//!
//! # Example
//!
//! ```bash
//! MEMCACHED_IMAGE=memcached:1.6-alpine \
//! WATCH_NAMESPACE=cache-system \
//! RUST_LOG_FORMAT=json \
//!   memcached-operator --metrics-bind-address 0.0.0.0:9090
//! ```

use crate::constants::{
    DEFAULT_MEMCACHED_IMAGE, DEFAULT_METRICS_BIND_ADDRESS, ERROR_REQUEUE_DURATION_SECS,
    NOT_READY_REQUEUE_DURATION_SECS, READY_REQUEUE_DURATION_SECS,
};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;

/// Output format of the log subscriber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact human-readable lines with ANSI colors
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Runtime configuration for the Memcached operator.
#[derive(Clone, Debug, Parser)]
#[command(name = "memcached-operator", version, about)]
pub struct OperatorConfig {
    /// Container image used for memcached pods.
    #[arg(long, env = "MEMCACHED_IMAGE", default_value = DEFAULT_MEMCACHED_IMAGE)]
    pub memcached_image: String,

    /// Restrict the controller to a single namespace. Watches all namespaces when unset.
    #[arg(long, env = "WATCH_NAMESPACE")]
    pub watch_namespace: Option<String>,

    /// Address the metrics and health server listens on.
    #[arg(long, env = "METRICS_BIND_ADDRESS", default_value = DEFAULT_METRICS_BIND_ADDRESS)]
    pub metrics_bind_address: SocketAddr,

    /// Log output format.
    #[arg(
        long,
        env = "RUST_LOG_FORMAT",
        value_enum,
        ignore_case = true,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,

    /// Seconds between reconciles once all replicas are available.
    #[arg(long, env = "READY_REQUEUE_SECS", default_value_t = READY_REQUEUE_DURATION_SECS)]
    pub ready_requeue_secs: u64,

    /// Seconds between reconciles while replicas are still rolling out.
    #[arg(long, env = "NOT_READY_REQUEUE_SECS", default_value_t = NOT_READY_REQUEUE_DURATION_SECS)]
    pub not_ready_requeue_secs: u64,

    /// Seconds to wait before retrying a failed reconcile.
    #[arg(long, env = "ERROR_REQUEUE_SECS", default_value_t = ERROR_REQUEUE_DURATION_SECS)]
    pub error_requeue_secs: u64,
}

impl OperatorConfig {
    #[must_use]
    pub fn ready_requeue(&self) -> Duration {
        Duration::from_secs(self.ready_requeue_secs)
    }

    #[must_use]
    pub fn not_ready_requeue(&self) -> Duration {
        Duration::from_secs(self.not_ready_requeue_secs)
    }

    #[must_use]
    pub fn error_requeue(&self) -> Duration {
        Duration::from_secs(self.error_requeue_secs)
    }

    /// Copy of this configuration scoped to one namespace.
    #[must_use]
    pub fn with_watch_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.watch_namespace = Some(namespace.into());
        self
    }
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            memcached_image: DEFAULT_MEMCACHED_IMAGE.to_string(),
            watch_namespace: None,
            metrics_bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            log_format: LogFormat::Text,
            ready_requeue_secs: READY_REQUEUE_DURATION_SECS,
            not_ready_requeue_secs: NOT_READY_REQUEUE_DURATION_SECS,
            error_requeue_secs: ERROR_REQUEUE_DURATION_SECS,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

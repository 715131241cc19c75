// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Memcached Kubernetes resource builders
//!
//! This module provides functions to build the `Deployment` owned by a `Memcached`.
//! All functions are pure and easily testable.

use crate::constants::{
    API_GROUP, API_VERSION, CONTAINER_NAME_MEMCACHED, CONTAINER_PORT_NAME, KIND_MEMCACHED,
    MEMCACHED_MEMORY_MB, MEMCACHED_NONROOT_UID,
};
use crate::crd::Memcached;
use crate::labels::{
    APP_LABEL, APP_NAME_MEMCACHED, COMPONENT_CACHE, K8S_COMPONENT, K8S_INSTANCE, K8S_MANAGED_BY,
    K8S_NAME, K8S_PART_OF, MANAGED_BY_OPERATOR, MEMCACHED_CR_LABEL, PART_OF_MEMCACHED_OPERATOR,
};
use k8s_openapi::api::{
    apps::v1::{Deployment, DeploymentSpec},
    core::v1::{
        Capabilities, Container, ContainerPort, PodSecurityContext, PodSpec, PodTemplateSpec,
        SeccompProfile, SecurityContext,
    },
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta, OwnerReference};
use kube::ResourceExt;
use std::collections::BTreeMap;
use tracing::debug;

/// Builds the labels shared by the Deployment, its selector and its pod template.
///
/// # Arguments
///
/// * `name` - Name of the `Memcached` resource
///
/// # Returns
///
/// A `BTreeMap` of label key-value pairs
#[must_use]
pub fn build_labels(name: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(APP_LABEL.into(), APP_NAME_MEMCACHED.into());
    labels.insert(MEMCACHED_CR_LABEL.into(), name.into());
    labels.insert(K8S_NAME.into(), APP_NAME_MEMCACHED.into());
    labels.insert(K8S_INSTANCE.into(), name.into());
    labels.insert(K8S_COMPONENT.into(), COMPONENT_CACHE.into());
    labels.insert(K8S_MANAGED_BY.into(), MANAGED_BY_OPERATOR.into());
    labels.insert(K8S_PART_OF.into(), PART_OF_MEMCACHED_OPERATOR.into());
    labels
}

/// Builds owner references for a resource owned by a `Memcached`
///
/// Sets up cascade deletion so that when the `Memcached` is deleted,
/// its `Deployment` is garbage-collected by Kubernetes.
///
/// # Arguments
///
/// * `memcached` - The `Memcached` that owns this resource
///
/// # Returns
///
/// A vector containing a single `OwnerReference` pointing to the `Memcached`
#[must_use]
pub fn build_owner_references(memcached: &Memcached) -> Vec<OwnerReference> {
    vec![OwnerReference {
        api_version: format!("{API_GROUP}/{API_VERSION}"),
        kind: KIND_MEMCACHED.to_string(),
        name: memcached.name_any(),
        uid: memcached.metadata.uid.clone().unwrap_or_default(),
        controller: Some(true),
        block_owner_deletion: Some(true),
    }]
}

/// Builds the `Deployment` for a `Memcached`.
///
/// The Deployment carries the `Memcached` name and namespace, runs `spec.size` replicas
/// and exposes `spec.containerPort` on the memcached container.
///
/// # Arguments
///
/// * `memcached` - The `Memcached` resource
/// * `image` - Container image for memcached
#[must_use]
pub fn build_deployment(memcached: &Memcached, image: &str) -> Deployment {
    let name = memcached.name_any();
    let namespace = memcached.namespace().unwrap_or_default();

    debug!(
        name = %name,
        namespace = %namespace,
        size = memcached.spec.size,
        image = %image,
        "Building Deployment for Memcached"
    );

    let labels = build_labels(&name);

    Deployment {
        metadata: ObjectMeta {
            name: Some(name.clone()),
            namespace: Some(namespace),
            labels: Some(labels.clone()),
            owner_references: Some(build_owner_references(memcached)),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(memcached.spec.size),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(build_pod_spec(image, memcached.spec.container_port)),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn build_pod_spec(image: &str, container_port: i32) -> PodSpec {
    PodSpec {
        security_context: Some(PodSecurityContext {
            run_as_non_root: Some(true),
            seccomp_profile: Some(SeccompProfile {
                type_: "RuntimeDefault".into(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        containers: vec![Container {
            name: CONTAINER_NAME_MEMCACHED.into(),
            image: Some(image.into()),
            image_pull_policy: Some("IfNotPresent".into()),
            command: Some(vec![
                "memcached".into(),
                format!("-m={MEMCACHED_MEMORY_MB}"),
                "-o".into(),
                "modern".into(),
                "-v".into(),
            ]),
            ports: Some(vec![ContainerPort {
                container_port,
                name: Some(CONTAINER_PORT_NAME.into()),
                protocol: Some("TCP".into()),
                ..Default::default()
            }]),
            security_context: Some(SecurityContext {
                run_as_non_root: Some(true),
                run_as_user: Some(MEMCACHED_NONROOT_UID),
                allow_privilege_escalation: Some(false),
                capabilities: Some(Capabilities {
                    drop: Some(vec!["ALL".into()]),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// Replica count currently declared on a Deployment.
#[must_use]
pub fn deployment_replicas(deployment: &Deployment) -> Option<i32> {
    deployment.spec.as_ref().and_then(|spec| spec.replicas)
}

/// Check whether an existing Deployment must be scaled to `desired` replicas.
///
/// Only the replica count is compared. Everything else on the Deployment is left as
/// it was created, so changes made by other tools survive reconciliation.
#[must_use]
pub fn replicas_need_update(current: &Deployment, desired: i32) -> bool {
    deployment_replicas(current) != Some(desired)
}

// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

// Common test utilities for integration tests

#![allow(dead_code)]

use k8s_openapi::api::core::v1::Namespace;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::{
    api::{Api, DeleteParams, Patch, PatchParams, PostParams},
    client::Client,
    runtime::wait::{await_condition, conditions},
};
use memcached_operator::{config::OperatorConfig, context::Context, controller};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const TEST_FIELD_MANAGER: &str = "memcached-operator-tests";

/// The manifest users install, so cluster tests run against what ships
const CRD_MANIFEST: &str =
    include_str!("../../config/crd/bases/cache.example.com_memcacheds.yaml");

/// Get a Kubernetes client or skip the test if not in a cluster
pub async fn get_kube_client_or_skip() -> Option<Client> {
    match Client::try_default().await {
        Ok(client) => {
            println!("✓ Successfully connected to Kubernetes cluster");
            Some(client)
        }
        Err(e) => {
            eprintln!("⊘ Skipping integration test: not running in Kubernetes cluster: {e}");
            None
        }
    }
}

/// Namespace name that does not collide with earlier runs
pub fn unique_namespace(prefix: &str) -> String {
    format!("{prefix}-{}", chrono::Utc::now().timestamp_millis())
}

/// Create a test namespace
pub async fn create_test_namespace(
    client: &Client,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    let mut labels = BTreeMap::new();
    labels.insert("test".to_string(), "integration".to_string());
    labels.insert("managed-by".to_string(), TEST_FIELD_MANAGER.to_string());

    let test_ns = Namespace {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        ..Default::default()
    };

    match namespaces.create(&PostParams::default(), &test_ns).await {
        Ok(_) => {
            println!("✓ Created test namespace: {name}");
            Ok(())
        }
        Err(kube::Error::Api(ae)) if ae.code == 409 => {
            println!("  Test namespace already exists: {name}");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Cleanup test namespace
pub async fn cleanup_test_namespace(
    client: &Client,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    match namespaces.delete(name, &DeleteParams::default()).await {
        Ok(_) => {
            println!("✓ Deleted test namespace: {name}");
            Ok(())
        }
        Err(kube::Error::Api(ae)) if ae.code == 404 => {
            println!("  Test namespace already deleted: {name}");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Install (or update) the committed `Memcached` CRD and wait until the apiserver serves it
pub async fn install_crd(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    let crds: Api<CustomResourceDefinition> = Api::all(client.clone());
    let crd: CustomResourceDefinition = serde_yaml::from_str(CRD_MANIFEST)?;
    let name = crd
        .metadata
        .name
        .clone()
        .ok_or("CRD manifest has no name")?;

    crds.patch(
        &name,
        &PatchParams::apply(TEST_FIELD_MANAGER).force(),
        &Patch::Apply(&crd),
    )
    .await?;

    tokio::time::timeout(
        Duration::from_secs(10),
        await_condition(crds, &name, conditions::is_crd_established()),
    )
    .await??;

    println!("✓ CRD {name} established");
    Ok(())
}

/// A controller running in the background of a test
pub struct RunningController {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<anyhow::Result<()>>,
}

impl RunningController {
    /// Ask the controller to shut down and wait for it to finish
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        match tokio::time::timeout(Duration::from_secs(10), self.task).await {
            Ok(Ok(Ok(()))) => println!("✓ Controller stopped"),
            Ok(Ok(Err(e))) => eprintln!("  Controller exited with error: {e:#}"),
            Ok(Err(e)) => eprintln!("  Controller task panicked: {e}"),
            Err(_) => eprintln!("  Controller did not stop within 10s"),
        }
    }
}

/// Start the controller in the background, scoped to `namespace`
pub fn start_controller(client: Client, namespace: &str) -> RunningController {
    let config = OperatorConfig::default().with_watch_namespace(namespace);
    let ctx = Arc::new(Context::new(client, config));
    let (shutdown, rx) = oneshot::channel::<()>();

    let task = tokio::spawn(controller::run(ctx, async move {
        let _ = rx.await;
    }));

    RunningController { shutdown, task }
}

/// Poll `check` every `interval` until it returns `Some` or `timeout` elapses
pub async fn eventually<T, F, Fut>(timeout: Duration, interval: Duration, mut check: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if let Some(value) = check().await {
            return Some(value);
        }
        if tokio::time::Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(interval).await;
    }
}

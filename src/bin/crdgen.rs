// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! CRD YAML Generator
//!
//! Writes the `Memcached` CustomResourceDefinition generated from src/crd.rs so the
//! manifest under config/crd/bases/ never drifts from the Rust types.
//!
//! Usage:
//!   cargo run --bin crdgen
//!   cargo run --bin crdgen -- --stdout

use kube::CustomResourceExt;
use memcached_operator::crd::Memcached;
use std::fs;
use std::path::Path;

const COPYRIGHT_HEADER: &str = "# Copyright (c) 2025 Erick Bourgeois, firestoned
# SPDX-License-Identifier: MIT
#
# This file is AUTO-GENERATED from src/crd.rs
# DO NOT EDIT MANUALLY - Run `cargo run --bin crdgen` to regenerate
#
";

const OUTPUT_DIR: &str = "config/crd/bases";
const OUTPUT_FILE: &str = "cache.example.com_memcacheds.yaml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let content = render_crd::<Memcached>()?;

    if std::env::args().any(|arg| arg == "--stdout") {
        print!("{content}");
        return Ok(());
    }

    let output_dir = Path::new(OUTPUT_DIR);
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join(OUTPUT_FILE);
    fs::write(&output_path, content)?;

    println!("✓ Generated {}", output_path.display());
    println!("\nNext steps:");
    println!("  1. Review the generated file");
    println!("  2. Deploy with: kubectl apply -f {OUTPUT_DIR}/");

    Ok(())
}

fn render_crd<T>() -> Result<String, Box<dyn std::error::Error>>
where
    T: CustomResourceExt,
{
    // Round-trip through JSON so optional fields are dropped the way the apiserver prints them
    let crd_json = serde_json::to_value(T::crd())?;
    let yaml = serde_yaml::to_string(&crd_json)?;

    Ok(format!("{COPYRIGHT_HEADER}{yaml}"))
}

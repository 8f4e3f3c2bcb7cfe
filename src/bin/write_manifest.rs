//! Manifest utility for Cardiorisk model artifacts.
//!
//! Hashes `feature_order.json`, `scaler.json` and `cardio_model.json` and writes
//! their SHA-256 digests to `manifest.json` in the same directory. With
//! `CARDIORISK_REQUIRE_MANIFEST=1` the application refuses to start unless
//! every artifact matches.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin write_manifest -- [model_dir]
//! ```

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use cardiorisk::adapters::artifacts::ArtifactManifest;
use cardiorisk::adapters::ModelArtifacts;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let model_dir = PathBuf::from(args.next().unwrap_or_else(|| "models".to_string()));
    if args.next().is_some() {
        bail!("Usage: write_manifest [model_dir]");
    }

    // Refuse to bind artifacts the application could not load anyway.
    ModelArtifacts::load(&model_dir, false)
        .with_context(|| format!("Artifacts in {model_dir:?} failed validation"))?;

    let manifest = ArtifactManifest::for_directory(&model_dir)
        .with_context(|| format!("Failed to hash artifacts in {model_dir:?}"))?;
    let path = manifest
        .write_to(&model_dir)
        .context("Failed to write manifest")?;

    for (name, digest) in &manifest.files {
        println!("{digest}  {name}");
    }
    println!("Wrote {}", path.display());

    Ok(())
}

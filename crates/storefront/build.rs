//! Build script for storefront crate.
//!
//! Fingerprints the static assets so templates can reference them with a
//! content-derived `?v=` query and browsers never run a stale script.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// `(asset path under static/, env var set to its short hash)`
const ASSETS: &[(&str, &str)] = &[
    ("css/main.css", "CSS_HASH"),
    ("js/forms.js", "JS_HASH"),
];

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let static_dir = Path::new(&manifest_dir).join("static");

    for (asset, var) in ASSETS {
        hash_asset(&static_dir.join(asset), var);
    }
}

/// Set `var` to the first 8 hex chars of the asset's SHA-256.
fn hash_asset(path: &Path, var: &str) {
    println!("cargo:rerun-if-changed={}", path.display());

    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", path.display());
            println!("cargo:rustc-env={var}=dev");
            return;
        }
    };

    let hash = format!("{:x}", Sha256::digest(&content));
    let short_hash: String = hash.chars().take(8).collect();

    println!("cargo:rustc-env={var}={short_hash}");
}

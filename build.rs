//! Records where the shipped taxonomy lives so binaries started outside the
//! source checkout can still resolve `resources/taxonomy`.

use std::env;
use std::path::PathBuf;

const HINT_ENV: &str = "CATALOG_CONNECTOR_ROOT_HINT";
const TAXONOMY_DIR: &str = "resources/taxonomy";

fn main() {
    println!("cargo:rerun-if-env-changed={HINT_ENV}");
    println!("cargo:rerun-if-changed={TAXONOMY_DIR}");

    let Some(root) = env::var_os(HINT_ENV)
        .or_else(|| env::var_os("CARGO_MANIFEST_DIR"))
        .map(PathBuf::from)
    else {
        return;
    };
    let root = root.canonicalize().unwrap_or(root);

    // Only a root that actually holds the taxonomy is worth baking in.
    if !root.join(TAXONOMY_DIR).is_dir() {
        println!(
            "cargo:warning={} has no {TAXONOMY_DIR}; no taxonomy root hint recorded",
            root.display()
        );
        return;
    }
    println!("cargo:rustc-env={HINT_ENV}={}", root.display());
}

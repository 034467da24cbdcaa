//! Build script: computes a content hash for `static/main.css` so templates
//! can emit a cache-busting query parameter.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let css_path = Path::new(&manifest_dir).join("static").join("main.css");
    println!("cargo:rerun-if-changed={}", css_path.display());

    // Missing file hashes to the empty-content digest so clean checkouts
    // still build.
    let contents = fs::read(&css_path).unwrap_or_default();
    let digest = Sha256::digest(&contents);
    let mut short = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        let _ = write!(&mut short, "{byte:02x}");
    }
    println!("cargo:rustc-env=CSS_HASH={short}");
}

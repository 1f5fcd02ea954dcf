// Build script to extract version from Cargo.toml
// and optionally override the patch version from a release pipeline

use std::env;

fn main() {
    let version = env::var("CARGO_PKG_VERSION").expect("CARGO_PKG_VERSION not set");

    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 {
        panic!("Invalid version format in Cargo.toml: {}", version);
    }

    let (major, minor, patch) = (parts[0], parts[1], parts[2]);

    // Release builds may stamp a build number into the patch segment
    let final_patch =
        env::var("ROBOTS_SITEMAP_PATCH_VERSION").unwrap_or_else(|_| patch.to_string());

    println!(
        "cargo:rustc-env=ROBOTS_SITEMAP_VERSION={}.{}.{}",
        major, minor, final_patch
    );
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=ROBOTS_SITEMAP_PATCH_VERSION");
}

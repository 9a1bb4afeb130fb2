use std::env;

fn main() {
    // Version string shown in the CLI banner and sent as the HTTP user agent
    let version = env::var("ECOPOINT_VERSION")
        .unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap_or_default());
    println!("cargo:rustc-env=ECOPOINT_VERSION={}", version);

    println!("cargo:rerun-if-env-changed=ECOPOINT_VERSION");
    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-changed=Cargo.toml");
}

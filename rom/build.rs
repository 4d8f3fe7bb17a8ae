// Licensed under the Apache-2.0 license

fn main() {
    let arch = std::env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    if arch == "riscv32" {
        let dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_default();
        println!("cargo:rustc-link-arg-bins=-T{dir}/layout.ld");
        println!("cargo:rerun-if-changed=layout.ld");
        println!("cargo:rerun-if-changed=src/start.s");
    }
    println!("cargo:rerun-if-changed=build.rs");
}

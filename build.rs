//! Build script: stages the RP2350 linker memory map for ARM firmware builds.
//!
//! Host builds (library tests) skip the memory map entirely so no embedded
//! linker scripts leak into the host toolchain.

use std::{env, fs, path::PathBuf};

fn main() {
    let target = env::var("TARGET").unwrap();

    if target.starts_with("thumbv8m") {
        let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
        let memory_x = fs::read_to_string("memory.x").expect("Failed to read memory.x");
        fs::write(out_dir.join("memory.x"), memory_x).expect("Failed to write memory.x");
        println!("cargo:rustc-link-search={}", out_dir.display());
    }

    println!("cargo:rerun-if-changed=memory.x");
}

// Build script that tries to generate the C header with `cbindgen`.
// If `cbindgen` is not available, it copies the checked-in
// `include/tonewheel.h` to $OUT_DIR instead.

use std::{env, fs, path::PathBuf, process::Command};

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=include/tonewheel.h");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let header_repo = crate_dir.join("include").join("tonewheel.h");
    let header_out = out_dir.join("tonewheel.h");

    let cbindgen_ok = Command::new("cbindgen")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);

    if cbindgen_ok {
        let generated = Command::new("cbindgen")
            .args(["--crate", "tonewheel-ffi", "--lang", "C", "--output"])
            .arg(&header_out)
            .current_dir(&crate_dir)
            .status()
            .map(|s| s.success())
            .unwrap_or(false);

        if generated {
            println!("cargo:warning=tonewheel-ffi: generated header with cbindgen -> {}", header_out.display());
            return;
        }
        println!("cargo:warning=tonewheel-ffi: cbindgen failed; using checked-in header");
    }

    fs::copy(&header_repo, &header_out).expect("failed to copy include/tonewheel.h to OUT_DIR");
}

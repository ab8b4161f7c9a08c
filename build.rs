// Copies static assets to `dist/`, building the wasm bundle first when the
// target is wasm32.
use std::process::Command;
use std::path::{Path, PathBuf};
use std::{env, fs};

use fs_extra::dir::{copy, CopyOptions};

fn wasm_target_dir() -> PathBuf {
    env::var_os("OUT_DIR")
        .map(|out| Path::new(&out).join("wasm-pack-target"))
        .unwrap_or_else(|| PathBuf::from("target/wasm-pack"))
}

fn main() {
    // static/pkg is wasm-pack output; watching all of static/ would rerun forever.
    for path in ["src", "static/index.html", "static/site.css"] {
        println!("cargo:rerun-if-changed={path}");
    }

    // Only run the wasm-pack build when targeting wasm32.
    let target = env::var("TARGET").unwrap_or_default();
    if target == "wasm32-unknown-unknown" && env::var("WASM_PACK_BUILD").is_err() {
        let status = Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
            // wasm-pack invokes cargo again; the marker stops the recursion.
            .env("WASM_PACK_BUILD", "1")
            // The outer build holds the lock on the default target dir.
            .env("CARGO_TARGET_DIR", wasm_target_dir())
            .status();
        match status {
            Ok(st) if st.success() => {}
            Ok(_) => println!("cargo:warning=wasm-pack build failed"),
            Err(_) => println!("cargo:warning=wasm-pack not installed – skipping"),
        }
    }

    let out_dir = Path::new("dist");
    if out_dir.exists() {
        fs::remove_dir_all(out_dir).ok();
    }

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }
    let options = CopyOptions {
        overwrite: true,
        content_only: true,
        ..CopyOptions::new()
    };
    if let Err(err) = fs::create_dir_all(out_dir).map_err(|e| e.to_string()).and_then(|_| {
        copy(static_dir, out_dir, &options)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }) {
        println!("cargo:warning=copying static/ to dist/ failed: {err}");
    }
}

//! Host-side helper: `cargo run` builds the wasm bundle into `static/pkg`
//! and serves `static/` locally.

use std::process::{Command, ExitCode, Stdio};
use std::{env, thread, time::Duration};

const DEFAULT_PORT: u16 = 8000;

fn port() -> u16 {
    env::var("SITE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

fn build_bundle() -> Result<(), String> {
    println!("Building WASM pkg …");
    let status = Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
        .map_err(|_| {
            "wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/)".to_string()
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("wasm-pack exited with {status}"))
    }
}

fn main() -> ExitCode {
    if let Err(err) = build_bundle() {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    let port = port();
    println!("Serving static/ at http://127.0.0.1:{port} …");
    let server = Command::new("python3")
        .args(["-m", "http.server", &port.to_string(), "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn();
    let mut server = match server {
        Ok(child) => child,
        Err(err) => {
            eprintln!("failed to start http server: {err}");
            return ExitCode::FAILURE;
        }
    };

    loop {
        match server.try_wait() {
            Ok(Some(status)) => {
                eprintln!("http server exited with {status}");
                return ExitCode::FAILURE;
            }
            Ok(None) => thread::sleep(Duration::from_secs(1)),
            Err(err) => {
                eprintln!("lost track of http server: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
}

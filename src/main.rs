//! Host-side helper: `cargo run` builds the WASM package into `static/pkg`
//! and serves `static/` on a local HTTP port (`TV_STATIC_PORT`, default 8000).

use std::process::{Command, ExitCode, Stdio};
use std::{env, thread, time::Duration};

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 8000;

fn port() -> u16 {
    match env::var("TV_STATIC_PORT") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(%raw, "TV_STATIC_PORT is not a port number, using {DEFAULT_PORT}");
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Build the wasm bundle the page imports from `pkg/`.
    info!("building WASM pkg");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(st) => {
            error!(%st, "wasm-pack failed; is the wasm32-unknown-unknown target installed?");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            warn!(%err, "wasm-pack not found in PATH; serving whatever is already in static/pkg");
        }
    }

    let port = port();
    info!("serving static/ at http://127.0.0.1:{port}");
    let server = Command::new("python3")
        .args(["-m", "http.server", &port.to_string(), "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    let mut server = match server {
        Ok(child) => child,
        Err(err) => {
            error!(%err, "failed to start python3 http.server");
            return ExitCode::FAILURE;
        }
    };

    loop {
        match server.try_wait() {
            Ok(Some(status)) => {
                error!(%status, "http server exited");
                return ExitCode::FAILURE;
            }
            Ok(None) => thread::sleep(Duration::from_secs(1)),
            Err(err) => {
                error!(%err, "lost track of http server");
                return ExitCode::FAILURE;
            }
        }
    }
}

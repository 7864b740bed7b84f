//! Build script for the sporlweb server.
//!
//! Copies the `.env.example` template into the user's local data directory so the
//! server finds a ready-to-edit configuration next to the `.env` it loads at start-up:
//! - Linux: `~/.local/share/sporlweb/.env.example`
//! - macOS: `~/Library/Application Support/sporlweb/.env.example`
//! - Windows: `%LOCALAPPDATA%/sporlweb/.env.example`

use std::{env, fs, path::PathBuf};

/// Copies the configuration template, warning instead of failing when it is missing.
///
/// # Errors
///
/// Fails when `CARGO_MANIFEST_DIR` is unset or the data directory cannot be
/// created or written to.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("sporlweb");
    fs::create_dir_all(&out_dir)?;

    if template.is_file() {
        fs::copy(&template, out_dir.join(".env.example"))?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
    }

    Ok(())
}

//! Spotify web companion library.
//!
//! A small axum server that signs the user in with Spotify and then lists their
//! playlists, searches the catalog and recommends tracks based on what they
//! saved.
//!
//! # Modules
//!
//! - `api` - HTTP handlers and the authorization guard
//! - `config` - Configuration loaded from the environment
//! - `management` - Session token cache and the authorization gate
//! - `server` - Router assembly and the server entry point
//! - `spotify` - Spotify Accounts and Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - Tallying and formatting helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sporlweb::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> sporlweb::Res<()> {
//!     config::load_env().await?;
//!     let config = Arc::new(config::Config::from_env()?);
//!     server::start_api_server(config, false).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Uses a boxed dynamic error so start-up code can mix configuration, I/O and
/// Spotify errors with `?`. `Send + Sync` keeps it usable across await points.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Loading configuration...");
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Listening on {}", url);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal start-up errors; request handlers report through `tracing`.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Failed to open browser");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

//! Mediverse clinical assistant.
//!
//! The core modules (`api`, `chat`, `console`, `staging`, ...) are plain Rust
//! and carry all of the request orchestration. The `ui` and `views` modules are
//! thin Dioxus components over them and only build with the `ui` feature.

pub mod api;
pub mod chat;
pub mod config;
pub mod console;
pub mod markdown;
pub mod preferences;
pub mod request;
pub mod reveal;
pub mod staging;
pub mod theme;
pub mod types;

#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;

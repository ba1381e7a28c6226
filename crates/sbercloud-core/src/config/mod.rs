//! Client configuration
//!
//! [`ClientConfig`] carries the region, static credentials and HTTP settings
//! for talking to SberCloud, and builds the layered transport from them.
//! Values come from a TOML file, `SBC_*` environment variables, or both
//! (environment wins).

mod auth;
mod client_config;
pub mod defaults;
mod env_loader;
mod file_loader;

pub use auth::{Credentials, mask_secret};
pub use client_config::ClientConfig;
pub use env_loader::{apply_env, load_from_env, load_from_lookup};
pub use file_loader::{load_config, load_from_file};

//! Configuration module for DocuAPI.
//!
//! Manages client settings stored in SQLite, with environment overrides.

mod settings;

pub use settings::{
    Settings, DEFAULT_API_BASE, DEFAULT_LOCALE, ENV_API_BASE, ENV_API_URL,
};

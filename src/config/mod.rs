//! Configuration module for Nyhet.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{GeneralSettings, NewsSettings, OpenAiSettings, Settings};

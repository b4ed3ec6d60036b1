//! Configuration for asset builds.
//!
//! [`Settings`] are built with [`SettingsBuilder`], optionally starting from an
//! `assets.toml` [`ConfigFile`].

mod builder;
mod core;
mod file;

pub use builder::SettingsBuilder;
pub use core::Settings;
pub use file::{CONFIG_FILE_NAME, ConfigFile};

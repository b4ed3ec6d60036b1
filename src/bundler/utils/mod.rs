//! Shared utilities for asset building.

pub mod fs;

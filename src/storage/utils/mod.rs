// Utilities for storage module
pub mod error;
pub mod path;
pub mod progress;
pub mod size;

//! Utility functions module
//!
//! This module contains utility functions used throughout the application.

pub mod duration;
pub mod signals;

// Re-export main functions
pub use duration::{format_mm_ss, parse_mm_ss};
pub use signals::shutdown_signal;

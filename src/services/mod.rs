//! Shared card services module
//!
//! This module contains the collaborators cards delegate user-visible side
//! effects to: toast display and alarm playback.

pub mod feedback;

// Re-export main types
pub use feedback::{Feedback, SharedFeedback, Toast};

//! Ring-progress geometry
//!
//! Maps a card's progress fraction onto the stroke offset of a circular
//! progress indicator: a full circumference offset is an empty ring, a zero
//! offset is a full ring.

use std::f64::consts::PI;

/// Ring radius used when the host presentation layer does not supply one
pub const DEFAULT_RADIUS: f64 = 70.0;

/// Fixed ring geometry shared by every card. Circumference is computed once
/// at construction.
#[derive(Debug, Clone, Copy)]
pub struct RingGeometry {
    radius: f64,
    circumference: f64,
}

impl RingGeometry {
    /// Create geometry for a given visual radius
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            circumference: 2.0 * PI * radius,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn circumference(&self) -> f64 {
        self.circumference
    }

    /// Stroke offset for a progress fraction in `0.0..=1.0`
    pub fn stroke_offset(&self, fraction: f64) -> f64 {
        self.circumference - fraction.clamp(0.0, 1.0) * self.circumference
    }
}

impl Default for RingGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS)
    }
}

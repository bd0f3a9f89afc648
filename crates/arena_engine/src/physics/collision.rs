//! Narrow-phase circle tests
//!
//! Exact geometric tests applied to broad-phase survivors. Malformed
//! input (non-finite centers or radii, non-positive radius sums) degrades
//! to "does not collide" rather than panicking.

use crate::foundation::math::{is_finite, Vec2};

/// A circular collision hull
#[derive(Debug, Clone, Copy)]
pub struct CircleHull {
    /// The center position of the circle in world space
    pub center: Vec2,
    /// The radius of the circle
    pub radius: f64,
}

impl CircleHull {
    /// Creates a new circle hull with the given center and radius
    pub fn new(center: Vec2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Check if this circle overlaps another
    ///
    /// Strictly less-than: circles touching exactly at the rim do not
    /// collide. Returns false whenever either hull is malformed; a hull
    /// without a positive, finite radius never collides with anything.
    pub fn intersects(&self, other: &Self) -> bool {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return false;
        }
        if !other.radius.is_finite() || other.radius <= 0.0 {
            return false;
        }
        if !is_finite(self.center) || !is_finite(other.center) {
            return false;
        }
        let radius_sum = self.radius + other.radius;
        (self.center - other.center).norm_squared() < radius_sum * radius_sum
    }

    /// Get the penetration depth if overlapping (0.0 if not)
    pub fn penetration_depth(&self, other: &Self) -> f64 {
        if !self.intersects(other) {
            return 0.0;
        }
        let radius_sum = self.radius + other.radius;
        radius_sum - (self.center - other.center).norm()
    }
}

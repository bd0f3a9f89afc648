//! Math utilities and types
//!
//! Provides fundamental math types for 2D simulation. The simulation runs
//! on `f64` coordinates.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f64>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f64>;

/// Check that both components of a vector are finite (not NaN or infinite)
pub fn is_finite(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

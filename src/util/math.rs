//! Math type re-exports and small geometry helpers.

pub use glam::Vec2;

/// Radius of the circle that encloses a `width` x `height` frame centred on its handle.
#[inline]
pub fn enclosing_radius(width: f32, height: f32) -> f32 {
    (Vec2::new(width, height) * 0.5).length()
}

//! Collision detection primitives
//!
//! Bullets are circles; ships and invaders are axis-aligned rectangles.
//! Rectangles are (top-left, size) pairs in arena coordinates.

use glam::Vec2;

/// Axis-aligned rectangle overlap (separating-interval test).
/// Touching edges count as overlap.
pub fn rects_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    !(a_pos.x + a_size.x < b_pos.x
        || a_pos.x > b_pos.x + b_size.x
        || a_pos.y + a_size.y < b_pos.y
        || a_pos.y > b_pos.y + b_size.y)
}

/// Circle vs axis-aligned rectangle: clamp the circle center to the
/// rectangle's bounds to find the nearest point, then compare squared
/// distance to squared radius. Exact closest-point test, no epsilon.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect_pos: Vec2, rect_size: Vec2) -> bool {
    let nearest = center.clamp(rect_pos, rect_pos + rect_size);
    center.distance_squared(nearest) <= radius * radius
}

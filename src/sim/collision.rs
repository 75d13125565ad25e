//! Collision primitives shared by every resolution pass
//!
//! Everything in the arena reduces to two tests: a circle against an
//! axis-aligned rectangle (closest-point distance) and two rectangles
//! against each other (AABB overlap). The per-pair resolution policies
//! live in `tick`; this module only answers "do these touch".

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, origin at the top-left (screen coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Grow the rectangle by `pad` on the left/right and `top_pad` upward
    pub fn padded(&self, pad: f32, top_pad: f32) -> Self {
        Self {
            x: self.x - pad,
            y: self.y - top_pad,
            w: self.w + pad * 2.0,
            h: self.h + top_pad,
        }
    }
}

/// Closest-point test between a circle and a rectangle
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest_x = center.x.clamp(rect.x, rect.right());
    let closest_y = center.y.clamp(rect.y, rect.bottom());
    let dx = center.x - closest_x;
    let dy = center.y - closest_y;
    dx * dx + dy * dy < radius * radius
}

/// AABB overlap test (strict, touching edges do not count)
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Circle-vs-circle test by center distance
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let combined = ra + rb;
    a.distance_squared(b) < combined * combined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_rect_overlap_edge() {
        let rect = Rect::new(100.0, 100.0, 50.0, 50.0);
        // Just touching from the left: distance == radius is a miss
        assert!(!circle_rect_overlap(Vec2::new(90.0, 125.0), 10.0, &rect));
        assert!(circle_rect_overlap(Vec2::new(91.0, 125.0), 10.0, &rect));
    }

    #[test]
    fn test_circle_rect_overlap_corner() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Diagonal distance to the corner is what matters
        assert!(!circle_rect_overlap(Vec2::new(14.0, 14.0), 5.0, &rect));
        assert!(circle_rect_overlap(Vec2::new(12.0, 12.0), 5.0, &rect));
    }

    #[test]
    fn test_circle_inside_rect() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(circle_rect_overlap(Vec2::new(50.0, 50.0), 1.0, &rect));
    }

    #[test]
    fn test_rects_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(rects_overlap(&a, &b));
        // Sharing an edge is not an overlap
        assert!(!rects_overlap(&a, &c));
    }

    #[test]
    fn test_padded() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        let p = r.padded(4.0, 6.0);
        assert_eq!(p.x, 6.0);
        assert_eq!(p.y, 14.0);
        assert_eq!(p.w, 38.0);
        assert_eq!(p.h, 46.0);
    }
}

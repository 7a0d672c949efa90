//! Field surface geometry
//!
//! Cards store their position as percentages of the field's bounding box, so
//! the same placement renders identically at any on-screen size and can be
//! mapped straight onto an export canvas.

use serde::{Deserialize, Serialize};

/// Position on the field in percentage space (0–100 on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldPosition {
    pub x: f64,
    pub y: f64,
}

impl FieldPosition {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance in percentage units
    pub fn distance_to(&self, other: FieldPosition) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Bounding box of the field as reported by the host (client pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl FieldRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Convert a pointer position into field percentages.
    ///
    /// Returns `None` for a degenerate rect. Pointers outside the rect are not
    /// clamped: a drop just past the touchline keeps its out-of-range value.
    pub fn to_field_position(&self, client_x: f64, client_y: f64) -> Option<FieldPosition> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(FieldPosition {
            x: (client_x - self.left) / self.width * 100.0,
            y: (client_y - self.top) / self.height * 100.0,
        })
    }

    /// Inverse of [`to_field_position`](Self::to_field_position).
    pub fn to_client(&self, position: FieldPosition) -> (f64, f64) {
        (
            self.left + position.x / 100.0 * self.width,
            self.top + position.y / 100.0 * self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_to_percent() {
        let rect = FieldRect::new(100.0, 50.0, 800.0, 600.0);
        let pos = rect.to_field_position(500.0, 350.0).unwrap();
        assert_eq!(pos, FieldPosition::new(50.0, 50.0));

        let corner = rect.to_field_position(100.0, 50.0).unwrap();
        assert_eq!(corner, FieldPosition::new(0.0, 0.0));
    }

    #[test]
    fn test_pointer_outside_rect_is_not_clamped() {
        let rect = FieldRect::new(0.0, 0.0, 200.0, 100.0);
        let pos = rect.to_field_position(-20.0, 150.0).unwrap();
        assert_eq!(pos, FieldPosition::new(-10.0, 150.0));
    }

    #[test]
    fn test_degenerate_rect() {
        assert!(FieldRect::new(0.0, 0.0, 0.0, 100.0).to_field_position(1.0, 1.0).is_none());
    }

    #[test]
    fn test_client_roundtrip() {
        let rect = FieldRect::new(10.0, 20.0, 400.0, 300.0);
        let (cx, cy) = rect.to_client(FieldPosition::new(25.0, 50.0));
        assert_eq!((cx, cy), (110.0, 170.0));
    }

    #[test]
    fn test_distance() {
        let a = FieldPosition::new(0.0, 0.0);
        let b = FieldPosition::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
    }
}

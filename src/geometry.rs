use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }
}

/// Axis-aligned rectangle in integer pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 { self.x + self.width }

    pub fn bottom(&self) -> i32 { self.y + self.height }

    pub fn is_empty(&self) -> bool { self.width <= 0 || self.height <= 0 }

    /// Containment is half-open: the right and bottom edges are outside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Splits into a left and right part. The left part gets
    /// `floor(width * weight)` pixels and the right part absorbs the
    /// rounding remainder, so the two tile the rectangle exactly.
    pub fn split_horizontal(&self, weight: f32) -> (Rect, Rect) {
        let first = weighted_extent(self.width, weight);
        (
            Rect::new(self.x, self.y, first, self.height),
            Rect::new(self.x + first, self.y, self.width - first, self.height),
        )
    }

    /// Splits into a top and bottom part; rounding as in `split_horizontal`.
    pub fn split_vertical(&self, weight: f32) -> (Rect, Rect) {
        let first = weighted_extent(self.height, weight);
        (
            Rect::new(self.x, self.y, self.width, first),
            Rect::new(self.x, self.y + first, self.width, self.height - first),
        )
    }
}

fn weighted_extent(extent: i32, weight: f32) -> i32 {
    (extent as f64 * weight as f64).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_split_floors_the_first_extent() {
        let (left, right) = Rect::new(0, 0, 1000, 800).split_horizontal(0.3);
        assert_eq!(left, Rect::new(0, 0, 300, 800));
        assert_eq!(right, Rect::new(300, 0, 700, 800));
    }

    #[test]
    fn remainder_goes_to_the_second_part() {
        let (left, right) = Rect::new(0, 0, 7, 5).split_horizontal(0.5);
        assert_eq!(left.width, 3);
        assert_eq!(right.width, 4);
        assert_eq!(left.right(), right.x);

        let (top, bottom) = Rect::new(10, 10, 7, 5).split_vertical(0.5);
        assert_eq!(top.height, 2);
        assert_eq!(bottom.height, 3);
        assert_eq!(top.bottom(), bottom.y);
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(10, 20, 30, 40);
        assert!(rect.contains(Point::new(10, 20)));
        assert!(rect.contains(Point::new(39, 59)));
        assert!(!rect.contains(Point::new(40, 20)));
        assert!(!rect.contains(Point::new(10, 60)));
        assert!(!rect.contains(Point::new(9, 20)));
    }

    #[test]
    fn degenerate_weights_still_tile() {
        let rect = Rect::new(0, 0, 100, 100);
        let (a, b) = rect.split_horizontal(0.001);
        assert_eq!(a.width + b.width, 100);
        let (c, d) = rect.split_vertical(0.999);
        assert_eq!(c.height + d.height, 100);
    }
}

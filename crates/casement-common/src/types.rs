use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Shrink and shift `self` so it lies entirely inside `area`.
    pub fn clamp_into(&self, area: &Rect) -> Rect {
        let width = self.width.min(area.width).max(0.0);
        let height = self.height.min(area.height).max(0.0);
        let x = self.x.max(area.x).min(area.right() - width);
        let y = self.y.max(area.y).min(area.bottom() - height);
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 70.0);
    }

    #[test]
    fn clamp_inside_is_identity() {
        let area = Rect::new(0.0, 40.0, 1280.0, 640.0);
        let r = Rect::new(100.0, 100.0, 400.0, 300.0);
        assert_eq!(r.clamp_into(&area), r);
    }

    #[test]
    fn clamp_pulls_window_back_into_area() {
        let area = Rect::new(0.0, 40.0, 1280.0, 640.0);
        let r = Rect::new(1200.0, 0.0, 400.0, 300.0);
        let c = r.clamp_into(&area);
        assert_eq!(c.x, 880.0);
        assert_eq!(c.y, 40.0);
        assert_eq!(c.width, 400.0);
    }

    #[test]
    fn clamp_shrinks_oversized_window() {
        let area = Rect::new(0.0, 40.0, 800.0, 500.0);
        let r = Rect::new(0.0, 0.0, 1000.0, 900.0);
        let c = r.clamp_into(&area);
        assert_eq!(c, area);
    }
}

//! Geometry APIs
//!
//! DOMRect, viewport metrics and the page-to-client coordinate mapping.

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create empty rect
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge (same as y)
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Same rect moved by (dx, dy)
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::from_xywh(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Visible viewport: size plus document scroll offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    /// Map a page-coordinate rect into client (viewport) coordinates
    pub fn to_client(&self, page_rect: DOMRect) -> DOMRect {
        page_rect.translate(-self.scroll_x, -self.scroll_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_rect() {
        let rect = DOMRect::from_xywh(10.0, 20.0, 100.0, 50.0);

        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.left(), 10.0);
    }

    #[test]
    fn test_viewport_to_client() {
        let mut viewport = Viewport::new(800.0, 600.0);
        viewport.scroll_y = 250.0;

        let client = viewport.to_client(DOMRect::from_xywh(0.0, 1000.0, 10.0, 10.0));
        assert_eq!(client.top(), 750.0);
    }
}

//! Pointer input normalization
//!
//! Mouse and touch events arrive in different coordinate spaces: mouse
//! positions are already relative to the canvas widget, touch positions
//! are absolute screen coordinates. Everything is folded into a single
//! logical surface-space `Point` here before it reaches the renderer.

/// A position in logical surface coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// On-screen origin of the canvas, used to translate absolute touch
/// coordinates into surface space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    pub left: f32,
    pub top: f32,
}

impl CanvasBounds {
    pub fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }
}

/// A raw pointer sample from the windowing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    /// Mouse position, already relative to the canvas.
    Mouse { offset: Point },
    /// Active touches in absolute screen coordinates, earliest first.
    Touch { touches: Vec<Point> },
}

/// Map a raw pointer sample to a logical surface-space point.
///
/// Only the first active touch draws; extra fingers are ignored. When the
/// canvas has not been laid out yet (no bounds) or a touch event arrives
/// with an empty touch list, `{0,0}` is returned rather than failing.
pub fn surface_point(input: &PointerInput, bounds: Option<CanvasBounds>) -> Point {
    match input {
        PointerInput::Mouse { offset } => *offset,
        PointerInput::Touch { touches } => {
            let (Some(bounds), Some(first)) = (bounds, touches.first()) else {
                return Point::ZERO;
            };
            Point::new(first.x - bounds.left, first.y - bounds.top)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_offset_passes_through() {
        let input = PointerInput::Mouse {
            offset: Point::new(42.5, 17.0),
        };
        let p = surface_point(&input, Some(CanvasBounds::new(100.0, 200.0)));
        assert_eq!(p, Point::new(42.5, 17.0));
    }

    #[test]
    fn mouse_ignores_missing_bounds() {
        let input = PointerInput::Mouse {
            offset: Point::new(3.0, 4.0),
        };
        assert_eq!(surface_point(&input, None), Point::new(3.0, 4.0));
    }

    #[test]
    fn touch_uses_first_touch_only() {
        let input = PointerInput::Touch {
            touches: vec![Point::new(150.0, 260.0), Point::new(400.0, 400.0)],
        };
        let p = surface_point(&input, Some(CanvasBounds::new(100.0, 200.0)));
        assert_eq!(p, Point::new(50.0, 60.0));
    }

    #[test]
    fn touch_without_bounds_falls_back_to_origin() {
        let input = PointerInput::Touch {
            touches: vec![Point::new(150.0, 260.0)],
        };
        assert_eq!(surface_point(&input, None), Point::ZERO);
    }

    #[test]
    fn empty_touch_list_falls_back_to_origin() {
        let input = PointerInput::Touch { touches: vec![] };
        let p = surface_point(&input, Some(CanvasBounds::new(10.0, 10.0)));
        assert_eq!(p, Point::ZERO);
    }
}

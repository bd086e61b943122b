//! Screen ↔ diagram coordinate transform.
//!
//! The canvas is positioned somewhere on screen (`viewport_origin`), may be
//! panned, and may be zoomed. Pointer input arrives in screen pixels and has
//! to be mapped into diagram units before it can be compared against element
//! bounds.
//!
//! ```text
//! diagram = (screen - viewport_origin - pan) / zoom
//! screen  = diagram * zoom + viewport_origin + pan
//! ```

use log::debug;
use thiserror::Error;

use crate::geometry::Point;

/// Errors raised when configuring a [`CoordinateSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    #[error("zoom factor must be finite and greater than zero, got {0}")]
    InvalidZoom(f32),
}

/// Maps between screen pixels and diagram units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSystem {
    viewport_origin: Point,
    pan: Point,
    zoom: f32,
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self {
            viewport_origin: Point::default(),
            pan: Point::default(),
            zoom: 1.0,
        }
    }
}

impl CoordinateSystem {
    /// Creates a coordinate system for a canvas whose top-left corner sits at
    /// `viewport_origin` on screen, with no pan and unit zoom.
    pub fn new(viewport_origin: Point) -> Self {
        Self {
            viewport_origin,
            ..Self::default()
        }
    }

    pub fn viewport_origin(&self) -> Point {
        self.viewport_origin
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Moves the canvas to a new place on screen.
    pub fn set_viewport_origin(&mut self, origin: Point) {
        self.viewport_origin = origin;
    }

    /// Shifts the pan by `delta` screen pixels.
    pub fn pan_by(&mut self, delta: Point) {
        self.pan = self.pan.add_point(delta);
    }

    /// Replaces the pan offset.
    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    /// Sets the zoom factor.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::InvalidZoom`] for zero, negative or
    /// non-finite factors. The previous zoom is kept in that case.
    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), CoordinateError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            debug!(zoom; "Rejected zoom factor");
            return Err(CoordinateError::InvalidZoom(zoom));
        }
        self.zoom = zoom;
        Ok(())
    }

    /// Translation between the screen origin and the diagram origin, in
    /// screen pixels.
    pub fn current_offset(&self) -> Point {
        self.viewport_origin.add_point(self.pan)
    }

    /// Converts a screen position (pixels) into diagram units.
    pub fn screen_to_diagram(&self, screen: Point) -> Point {
        screen
            .sub_point(self.current_offset())
            .scale(1.0 / self.zoom)
    }

    /// Converts a diagram position into screen pixels.
    pub fn diagram_to_screen(&self, diagram: Point) -> Point {
        diagram.scale(self.zoom).add_point(self.current_offset())
    }

    /// Converts a screen-space displacement into a diagram-space displacement.
    ///
    /// Unlike positions, displacements are unaffected by the origin and pan.
    pub fn screen_delta_to_diagram(&self, delta: Point) -> Point {
        delta.scale(1.0 / self.zoom)
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn coordinate_system_strategy() -> impl Strategy<Value = CoordinateSystem> {
        (
            -500.0f32..500.0,
            -500.0f32..500.0,
            -500.0f32..500.0,
            -500.0f32..500.0,
            0.25f32..4.0,
        )
            .prop_map(|(ox, oy, px, py, zoom)| {
                let mut coords = CoordinateSystem::new(Point::new(ox, oy));
                coords.set_pan(Point::new(px, py));
                coords
                    .set_zoom(zoom)
                    .expect("strategy only yields positive zoom");
                coords
            })
    }

    /// diagram_to_screen(screen_to_diagram(p)) ≈ p
    fn check_round_trip(coords: CoordinateSystem, x: f32, y: f32) -> Result<(), TestCaseError> {
        let screen = Point::new(x, y);
        let back = coords.diagram_to_screen(coords.screen_to_diagram(screen));

        prop_assert!(approx_eq!(f32, back.x(), screen.x(), epsilon = 0.01));
        prop_assert!(approx_eq!(f32, back.y(), screen.y(), epsilon = 0.01));
        Ok(())
    }

    proptest! {
        #[test]
        fn screen_diagram_round_trip(
            coords in coordinate_system_strategy(),
            x in -2000.0f32..2000.0,
            y in -2000.0f32..2000.0,
        ) {
            check_round_trip(coords, x, y)?;
        }
    }
}

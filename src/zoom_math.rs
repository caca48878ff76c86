//! Pan/zoom mathematics.
//!
//! This module contains the pure functions behind the viewer's zoom
//! buttons, wheel zoom, fit-to-screen and coordinate mapping, extracted for
//! testability.
//!
//! The rendered image is placed with `translate(pan) scale(zoom)` and the
//! origin at the container's top-left corner, so a point `p` in image
//! pixels appears at `container_origin + pan + p * zoom` on screen.

/// Represents pan/zoom transform state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Transform {
    /// Create a new transform with the given zoom and pan.
    pub fn new(zoom: f32, pan_x: f32, pan_y: f32) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// Create an identity transform (zoom=1, no pan).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Multiply the zoom by `factor` while keeping the view center in place.
    ///
    /// The new zoom is clamped to `[min_zoom, max_zoom]`. The pan moves by
    /// the center offset (half the container size, divided by the old
    /// zoom) times `new_zoom / old_zoom - 1`.
    pub fn zoom_about_center(
        &self,
        factor: f32,
        min_zoom: f32,
        max_zoom: f32,
        container_width: f32,
        container_height: f32,
    ) -> Transform {
        let new_zoom = clamp_zoom(self.zoom * factor, min_zoom, max_zoom);
        let ratio = new_zoom / self.zoom;

        let center_x = container_width / 2.0 / self.zoom;
        let center_y = container_height / 2.0 / self.zoom;

        Transform {
            zoom: new_zoom,
            pan_x: self.pan_x - center_x * (ratio - 1.0),
            pan_y: self.pan_y - center_y * (ratio - 1.0),
        }
    }

    /// Multiply the zoom by `factor` without touching the pan.
    pub fn scale_zoom(&self, factor: f32, min_zoom: f32, max_zoom: f32) -> Transform {
        Transform {
            zoom: clamp_zoom(self.zoom * factor, min_zoom, max_zoom),
            pan_x: self.pan_x,
            pan_y: self.pan_y,
        }
    }

    /// Apply a pan delta to the transform.
    pub fn pan_by(&self, dx: f32, dy: f32) -> Transform {
        Transform {
            zoom: self.zoom,
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
        }
    }

    /// Map a screen point to image pixels.
    ///
    /// `origin` is the screen position of the container's top-left corner.
    pub fn screen_to_image(&self, screen: (f32, f32), origin: (f32, f32)) -> (f32, f32) {
        (
            (screen.0 - origin.0 - self.pan_x) / self.zoom,
            (screen.1 - origin.1 - self.pan_y) / self.zoom,
        )
    }

    /// Map an image pixel to a screen point. Inverse of [`Transform::screen_to_image`].
    pub fn image_to_screen(&self, image: (f32, f32), origin: (f32, f32)) -> (f32, f32) {
        (
            origin.0 + self.pan_x + image.0 * self.zoom,
            origin.1 + self.pan_y + image.1 * self.zoom,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Clamp a zoom level into range.
pub fn clamp_zoom(zoom: f32, min_zoom: f32, max_zoom: f32) -> f32 {
    zoom.clamp(min_zoom, max_zoom)
}

/// Zoom that fits the whole image into the container without upscaling.
pub fn fit_zoom(container: (f32, f32), base: (f32, f32)) -> f32 {
    if base.0 <= 0.0 || base.1 <= 0.0 {
        return 1.0;
    }
    (container.0 / base.0).min(container.1 / base.1).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        assert_eq!(t.zoom, 1.0);
        assert_eq!(t.pan_x, 0.0);
        assert_eq!(t.pan_y, 0.0);
    }

    #[test]
    fn test_zoom_about_center_formula() {
        let t = Transform::new(2.0, 10.0, -20.0);
        let new_t = t.zoom_about_center(1.2, 0.1, 5.0, 800.0, 600.0);

        assert!(approx_eq(new_t.zoom, 2.4));
        // center offset = (400 / 2, 300 / 2), ratio - 1 = 0.2
        assert!(approx_eq(new_t.pan_x, 10.0 - 200.0 * 0.2));
        assert!(approx_eq(new_t.pan_y, -20.0 - 150.0 * 0.2));
    }

    #[test]
    fn test_zoom_about_center_at_limit_keeps_pan() {
        let t = Transform::new(5.0, 33.0, 44.0);
        let new_t = t.zoom_about_center(1.2, 0.1, 5.0, 800.0, 600.0);
        assert_eq!(new_t, t);
    }

    #[test]
    fn test_scale_zoom_clamps() {
        let t = Transform::new(4.5, 1.0, 2.0);
        let new_t = t.scale_zoom(1.15, 0.1, 5.0);
        assert_eq!(new_t.zoom, 5.0);
        assert_eq!((new_t.pan_x, new_t.pan_y), (1.0, 2.0));

        let t = Transform::new(0.11, 0.0, 0.0);
        assert_eq!(t.scale_zoom(0.85, 0.1, 5.0).zoom, 0.1);
    }

    #[test]
    fn test_pan_by() {
        let t = Transform::new(1.0, 10.0, 20.0);
        let new_t = t.pan_by(5.0, -10.0);

        assert_eq!(new_t.zoom, 1.0);
        assert_eq!(new_t.pan_x, 15.0);
        assert_eq!(new_t.pan_y, 10.0);
    }

    #[test]
    fn test_screen_image_round_trip() {
        let t = Transform::new(2.5, -30.0, 12.0);
        let origin = (100.0, 50.0);
        let (sx, sy) = t.image_to_screen((40.0, 80.0), origin);
        let (ix, iy) = t.screen_to_image((sx, sy), origin);
        assert!(approx_eq(ix, 40.0));
        assert!(approx_eq(iy, 80.0));
    }

    #[test]
    fn test_image_point_stays_anchored_across_zoom() {
        // The same image feature must map back to the same image coordinate
        // no matter which zoom/pan it is displayed at.
        let origin = (10.0, 10.0);
        let feature = (123.0, 45.0);
        for t in [
            Transform::identity(),
            Transform::new(0.3, 5.0, 5.0),
            Transform::new(4.2, -300.0, 120.0),
        ] {
            let screen = t.image_to_screen(feature, origin);
            let back = t.screen_to_image(screen, origin);
            assert!(approx_eq(back.0, feature.0) && approx_eq(back.1, feature.1));
        }
    }

    #[test]
    fn test_fit_zoom() {
        assert!(approx_eq(fit_zoom((800.0, 600.0), (1600.0, 1000.0)), 0.5));
        assert_eq!(fit_zoom((4000.0, 4000.0), (100.0, 100.0)), 1.0);
        assert_eq!(fit_zoom((800.0, 600.0), (0.0, 100.0)), 1.0);
    }
}

//! Image and polygon placement transforms.

use serde::{Deserialize, Serialize};

/// Placement of an overlay image on its base image.
///
/// Every numeric field is optional on the wire; [`ImageTransform::resolve`]
/// substitutes identity values for missing or non-finite ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageTransform {
    /// Horizontal offset in base-image pixels
    #[serde(default)]
    pub x: Option<f32>,
    /// Vertical offset in base-image pixels
    #[serde(default)]
    pub y: Option<f32>,
    /// Uniform scale factor
    #[serde(default)]
    pub scale: Option<f32>,
    /// Rotation in radians
    #[serde(default)]
    pub rotation: Option<f32>,
    /// Image file this transform is relative to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_to: Option<String>,
}

impl ImageTransform {
    /// Resolve to concrete values.
    pub fn resolve(&self) -> Placement {
        Placement::from_parts(self.x, self.y, self.scale, self.rotation)
    }
}

/// Placement of polygon vertices. All fields optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonTransform {
    /// Horizontal offset
    #[serde(default)]
    pub x: Option<f32>,
    /// Vertical offset
    #[serde(default)]
    pub y: Option<f32>,
    /// Uniform scale factor
    #[serde(default)]
    pub scale: Option<f32>,
    /// Rotation in radians
    #[serde(default)]
    pub rotation: Option<f32>,
}

impl PolygonTransform {
    /// Resolve to concrete values.
    pub fn resolve(&self) -> Placement {
        Placement::from_parts(self.x, self.y, self.scale, self.rotation)
    }
}

/// A resolved translate-scale-rotate placement with the origin at the
/// top-left corner.
///
/// Points are rotated first, then scaled, then translated, which is the
/// composition `translate(x, y) scale(s) rotate(r)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Horizontal offset
    pub x: f32,
    /// Vertical offset
    pub y: f32,
    /// Uniform scale factor
    pub scale: f32,
    /// Rotation in radians
    pub rotation: f32,
}

impl Placement {
    /// The identity placement.
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    /// Build from optional parts, each defaulted independently.
    pub fn from_parts(
        x: Option<f32>,
        y: Option<f32>,
        scale: Option<f32>,
        rotation: Option<f32>,
    ) -> Self {
        let finite = |v: Option<f32>, default: f32| v.filter(|v| v.is_finite()).unwrap_or(default);
        Self {
            x: finite(x, 0.0),
            y: finite(y, 0.0),
            scale: finite(scale, 1.0),
            rotation: finite(rotation, 0.0),
        }
    }

    /// Map a point from overlay space into base space.
    pub fn apply(&self, px: f32, py: f32) -> (f32, f32) {
        let (sin, cos) = self.rotation.sin_cos();
        let rx = px * cos - py * sin;
        let ry = px * sin + py * cos;
        (rx * self.scale + self.x, ry * self.scale + self.y)
    }

    /// Equivalent raster transform for compositing.
    pub fn to_skia(&self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_translate(self.x, self.y)
            .pre_scale(self.scale, self.scale)
            .pre_rotate(self.rotation.to_degrees())
    }

    /// CSS transform string with `transform-origin: 0 0` semantics.
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({}) rotate({}rad)",
            self.x, self.y, self.scale, self.rotation
        )
    }

    /// SVG `transform` attribute value.
    pub fn to_svg(&self) -> String {
        format!(
            "translate({} {}) scale({}) rotate({})",
            self.x,
            self.y,
            self.scale,
            self.rotation.to_degrees()
        )
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_non_finite_fields_default_independently() {
        let p = Placement::from_parts(Some(f32::NAN), Some(7.0), Some(f32::INFINITY), None);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 7.0);
        assert_eq!(p.scale, 1.0);
        assert_eq!(p.rotation, 0.0);
    }

    #[test]
    fn test_missing_transform_fields_deserialize() {
        let t: ImageTransform = serde_json::from_str(r#"{"x": 10, "relativeTo": "a.png"}"#).unwrap();
        let p = t.resolve();
        assert_eq!(p, Placement { x: 10.0, ..Placement::identity() });
        assert_eq!(t.relative_to.as_deref(), Some("a.png"));
    }

    #[test]
    fn test_rotate_then_scale_then_translate() {
        let p = Placement {
            x: 100.0,
            y: 50.0,
            scale: 2.0,
            rotation: std::f32::consts::FRAC_PI_2,
        };
        // (1, 0) rotates to (0, 1), scales to (0, 2), translates to (100, 52).
        let (x, y) = p.apply(1.0, 0.0);
        assert!(approx_eq(x, 100.0));
        assert!(approx_eq(y, 52.0));
    }

    #[test]
    fn test_skia_transform_matches_apply() {
        let p = Placement {
            x: 12.0,
            y: -4.0,
            scale: 0.5,
            rotation: 0.3,
        };
        let mut pts = [tiny_skia::Point::from_xy(30.0, 40.0)];
        p.to_skia().map_points(&mut pts);
        let (x, y) = p.apply(30.0, 40.0);
        assert!(approx_eq(pts[0].x, x));
        assert!(approx_eq(pts[0].y, y));
    }

    #[test]
    fn test_css_order() {
        let css = Placement::identity().to_css();
        assert_eq!(css, "translate(0px, 0px) scale(1) rotate(0rad)");
    }
}

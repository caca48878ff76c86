//! Viewer coordinate engine: pan/zoom state and pointer-drag tracking.

use crate::config::ViewSettings;
use crate::zoom_math::{Transform, fit_zoom};

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size multiplied by a zoom factor.
    pub fn scaled(&self, zoom: f32) -> Size {
        Size::new(self.width * zoom, self.height * zoom)
    }

    fn as_tuple(self) -> (f32, f32) {
        (self.width, self.height)
    }
}

/// Mouse/pen button that triggered a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left button, pen contact or touch
    Primary,
    /// Middle button
    Auxiliary,
    /// Right button
    Secondary,
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    /// Platform pointer id
    pub pointer_id: i64,
    /// Button pressed for down events
    pub button: PointerButton,
    /// Screen x
    pub x: f32,
    /// Screen y
    pub y: f32,
    /// Whether shift is held
    pub shift: bool,
}

impl PointerInput {
    /// Primary-button event without modifiers.
    pub fn primary(pointer_id: i64, x: f32, y: f32) -> Self {
        Self {
            pointer_id,
            button: PointerButton::Primary,
            x,
            y,
            shift: false,
        }
    }

    /// Same event with shift held.
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Pan/zoom state of the drawing viewer.
#[derive(Debug, Clone)]
pub struct ViewerState {
    transform: Transform,
    base_size: Size,
    is_dragging: bool,
    drag_start: (f32, f32),
    active_pointer: Option<i64>,
    settings: ViewSettings,
}

impl ViewerState {
    /// Create a viewer at zoom 1 with the configured default base size.
    pub fn new(settings: ViewSettings) -> Self {
        Self {
            transform: Transform::identity(),
            base_size: Size::new(settings.default_base_width, settings.default_base_height),
            is_dragging: false,
            drag_start: (0.0, 0.0),
            active_pointer: None,
            settings,
        }
    }

    /// Current zoom level.
    pub fn zoom(&self) -> f32 {
        self.transform.zoom
    }

    /// Current pan offset.
    pub fn pan(&self) -> (f32, f32) {
        (self.transform.pan_x, self.transform.pan_y)
    }

    /// Full transform.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Natural size of the base image.
    pub fn base_size(&self) -> Size {
        self.base_size
    }

    /// Whether a pan drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// Pointer id driving the current drag.
    pub fn active_pointer(&self) -> Option<i64> {
        self.active_pointer
    }

    /// Limits and factors in use.
    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    /// Record the natural size of a newly loaded base image.
    pub fn set_base_size(&mut self, size: Size) {
        log::debug!("Base size {}x{}", size.width, size.height);
        self.base_size = size;
    }

    /// Set the zoom directly, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.transform.zoom = zoom.clamp(self.settings.min_zoom, self.settings.max_zoom);
    }

    /// Set the pan directly.
    pub fn set_pan(&mut self, x: f32, y: f32) {
        self.transform.pan_x = x;
        self.transform.pan_y = y;
    }

    /// Zoom in by one step, keeping the view center in place.
    pub fn zoom_in(&mut self, container: Size) {
        self.zoom_step(self.settings.zoom_step, container);
    }

    /// Zoom out by one step, keeping the view center in place.
    pub fn zoom_out(&mut self, container: Size) {
        self.zoom_step(1.0 / self.settings.zoom_step, container);
    }

    fn zoom_step(&mut self, factor: f32, container: Size) {
        self.transform = self.transform.zoom_about_center(
            factor,
            self.settings.min_zoom,
            self.settings.max_zoom,
            container.width,
            container.height,
        );
        log::trace!("Zoom {:.3}", self.transform.zoom);
    }

    /// Apply a wheel event. Positive `delta_y` zooms out, anything else zooms in.
    ///
    /// Returns `true`: the event is always consumed so the page does not scroll
    /// while the pointer is over the drawing.
    pub fn wheel(&mut self, delta_y: f32) -> bool {
        let factor = if delta_y > 0.0 {
            self.settings.wheel_zoom_out
        } else {
            self.settings.wheel_zoom_in
        };
        self.transform =
            self.transform
                .scale_zoom(factor, self.settings.min_zoom, self.settings.max_zoom);
        log::trace!("Wheel zoom {:.3}", self.transform.zoom);
        true
    }

    /// Fit the base image into the container and reset the pan.
    pub fn fit_to_screen(&mut self, container: Size) {
        let zoom = fit_zoom(container.as_tuple(), self.base_size.as_tuple());
        self.set_zoom(zoom);
        self.set_pan(0.0, 0.0);
    }

    /// Zoom 1, no pan.
    pub fn reset(&mut self) {
        self.transform = Transform::identity();
    }

    /// Start a pan drag.
    ///
    /// Dragging starts on the primary button; in markup mode shift must be
    /// held too, since a plain press draws. A second pointer is ignored while
    /// one is active.
    pub fn pointer_down(&mut self, input: &PointerInput, markup_mode: bool) -> bool {
        if input.button != PointerButton::Primary {
            return false;
        }
        if markup_mode && !input.shift {
            return false;
        }
        if self.active_pointer.is_some() {
            return false;
        }

        self.active_pointer = Some(input.pointer_id);
        self.is_dragging = true;
        self.drag_start = (input.x - self.transform.pan_x, input.y - self.transform.pan_y);
        true
    }

    /// Continue a pan drag. Events from other pointers are ignored.
    pub fn pointer_move(&mut self, input: &PointerInput) -> bool {
        if !self.is_dragging || self.active_pointer != Some(input.pointer_id) {
            return false;
        }
        self.set_pan(input.x - self.drag_start.0, input.y - self.drag_start.1);
        true
    }

    /// End a drag on pointer up, cancel or leave.
    ///
    /// Returns `true` when the pointer was the captured one and should be
    /// released.
    pub fn pointer_up(&mut self, pointer_id: i64) -> bool {
        let released = self.active_pointer == Some(pointer_id);
        if released {
            self.active_pointer = None;
            self.is_dragging = false;
        }
        released
    }

    /// Map a screen point to base-image pixels.
    pub fn screen_to_image(&self, screen: (f32, f32), container_origin: (f32, f32)) -> (f32, f32) {
        self.transform.screen_to_image(screen, container_origin)
    }

    /// Map a base-image pixel to the screen.
    pub fn image_to_screen(&self, image: (f32, f32), container_origin: (f32, f32)) -> (f32, f32) {
        self.transform.image_to_screen(image, container_origin)
    }
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(ViewSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn container() -> Size {
        Size::new(800.0, 600.0)
    }

    #[test]
    fn test_zoom_in_never_exceeds_max() {
        let mut v = ViewerState::default();
        for _ in 0..50 {
            v.zoom_in(container());
        }
        assert!(v.zoom() <= 5.0);
        assert!(approx_eq(v.zoom(), 5.0));
    }

    #[test]
    fn test_zoom_out_never_drops_below_min() {
        let mut v = ViewerState::default();
        for _ in 0..50 {
            v.zoom_out(container());
        }
        assert!(v.zoom() >= 0.1);
        assert!(approx_eq(v.zoom(), 0.1));
    }

    #[test]
    fn test_zoom_in_recenters_pan() {
        let mut v = ViewerState::default();
        v.zoom_in(container());
        assert!(approx_eq(v.zoom(), 1.2));
        let (x, y) = v.pan();
        assert!(approx_eq(x, -400.0 * 0.2));
        assert!(approx_eq(y, -300.0 * 0.2));
    }

    #[test]
    fn test_wheel_direction_and_clamp() {
        let mut v = ViewerState::default();
        assert!(v.wheel(100.0));
        assert!(approx_eq(v.zoom(), 0.85));
        v.wheel(-100.0);
        assert!(approx_eq(v.zoom(), 0.85 * 1.15));
        for _ in 0..100 {
            v.wheel(-1.0);
        }
        assert_eq!(v.zoom(), 5.0);
        assert_eq!(v.pan(), (0.0, 0.0));
    }

    #[test]
    fn test_fit_to_screen_and_reset() {
        let mut v = ViewerState::default();
        v.set_pan(40.0, 40.0);
        v.fit_to_screen(container());
        assert!(approx_eq(v.zoom(), 0.5));
        assert_eq!(v.pan(), (0.0, 0.0));

        v.set_base_size(Size::new(100.0, 100.0));
        v.fit_to_screen(container());
        assert_eq!(v.zoom(), 1.0);

        v.zoom_in(container());
        v.reset();
        assert_eq!(v.zoom(), 1.0);
        assert_eq!(v.pan(), (0.0, 0.0));
    }

    #[test]
    fn test_drag_pans_by_pointer_delta() {
        let mut v = ViewerState::default();
        v.set_pan(10.0, 20.0);
        assert!(v.pointer_down(&PointerInput::primary(1, 100.0, 100.0), false));
        assert!(v.pointer_move(&PointerInput::primary(1, 130.0, 90.0)));
        assert_eq!(v.pan(), (40.0, 10.0));
        assert!(v.pointer_up(1));
        assert!(!v.is_dragging());
        assert!(!v.pointer_move(&PointerInput::primary(1, 500.0, 500.0)));
        assert_eq!(v.pan(), (40.0, 10.0));
    }

    #[test]
    fn test_second_pointer_is_ignored() {
        let mut v = ViewerState::default();
        assert!(v.pointer_down(&PointerInput::primary(1, 0.0, 0.0), false));
        assert!(!v.pointer_down(&PointerInput::primary(2, 50.0, 50.0), false));
        assert!(!v.pointer_move(&PointerInput::primary(2, 80.0, 80.0)));
        assert_eq!(v.pan(), (0.0, 0.0));
        assert!(!v.pointer_up(2));
        assert!(v.is_dragging());
        assert!(v.pointer_up(1));
    }

    #[test]
    fn test_markup_mode_requires_shift_to_pan() {
        let mut v = ViewerState::default();
        assert!(!v.pointer_down(&PointerInput::primary(1, 0.0, 0.0), true));
        assert!(v.pointer_down(&PointerInput::primary(1, 0.0, 0.0).with_shift(), true));
    }

    #[test]
    fn test_non_primary_button_does_not_pan() {
        let mut v = ViewerState::default();
        let mut input = PointerInput::primary(1, 0.0, 0.0);
        input.button = PointerButton::Secondary;
        assert!(!v.pointer_down(&input, false));
    }
}

use crate::{
    foundation::core::Point,
    foundation::math::wrap_delta_deg,
    geometry::transform::{OverlayTransform, ResizeMode},
    interaction::gesture::{
        Affordance, CursorHint, GestureKind, GestureSession, PointerInput, hit_test_body,
        pointer_angle_deg,
    },
    interaction::view::{OverlayStyle, OverlayView},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Moving,
    Resizing,
    Rotating,
}

/// Tunables the controller reads on every gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerSettings {
    pub resize_mode: ResizeMode,
    pub min_extent_px: f64,
    pub resize_hit_zone_px: f64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            resize_mode: ResizeMode::Free,
            min_extent_px: OverlayTransform::MIN_EXTENT,
            resize_hit_zone_px: 10.0,
        }
    }
}

/// Pointer-gesture state machine: `Idle -> {Moving | Resizing | Rotating} -> Idle`.
///
/// Move and up events are accepted wherever the pointer is; only the press
/// decides what the gesture does.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    settings: ControllerSettings,
    gesture: Option<GestureSession>,
}

impl InteractionController {
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            settings,
            gesture: None,
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn state(&self) -> ControllerState {
        match self.gesture.map(|g| g.kind) {
            None => ControllerState::Idle,
            Some(GestureKind::Move) => ControllerState::Moving,
            Some(GestureKind::Resize) => ControllerState::Resizing,
            Some(GestureKind::Rotate) => ControllerState::Rotating,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.gesture.is_none()
    }

    pub fn active_gesture(&self) -> Option<&GestureSession> {
        self.gesture.as_ref()
    }

    /// Start a gesture. Presses while a gesture is in flight, and body
    /// presses that miss the overlay, leave the state unchanged.
    pub fn pointer_down(
        &mut self,
        affordance: Affordance,
        input: PointerInput,
        transform: &OverlayTransform,
    ) -> ControllerState {
        if self.gesture.is_some() {
            tracing::debug!(?affordance, "pointer down ignored, gesture in flight");
            return self.state();
        }

        let kind = match affordance {
            Affordance::Move => Some(GestureKind::Move),
            Affordance::Resize => Some(GestureKind::Resize),
            Affordance::Rotate => Some(GestureKind::Rotate),
            Affordance::Body => {
                hit_test_body(transform, input.position, self.settings.resize_hit_zone_px)
            }
        };

        if let Some(kind) = kind {
            self.gesture = Some(GestureSession::begin(kind, input, *transform));
            tracing::debug!(?kind, x = input.position.x, y = input.position.y, "gesture start");
        }
        self.state()
    }

    /// Feed a pointer move. Returns `true` when `transform` changed; the view
    /// receives the new style before this returns.
    pub fn pointer_move(
        &mut self,
        input: PointerInput,
        transform: &mut OverlayTransform,
        view: &mut dyn OverlayView,
    ) -> bool {
        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };
        if !gesture.tracks(input.source) {
            return false;
        }

        let delta = input.position - gesture.start;
        let origin = gesture.origin;
        let next = match gesture.kind {
            GestureKind::Move => {
                let mut next = *transform;
                next.x = origin.x;
                next.y = origin.y;
                next.apply_move_delta(delta.x, delta.y);
                next
            }
            GestureKind::Resize => {
                let mut next = *transform;
                next.width = origin.width;
                next.height = origin.height;
                next.apply_resize_delta_with(
                    delta.x,
                    delta.y,
                    self.settings.resize_mode,
                    self.settings.min_extent_px,
                );
                next
            }
            GestureKind::Rotate => {
                let Some(pivot) = gesture.pivot.as_mut() else {
                    return false;
                };
                let current = pointer_angle_deg(pivot.center, input.position);
                let step = wrap_delta_deg(current - pivot.last_angle_deg);
                pivot.last_angle_deg = current;
                let mut next = *transform;
                next.apply_rotation_delta(step);
                next
            }
        };

        if !next.is_finite() {
            tracing::warn!(?next, "dropping non-finite transform update");
            return false;
        }

        let changed = next != *transform;
        *transform = next;
        view.apply_style(&OverlayStyle::from(&*transform));
        changed
    }

    /// End the gesture, wherever the pointer is.
    pub fn pointer_up(&mut self) -> Option<GestureKind> {
        let ended = self.gesture.take().map(|g| g.kind);
        if let Some(kind) = ended {
            tracing::debug!(?kind, "gesture end");
        }
        ended
    }

    /// Drop any in-flight gesture without applying further moves (used when
    /// the overlay it targets is replaced).
    pub(crate) fn reset(&mut self) {
        self.gesture = None;
    }

    /// Hover cursor for the overlay body.
    pub fn cursor_hint(&self, p: Point, transform: &OverlayTransform) -> CursorHint {
        match hit_test_body(transform, p, self.settings.resize_hit_zone_px) {
            Some(GestureKind::Resize) => CursorHint::SeResize,
            Some(_) => CursorHint::Move,
            None => CursorHint::Default,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/controller.rs"]
mod tests;

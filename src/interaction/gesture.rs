use crate::{foundation::core::Point, geometry::transform::OverlayTransform};

/// Where a pointer sample came from. Mouse and touch feed the same state
/// machine; touch samples carry the identifier of the finger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PointerSource {
    Mouse,
    Touch { id: u64 },
}

/// One pointer sample in display space (container-relative CSS pixels).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerInput {
    pub source: PointerSource,
    pub position: Point,
}

impl PointerInput {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            source: PointerSource::Mouse,
            position: Point::new(x, y),
        }
    }

    pub fn touch(id: u64, x: f64, y: f64) -> Self {
        Self {
            source: PointerSource::Touch { id },
            position: Point::new(x, y),
        }
    }
}

/// The control a gesture was started on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affordance {
    Move,
    Resize,
    Rotate,
    /// The overlay itself: the bottom-right hit zone resizes, the rest moves.
    Body,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Move,
    Resize,
    Rotate,
}

/// Hover feedback for the overlay body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Move,
    SeResize,
}

impl CursorHint {
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Move => "move",
            Self::SeResize => "se-resize",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RotationPivot {
    pub(crate) center: Point,
    pub(crate) last_angle_deg: f64,
}

/// State captured when a gesture starts, discarded when it ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSession {
    pub kind: GestureKind,
    pub source: PointerSource,
    pub start: Point,
    pub origin: OverlayTransform,
    pub(crate) pivot: Option<RotationPivot>,
}

impl GestureSession {
    pub(crate) fn begin(kind: GestureKind, input: PointerInput, origin: OverlayTransform) -> Self {
        let pivot = (kind == GestureKind::Rotate).then(|| {
            let center = origin.rotated_bounding_box().center();
            RotationPivot {
                center,
                last_angle_deg: pointer_angle_deg(center, input.position),
            }
        });
        Self {
            kind,
            source: input.source,
            start: input.position,
            origin,
            pivot,
        }
    }

    /// Rotation center, fixed for the whole gesture.
    pub fn pivot_center(&self) -> Option<Point> {
        self.pivot.map(|p| p.center)
    }

    /// A touch gesture only follows the finger that started it.
    pub(crate) fn tracks(&self, source: PointerSource) -> bool {
        match (self.source, source) {
            (PointerSource::Mouse, PointerSource::Mouse) => true,
            (PointerSource::Touch { id: a }, PointerSource::Touch { id: b }) => a == b,
            _ => false,
        }
    }
}

/// Angle of `p` around `center`, in degrees, in `(-180, 180]`.
pub fn pointer_angle_deg(center: Point, p: Point) -> f64 {
    (p.y - center.y).atan2(p.x - center.x).to_degrees()
}

/// Resolve a press on the overlay body into a move or a corner resize.
///
/// Returns `None` when `p` misses the overlay.
pub fn hit_test_body(transform: &OverlayTransform, p: Point, zone_px: f64) -> Option<GestureKind> {
    if !transform.contains_point(p) {
        return None;
    }
    let local = transform.to_local(p);
    if local.x > transform.width - zone_px && local.y > transform.height - zone_px {
        Some(GestureKind::Resize)
    } else {
        Some(GestureKind::Move)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/gesture.rs"]
mod tests;

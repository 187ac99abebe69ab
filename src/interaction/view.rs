use crate::geometry::transform::OverlayTransform;

/// Inline style of the on-screen overlay element.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayStyle {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub rotation_deg: f64,
}

impl From<&OverlayTransform> for OverlayStyle {
    fn from(t: &OverlayTransform) -> Self {
        Self {
            left: t.x,
            top: t.y,
            width: t.width,
            height: t.height,
            rotation_deg: t.rotation_deg,
        }
    }
}

impl OverlayStyle {
    pub fn to_css(&self) -> String {
        format!(
            "left: {}px; top: {}px; width: {}px; height: {}px; transform: rotate({}deg);",
            self.left, self.top, self.width, self.height, self.rotation_deg
        )
    }
}

/// Live feedback surface updated synchronously on every gesture move.
pub trait OverlayView {
    fn apply_style(&mut self, style: &OverlayStyle);
}

/// View that discards updates (headless use).
#[derive(Clone, Copy, Debug, Default)]
pub struct NullView;

impl OverlayView for NullView {
    fn apply_style(&mut self, _style: &OverlayStyle) {}
}

impl OverlayView for Vec<OverlayStyle> {
    fn apply_style(&mut self, style: &OverlayStyle) {
        self.push(*style);
    }
}

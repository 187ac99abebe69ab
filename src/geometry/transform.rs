use crate::foundation::core::{Affine, Point, Rect, Vec2};

/// How a resize gesture distributes the pointer delta over the two axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// `width += dx`, `height += dy`.
    #[default]
    Free,
    /// Keep the height/width ratio the overlay had before the delta; the axis
    /// with the larger relative change drives the other one.
    LockAspect,
}

/// Live, user-editable placement of the active overlay in display space.
///
/// `x`/`y` is the top-left corner of the unrotated bounding box; rotation is
/// applied about the box center and is kept in accumulated degrees (never
/// wrapped into `[0, 360)`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayTransform {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation_deg: f64,
}

impl Default for OverlayTransform {
    fn default() -> Self {
        Self::reset(Self::DEFAULT_WIDTH)
    }
}

impl OverlayTransform {
    /// Width assigned to a freshly selected overlay.
    pub const DEFAULT_WIDTH: f64 = 100.0;
    /// Smallest extent a resize may produce.
    pub const MIN_EXTENT: f64 = 1.0;

    /// Canonical transform: origin, square `default_width` box, no rotation.
    pub fn reset(default_width: f64) -> Self {
        Self::reset_with_aspect(default_width, None)
    }

    /// Canonical transform whose height follows `aspect` (height / width) when
    /// the overlay's native aspect is known.
    pub fn reset_with_aspect(default_width: f64, aspect: Option<f64>) -> Self {
        let height = match aspect {
            Some(a) if a.is_finite() && a > 0.0 => default_width * a,
            _ => default_width,
        };
        Self {
            x: 0.0,
            y: 0.0,
            width: default_width,
            height,
            rotation_deg: 0.0,
        }
    }

    /// Translate; no bounds checking, the overlay may leave the canvas.
    pub fn apply_move_delta(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Independent-axis resize floored at [`Self::MIN_EXTENT`].
    pub fn apply_resize_delta(&mut self, dx: f64, dy: f64) {
        self.apply_resize_delta_with(dx, dy, ResizeMode::Free, Self::MIN_EXTENT);
    }

    pub fn apply_resize_delta_with(
        &mut self,
        dx: f64,
        dy: f64,
        mode: ResizeMode,
        min_extent: f64,
    ) {
        let min_extent = if min_extent.is_finite() && min_extent > 0.0 {
            min_extent
        } else {
            Self::MIN_EXTENT
        };

        match mode {
            ResizeMode::Free => {
                self.width = (self.width + dx).max(min_extent);
                self.height = (self.height + dy).max(min_extent);
            }
            ResizeMode::LockAspect => {
                let (w, h) = (self.width.max(min_extent), self.height.max(min_extent));
                let ratio = h / w;
                let new_w = if (dx / w).abs() >= (dy / h).abs() {
                    w + dx
                } else {
                    (h + dy) / ratio
                };
                let floor_w = min_extent.max(min_extent / ratio);
                self.width = new_w.max(floor_w);
                self.height = self.width * ratio;
            }
        }
    }

    /// Accumulate rotation; repeated full turns are kept (720 stays 720).
    pub fn apply_rotation_delta(&mut self, delta_deg: f64) {
        self.rotation_deg += delta_deg;
    }

    pub fn rotation_rad(&self) -> f64 {
        self.rotation_deg.to_radians()
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Unrotated bounding box.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Maps the unit square onto the rotated overlay rectangle.
    pub fn to_affine(&self) -> Affine {
        let half = Vec2::new(self.width / 2.0, self.height / 2.0);
        Affine::translate(self.center().to_vec2())
            * Affine::rotate(self.rotation_rad())
            * Affine::translate(-half)
            * Affine::scale_non_uniform(self.width, self.height)
    }

    /// Axis-aligned box covering the rotated overlay, as a layout engine
    /// would report it.
    pub fn rotated_bounding_box(&self) -> Rect {
        self.to_affine().transform_rect_bbox(Rect::new(0.0, 0.0, 1.0, 1.0))
    }

    /// Express `p` in the overlay's own unrotated frame, origin at its
    /// top-left corner.
    pub fn to_local(&self, p: Point) -> Point {
        let offset = p - self.center();
        let undo = Affine::rotate(-self.rotation_rad()) * offset.to_point();
        Point::new(undo.x + self.width / 2.0, undo.y + self.height / 2.0)
    }

    /// Rotation-aware containment test.
    pub fn contains_point(&self, p: Point) -> bool {
        if self.width <= 0.0 || self.height <= 0.0 {
            return false;
        }
        let local = self.to_local(p);
        (0.0..=self.width).contains(&local.x) && (0.0..=self.height).contains(&local.y)
    }

    /// Scale position and size per axis; rotation is untouched.
    pub fn scale_axes(&self, sx: f64, sy: f64) -> Self {
        Self {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
            rotation_deg: self.rotation_deg,
        }
    }

    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height, self.rotation_deg]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/transform.rs"]
mod tests;

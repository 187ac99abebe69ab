//! Overlayer places a sticker-style overlay on a background photo and flattens
//! both into one PNG at the background's native resolution.
//!
//! The surface is session-oriented:
//!
//! - Upload a background and preload the overlay [`Gallery`] through an [`Editor`]
//! - Move, resize and rotate the overlay with pointer gestures
//! - [`Editor::export`] the composite into a [`SaveSink`]
//!
//! Gesture state lives in display space (the background as fitted to its
//! container); [`to_source_space`] maps it to native pixels at export time.
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub(crate) mod compose;
pub(crate) mod config;
pub(crate) mod geometry;
pub(crate) mod interaction;
pub(crate) mod session;

pub use crate::foundation::core::{Affine, PixelSize, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{OverlayerError, OverlayerResult};

pub use crate::assets::decode::{check_image_mime, decode_image};
pub use crate::assets::gallery::{CheatCode, Gallery, GalleryEntry, GallerySlot, SlotStatus};
pub use crate::assets::loader::{AssetLoader, LoadCompletion, LoadTarget, LoadTicket};
pub use crate::assets::raster::{ImageFile, PreparedImage, mime_for_path};
pub use crate::assets::source::{AssetSource, DirAssetSource, MemoryAssetSource};
pub use crate::compose::compositor::{
    BackgroundRaster, CompositeResult, MAX_RASTER_EXTENT, OverlayFailurePolicy, compose,
    compose_with_display, render_preview,
};
pub use crate::compose::save::{DirSink, MemorySink, SaveSink};
pub use crate::config::EditorConfig;
pub use crate::geometry::mapper::{
    AxisScale, ContainerBounds, FittedBackground, fit_to_container, to_display_space,
    to_source_space,
};
pub use crate::geometry::transform::{OverlayTransform, ResizeMode};
pub use crate::interaction::controller::{
    ControllerSettings, ControllerState, InteractionController,
};
pub use crate::interaction::gesture::{
    Affordance, CursorHint, GestureKind, GestureSession, PointerInput, PointerSource,
    hit_test_body, pointer_angle_deg,
};
pub use crate::interaction::view::{NullView, OverlayStyle, OverlayView};
pub use crate::session::editor::Editor;
pub use crate::session::state::{ActiveOverlay, EditorSession, ExportReceipt};

use super::*;
use crate::{
    assets::loader::LoadTicket,
    compose::save::MemorySink,
    foundation::core::Size,
    interaction::view::NullView,
};

const BLUE: [u8; 4] = [0, 0, 255, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

fn near(got: [u8; 4], want: [u8; 4]) -> bool {
    got.iter()
        .zip(want.iter())
        .all(|(g, w)| (i16::from(*g) - i16::from(*w)).abs() <= 3)
}

fn bg_completion(ticket: u64, w: u32, h: u32) -> LoadCompletion {
    LoadCompletion {
        ticket: LoadTicket(ticket),
        target: LoadTarget::Background,
        label: format!("bg-{w}x{h}.png"),
        result: PreparedImage::solid(w, h, BLUE),
    }
}

fn slot_completion(
    ticket: u64,
    slot: usize,
    result: OverlayerResult<PreparedImage>,
) -> LoadCompletion {
    LoadCompletion {
        ticket: LoadTicket(ticket),
        target: LoadTarget::GallerySlot(slot),
        label: format!("slot-{slot}"),
        result,
    }
}

fn session_400() -> EditorSession {
    EditorSession::new(EditorConfig {
        container: ContainerBounds::width(400.0),
        ..EditorConfig::default()
    })
    .unwrap()
}

#[test]
fn export_without_background_is_refused() {
    let session = session_400();
    let mut sink = MemorySink::default();
    let err = session.export(&mut sink).unwrap_err();
    assert!(matches!(err, OverlayerError::NoBackground));
    assert_eq!(err.to_string(), "Please upload a background image first.");
    assert!(sink.saved.is_empty());
}

#[test]
fn non_image_upload_is_rejected() {
    let session = session_400();
    let file = ImageFile::new("notes.txt", "text/plain", b"hello".to_vec());
    let err = session.accept_background_file(&file).unwrap_err();
    assert!(matches!(err, OverlayerError::InvalidInput(_)));

    let png = ImageFile::new("a.png", "image/png", Vec::new());
    session.accept_background_file(&png).unwrap();
}

#[test]
fn background_is_fitted_on_completion() {
    let mut session = session_400();
    session.apply_completion(bg_completion(0, 800, 600)).unwrap();
    let bg = session.background().unwrap();
    assert_eq!(bg.display_size(), Size::new(400.0, 300.0));
    assert_eq!(bg.name, "bg-800x600.png");
}

#[test]
fn failed_background_decode_keeps_previous_background() {
    let mut session = session_400();
    session.apply_completion(bg_completion(0, 800, 600)).unwrap();

    let failed = LoadCompletion {
        ticket: LoadTicket(1),
        target: LoadTarget::Background,
        label: "broken.png".to_string(),
        result: Err(OverlayerError::decode("Error loading the image: truncated")),
    };
    let err = session.apply_completion(failed).unwrap_err();
    assert!(matches!(err, OverlayerError::Decode(_)));
    assert_eq!(session.background().unwrap().native_size().width, 800);
}

#[test]
fn last_completed_background_wins() {
    let mut session = session_400();
    // ticket 1 finishes first, ticket 0 finishes later and replaces it
    session.apply_completion(bg_completion(1, 200, 100)).unwrap();
    session.apply_completion(bg_completion(0, 800, 600)).unwrap();
    assert_eq!(session.background().unwrap().native_size().width, 800);
}

#[test]
fn selecting_an_overlay_resets_its_transform() {
    let mut session = session_400();
    session
        .apply_completion(slot_completion(0, 0, PreparedImage::solid(10, 20, RED)))
        .unwrap();
    assert!(session.select_overlay(0).unwrap());
    let t = *session.transform().unwrap();
    assert_eq!((t.x, t.y, t.width, t.rotation_deg), (0.0, 0.0, 100.0, 0.0));
    assert_eq!(t.height, 200.0);

    session.pointer_down(Affordance::Move, PointerInput::mouse(5.0, 5.0));
    session.pointer_move(PointerInput::mouse(25.0, 15.0), &mut NullView);
    session.pointer_up();
    assert_eq!(session.transform().unwrap().x, 20.0);

    assert!(session.select_overlay(0).unwrap());
    assert_eq!(session.transform().unwrap().x, 0.0);
}

#[test]
fn height_follows_aspect_once_the_slot_decodes() {
    let mut session = session_400();
    assert!(session.select_overlay(1).unwrap());
    assert_eq!(session.transform().unwrap().height, 100.0);

    session
        .apply_completion(slot_completion(0, 1, PreparedImage::solid(20, 10, RED)))
        .unwrap();
    assert_eq!(session.transform().unwrap().height, 50.0);
}

#[test]
fn inert_slot_ignores_selection() {
    let mut session = session_400();
    session
        .apply_completion(slot_completion(0, 2, Err(OverlayerError::decode("bad"))))
        .unwrap();
    assert!(session.gallery().slot(2).unwrap().is_inert());
    assert!(!session.select_overlay(2).unwrap());
    assert!(session.overlay().is_none());
    assert!(session.select_overlay(9).is_err());
}

#[test]
fn pointer_events_without_overlay_are_ignored() {
    let mut session = session_400();
    let state = session.pointer_down(Affordance::Move, PointerInput::mouse(1.0, 1.0));
    assert_eq!(state, ControllerState::Idle);
    assert!(!session.pointer_move(PointerInput::mouse(5.0, 5.0), &mut NullView));
    assert_eq!(session.pointer_up(), None);
    assert_eq!(session.cursor_hint(Point::new(1.0, 1.0)), CursorHint::Default);
}

#[test]
fn export_composes_at_native_resolution() {
    let mut session = session_400();
    session.apply_completion(bg_completion(0, 800, 600)).unwrap();
    session
        .apply_completion(slot_completion(1, 0, PreparedImage::solid(10, 10, RED)))
        .unwrap();
    session.select_overlay(0).unwrap();

    let mut sink = MemorySink::default();
    let receipt = session.export(&mut sink).unwrap();
    assert_eq!(receipt.file_name, "image.png");
    assert_eq!((receipt.width, receipt.height), (800, 600));
    assert!(receipt.overlay_included);
    assert_eq!(sink.saved.len(), 1);
    assert_eq!(sink.saved[0].1.len(), receipt.byte_len);

    let decoded = image::load_from_memory(&sink.saved[0].1).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (800, 600));
    assert!(near(decoded.get_pixel(100, 100).0, RED));
}

#[test]
fn missing_overlay_raster_follows_policy() {
    let mut session = session_400();
    session.apply_completion(bg_completion(0, 800, 600)).unwrap();
    session.select_overlay(0).unwrap();

    let out = session.compose().unwrap();
    assert!(near(out.pixel(10, 10).unwrap(), BLUE));

    let mut strict = EditorSession::new(EditorConfig {
        container: ContainerBounds::width(400.0),
        overlay_failure: OverlayFailurePolicy::Fail,
        ..EditorConfig::default()
    })
    .unwrap();
    strict.apply_completion(bg_completion(0, 800, 600)).unwrap();
    strict.select_overlay(0).unwrap();
    let err = strict.compose().unwrap_err();
    assert!(matches!(err, OverlayerError::OverlayUnavailable(_)));
}

#[test]
fn resize_container_refits_background() {
    let mut session = session_400();
    session.apply_completion(bg_completion(0, 800, 600)).unwrap();
    session.resize_container(ContainerBounds::width(200.0)).unwrap();
    assert_eq!(session.background().unwrap().display_size(), Size::new(200.0, 150.0));
    assert!(session.resize_container(ContainerBounds::width(0.0)).is_err());
    assert_eq!(session.config().container, ContainerBounds::width(200.0));
}

#[test]
fn overlay_style_tracks_transform() {
    let mut session = session_400();
    assert!(session.overlay_style().is_none());
    session.select_overlay(0).unwrap();
    let css = session.overlay_style().unwrap().to_css();
    assert!(css.contains("width: 100px"));
    assert!(css.contains("rotate(0deg)"));
}

#[test]
fn cleared_overlay_is_left_out_of_export() {
    let mut session = session_400();
    session.apply_completion(bg_completion(0, 800, 600)).unwrap();
    session
        .apply_completion(slot_completion(1, 0, PreparedImage::solid(10, 10, RED)))
        .unwrap();
    session.select_overlay(0).unwrap();
    session.pointer_down(Affordance::Move, PointerInput::mouse(5.0, 5.0));

    session.clear_overlay();
    assert!(session.overlay().is_none());
    assert_eq!(session.controller_state(), ControllerState::Idle);
    assert!(!session.pointer_move(PointerInput::mouse(50.0, 50.0), &mut NullView));

    let mut sink = MemorySink::default();
    let receipt = session.export(&mut sink).unwrap();
    assert!(!receipt.overlay_included);
    let decoded = image::load_from_memory(&sink.saved[0].1).unwrap().to_rgba8();
    assert!(near(decoded.get_pixel(100, 100).0, BLUE));
}

use super::*;
use crate::interaction::view::NullView;

fn drag(
    c: &mut InteractionController,
    t: &mut OverlayTransform,
    affordance: Affordance,
    path: &[(f64, f64)],
) {
    let (x0, y0) = path[0];
    c.pointer_down(affordance, PointerInput::mouse(x0, y0), t);
    for &(x, y) in &path[1..] {
        c.pointer_move(PointerInput::mouse(x, y), t, &mut NullView);
    }
    c.pointer_up();
}

#[test]
fn idle_ignores_moves_and_ups() {
    let mut c = InteractionController::default();
    let mut t = OverlayTransform::default();
    assert!(!c.pointer_move(PointerInput::mouse(10.0, 10.0), &mut t, &mut NullView));
    assert_eq!(c.pointer_up(), None);
    assert_eq!(t, OverlayTransform::default());
    assert_eq!(c.state(), ControllerState::Idle);
}

#[test]
fn move_gesture_is_relative_to_start() {
    let mut c = InteractionController::default();
    let mut t = OverlayTransform::default();
    assert_eq!(
        c.pointer_down(Affordance::Move, PointerInput::mouse(50.0, 50.0), &t),
        ControllerState::Moving
    );
    let mut styles = Vec::new();
    c.pointer_move(PointerInput::mouse(60.0, 55.0), &mut t, &mut styles);
    c.pointer_move(PointerInput::mouse(70.0, 60.0), &mut t, &mut styles);
    assert_eq!((t.x, t.y), (20.0, 10.0));
    assert_eq!(styles.len(), 2);
    assert_eq!(styles[1].left, 20.0);
    assert_eq!(styles[1].top, 10.0);
    assert_eq!(c.pointer_up(), Some(GestureKind::Move));
    assert!(c.is_idle());
}

#[test]
fn move_keeps_tracking_outside_the_overlay() {
    let mut c = InteractionController::default();
    let mut t = OverlayTransform::default();
    drag(
        &mut c,
        &mut t,
        Affordance::Move,
        &[(5.0, 5.0), (900.0, 5.0), (1005.0, -995.0)],
    );
    assert_eq!((t.x, t.y), (1000.0, -1000.0));
}

#[test]
fn resize_gesture_uses_start_size() {
    let mut c = InteractionController::default();
    let mut t = OverlayTransform::default();
    drag(
        &mut c,
        &mut t,
        Affordance::Resize,
        &[(100.0, 100.0), (150.0, 90.0), (130.0, 120.0)],
    );
    assert_eq!((t.width, t.height), (130.0, 120.0));
    assert_eq!((t.x, t.y), (0.0, 0.0));
}

#[test]
fn resize_is_floored() {
    let mut c = InteractionController::new(ControllerSettings {
        min_extent_px: 5.0,
        ..ControllerSettings::default()
    });
    let mut t = OverlayTransform::default();
    drag(
        &mut c,
        &mut t,
        Affordance::Resize,
        &[(100.0, 100.0), (-400.0, -400.0)],
    );
    assert_eq!((t.width, t.height), (5.0, 5.0));
}

#[test]
fn locked_resize_follows_width() {
    let mut c = InteractionController::new(ControllerSettings {
        resize_mode: ResizeMode::LockAspect,
        ..ControllerSettings::default()
    });
    let mut t = OverlayTransform::reset_with_aspect(100.0, Some(0.5));
    drag(
        &mut c,
        &mut t,
        Affordance::Resize,
        &[(100.0, 50.0), (200.0, 55.0)],
    );
    assert!((t.width - 200.0).abs() < 1e-9);
    assert!((t.height - 100.0).abs() < 1e-9);
}

#[test]
fn body_press_picks_move_or_resize() {
    let mut c = InteractionController::default();
    let t = OverlayTransform::default();
    assert_eq!(
        c.pointer_down(Affordance::Body, PointerInput::mouse(95.0, 96.0), &t),
        ControllerState::Resizing
    );
    c.pointer_up();
    assert_eq!(
        c.pointer_down(Affordance::Body, PointerInput::mouse(40.0, 40.0), &t),
        ControllerState::Moving
    );
    c.pointer_up();
    assert_eq!(
        c.pointer_down(Affordance::Body, PointerInput::mouse(400.0, 40.0), &t),
        ControllerState::Idle
    );
}

#[test]
fn second_press_does_not_interrupt() {
    let mut c = InteractionController::default();
    let mut t = OverlayTransform::default();
    c.pointer_down(Affordance::Move, PointerInput::mouse(0.0, 0.0), &t);
    assert_eq!(
        c.pointer_down(Affordance::Rotate, PointerInput::mouse(0.0, 0.0), &t),
        ControllerState::Moving
    );
    c.pointer_move(PointerInput::mouse(3.0, 4.0), &mut t, &mut NullView);
    assert_eq!((t.x, t.y), (3.0, 4.0));
}

#[test]
fn rotate_applies_incremental_angle() {
    let mut c = InteractionController::default();
    let mut t = OverlayTransform::default(); // center (50, 50)
    c.pointer_down(Affordance::Rotate, PointerInput::mouse(150.0, 50.0), &t);
    assert_eq!(c.state(), ControllerState::Rotating);
    c.pointer_move(PointerInput::mouse(50.0, 150.0), &mut t, &mut NullView);
    assert!((t.rotation_deg - 90.0).abs() < 1e-9);
    c.pointer_move(PointerInput::mouse(150.0, 150.0), &mut t, &mut NullView);
    assert!((t.rotation_deg - 45.0).abs() < 1e-9);
    c.pointer_up();
    assert_eq!((t.x, t.y, t.width, t.height), (0.0, 0.0, 100.0, 100.0));
}

#[test]
fn rotate_crosses_branch_cut_without_jump() {
    let mut c = InteractionController::default();
    let mut t = OverlayTransform::default();
    // start just above the negative x axis, end just below it
    c.pointer_down(Affordance::Rotate, PointerInput::mouse(-50.0, 49.0), &t);
    c.pointer_move(PointerInput::mouse(-50.0, 51.0), &mut t, &mut NullView);
    assert!(t.rotation_deg.abs() < 5.0, "got {}", t.rotation_deg);
    assert!(t.rotation_deg < 0.0);
}

#[test]
fn full_turns_accumulate_across_gestures() {
    let mut c = InteractionController::default();
    let mut t = OverlayTransform::default();
    let circle: Vec<(f64, f64)> = (0..=8)
        .map(|i| {
            let a = f64::from(i) * std::f64::consts::FRAC_PI_4;
            (50.0 + 100.0 * a.cos(), 50.0 + 100.0 * a.sin())
        })
        .collect();
    drag(&mut c, &mut t, Affordance::Rotate, &circle);
    drag(&mut c, &mut t, Affordance::Rotate, &circle);
    assert!((t.rotation_deg - 720.0).abs() < 1e-6);
}

#[test]
fn gestures_are_isolated() {
    let mut c = InteractionController::default();
    let mut t = OverlayTransform::default();

    drag(&mut c, &mut t, Affordance::Rotate, &[(150.0, 50.0), (50.0, 150.0)]);
    let rot = t.rotation_deg;
    drag(&mut c, &mut t, Affordance::Resize, &[(0.0, 0.0), (40.0, -20.0)]);
    assert_eq!(t.rotation_deg, rot);
    assert_eq!((t.width, t.height), (140.0, 80.0));

    let size = (t.width, t.height);
    drag(&mut c, &mut t, Affordance::Rotate, &[(300.0, 40.0), (70.0, 300.0)]);
    assert_eq!((t.width, t.height), size);

    let (r, s) = (t.rotation_deg, (t.width, t.height));
    drag(&mut c, &mut t, Affordance::Move, &[(0.0, 0.0), (-7.0, 9.0)]);
    assert_eq!(t.rotation_deg, r);
    assert_eq!((t.width, t.height), s);
    assert_eq!((t.x, t.y), (-7.0, 9.0));
}

#[test]
fn touch_and_mouse_share_the_machine() {
    let mut c = InteractionController::default();
    let mut t = OverlayTransform::default();
    c.pointer_down(Affordance::Move, PointerInput::touch(1, 10.0, 10.0), &t);
    // a different finger and a mouse are ignored
    assert!(!c.pointer_move(PointerInput::touch(2, 90.0, 90.0), &mut t, &mut NullView));
    assert!(!c.pointer_move(PointerInput::mouse(90.0, 90.0), &mut t, &mut NullView));
    assert!(c.pointer_move(PointerInput::touch(1, 15.0, 30.0), &mut t, &mut NullView));
    assert_eq!((t.x, t.y), (5.0, 20.0));
    assert_eq!(c.pointer_up(), Some(GestureKind::Move));
}

#[test]
fn cursor_hint_matches_hit_zone() {
    let c = InteractionController::default();
    let t = OverlayTransform::default();
    assert_eq!(c.cursor_hint(Point::new(99.0, 99.0), &t), CursorHint::SeResize);
    assert_eq!(c.cursor_hint(Point::new(10.0, 99.0), &t), CursorHint::Move);
    assert_eq!(c.cursor_hint(Point::new(-10.0, 0.0), &t), CursorHint::Default);
}

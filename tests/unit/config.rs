use super::*;

#[test]
fn empty_json_is_the_default() {
    let cfg = EditorConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, EditorConfig::default());
    assert_eq!(cfg.export_file_name, "image.png");
    assert_eq!(cfg.default_overlay_width_px, 100.0);
    assert_eq!(cfg.resize_hit_zone_px, 10.0);
    assert_eq!(cfg.resize_mode, ResizeMode::Free);
    assert_eq!(cfg.overlay_failure, OverlayFailurePolicy::FallbackToBackground);
}

#[test]
fn parses_policies_and_gallery() {
    let cfg = EditorConfig::from_json_str(
        r#"{
            "container": { "max_width": 400, "max_height": 300 },
            "resize_mode": "lock_aspect",
            "overlay_failure": "fail",
            "gallery": [ { "label": "hat", "path": "stickers/hat.png" } ],
            "cheat_code": { "code": "konami", "slot": 0, "alternate_path": "stickers/gold.png" }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.container, ContainerBounds::new(400.0, 300.0));
    assert_eq!(cfg.resize_mode, ResizeMode::LockAspect);
    assert_eq!(cfg.overlay_failure, OverlayFailurePolicy::Fail);
    assert_eq!(cfg.gallery.len(), 1);
    assert_eq!(cfg.controller_settings().resize_mode, ResizeMode::LockAspect);
}

#[test]
fn rejects_unknown_fields_and_bad_values() {
    assert!(matches!(
        EditorConfig::from_json_str(r#"{ "bogus": 1 }"#),
        Err(OverlayerError::Serde(_))
    ));

    for bad in [
        r#"{ "default_overlay_width_px": 0 }"#,
        r#"{ "min_overlay_extent_px": -1 }"#,
        r#"{ "export_file_name": "../x.png" }"#,
        r#"{ "decode_threads": 0 }"#,
        r#"{ "container": { "max_width": 0 } }"#,
        r#"{ "gallery": [ { "label": "x", "path": "/abs.png" } ] }"#,
        r#"{ "gallery": [], "cheat_code": { "code": "x", "slot": 0, "alternate_path": "a.png" } }"#,
    ] {
        let err = EditorConfig::from_json_str(bad).unwrap_err();
        assert!(matches!(err, OverlayerError::Validation(_)), "{bad}: {err}");
    }
}

#[test]
fn load_reports_missing_file() {
    let err = EditorConfig::load(Path::new("target/overlayer-missing-config.json")).unwrap_err();
    assert!(err.to_string().contains("read config"));
}

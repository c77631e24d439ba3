use super::*;

#[test]
fn defaults_match_documented_values() {
    let cfg = VizConfig::default();
    assert_eq!(cfg.figure, FigureSize::new(12.0, 8.0));
    assert_eq!(cfg.dpi, 100);
    assert_eq!(cfg.levels, 20);
    assert_eq!(cfg.interval_ms, 200);
    assert!(!cfg.force_fallback);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.render_style().unwrap().canvas_size(), (1200, 800));
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = VizConfig::from_json_str(
        r##"{ "dpi": 50, "levels": 25, "colormap": ["#000000", "#ffffff"], "snapshot_indices": [0, -1] }"##,
    )
    .unwrap();
    assert_eq!(cfg.dpi, 50);
    assert_eq!(cfg.levels, 25);
    assert_eq!(cfg.interval_ms, 200);
    assert_eq!(cfg.snapshot_indices, Some(vec![0, -1]));
    assert_eq!(cfg.render_style().unwrap().colormap.name(), "custom");
}

#[test]
fn unknown_fields_are_serde_errors() {
    let err = VizConfig::from_json_str(r#"{ "fps": 30 }"#).unwrap_err();
    assert!(matches!(err, VizError::Serde(_)));
}

#[test]
fn validation_rejects_unusable_values() {
    let cfg = VizConfig {
        interval_ms: 0,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = VizConfig {
        levels: 0,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = VizConfig {
        dpi: 0,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = VizConfig {
        snapshot_indices: Some(vec![]),
        ..Default::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = VizConfig {
        colormap: ColormapSpec::Named("nope".into()),
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn json_roundtrip_preserves_config() {
    let cfg = VizConfig {
        title: "Heat".into(),
        force_fallback: true,
        ..Default::default()
    };
    let text = cfg.to_json_string().unwrap();
    assert_eq!(VizConfig::from_json_str(&text).unwrap(), cfg);
}

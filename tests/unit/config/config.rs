use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg = EngineConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, EngineConfig::default());
    assert_eq!(cfg.playback.step_delay(), Duration::from_millis(500));
    assert_eq!(cfg.playback.repeat_delay(), Duration::from_millis(800));
    assert_eq!(cfg.motion.min_size, 10.0);
}

#[test]
fn partial_sections_keep_other_defaults() {
    let cfg = EngineConfig::from_json_str(
        r#"{"playback":{"step_delay_ms":100},"viewport":{"width":300}}"#,
    )
    .unwrap();
    assert_eq!(cfg.playback.step_delay_ms, 100);
    assert_eq!(cfg.playback.repeat_delay_ms, 800);
    assert_eq!(cfg.viewport.width, 300.0);
    assert_eq!(cfg.viewport.margin_x, 100.0);
}

#[test]
fn inverted_random_range_is_rejected() {
    let err = EngineConfig::from_json_str(r#"{"motion":{"random_min":5,"random_max":5}}"#)
        .unwrap_err();
    assert!(matches!(err, FlowError::Config(_)));
}

#[test]
fn zero_viewport_is_rejected() {
    let err = EngineConfig::from_json_str(r#"{"viewport":{"height":0}}"#).unwrap_err();
    assert!(err.to_string().contains("viewport"));
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        EngineConfig::from_json_str("{").unwrap_err(),
        FlowError::Serde(_)
    ));
}

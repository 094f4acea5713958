use qf_core::errors::{ErrorInfo, QfError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("points", 100)
        .with_context("window", 10)
}

#[test]
fn config_error_surface() {
    let err = QfError::Config(sample_info("C001", "steps must be positive"));
    assert_eq!(err.code(), "C001");
    assert!(err.info().context.contains_key("points"));
}

#[test]
fn diagnostics_error_surface() {
    let err = QfError::Diagnostics(sample_info("D001", "window too wide").with_hint("shrink it"));
    assert_eq!(err.info().code, "D001");
    let rendered = err.to_string();
    assert!(rendered.starts_with("diagnostics error: window too wide (code: D001)"));
    assert!(rendered.contains("points=100"));
    assert!(rendered.ends_with("hint: shrink it"));
}

#[test]
fn network_error_surface() {
    let err = QfError::Network(sample_info("N001", "matrix not square"));
    assert_eq!(err.info().code, "N001");
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = QfError::Grid(ErrorInfo::new("too-few-points", "grid too small"));
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["family"], "Grid");
    assert_eq!(json["detail"]["code"], "too-few-points");
    let back: QfError = serde_json::from_value(json).unwrap();
    assert_eq!(back, err);
}

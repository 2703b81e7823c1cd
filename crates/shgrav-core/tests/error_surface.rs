use std::path::Path;

use shgrav_core::errors::{ErrorInfo, GravError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("model", "egm2008")
        .with_context("line", "42")
}

#[test]
fn config_error_surface() {
    let err = GravError::Config(sample_info("unknown-model", "unknown model identifier"));
    assert_eq!(err.code(), "unknown-model");
    assert!(err.info().context.contains_key("model"));
}

#[test]
fn parse_error_surface() {
    let err = GravError::Parse(sample_info("icgem-coefficient", "bad float"));
    assert_eq!(err.info().code, "icgem-coefficient");
    assert_eq!(err.info().context.get("line").map(String::as_str), Some("42"));
}

#[test]
fn io_helper_records_path() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err = GravError::io("source-read", Path::new("/tmp/model.gfc"), io);
    assert!(matches!(&err, GravError::Io(info) if info.code == "source-read"));
    assert_eq!(
        err.info().context.get("path").map(String::as_str),
        Some("/tmp/model.gfc")
    );
}

#[test]
fn context_is_added_across_families() {
    let err = GravError::Assembly(ErrorInfo::new("empty-table", "no entries"))
        .with_context("model", "gmm3");
    assert!(matches!(&err, GravError::Assembly(_)));
    assert_eq!(err.info().context["model"], "gmm3");
}

#[test]
fn display_includes_context_and_hint() {
    let err = GravError::Config(
        ErrorInfo::new("unknown-model", "unknown model identifier foo")
            .with_context("model", "foo")
            .with_hint("known models: egm2008"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("configuration error: unknown model identifier foo"));
    assert!(rendered.contains("model=foo"));
    assert!(rendered.contains("hint: known models: egm2008"));
}

#[test]
fn display_leads_with_source_position() {
    let err = GravError::Parse(
        ErrorInfo::new("icgem-coefficient", "invalid float literal")
            .with_context("path", "EGM2008.gfc")
            .with_context("line", "23")
            .with_context("field", "1.0Q-05"),
    );
    assert_eq!(
        err.to_string(),
        "parse error: invalid float literal [icgem-coefficient] at EGM2008.gfc:23 (field=1.0Q-05)"
    );
}

#[test]
fn serde_tags_family() {
    let err = GravError::Layout(ErrorInfo::new("shape-mismatch", "dims differ"));
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["family"], "Layout");
    assert_eq!(json["detail"]["code"], "shape-mismatch");
    let back: GravError = serde_json::from_value(json).unwrap();
    assert_eq!(back, err);
}

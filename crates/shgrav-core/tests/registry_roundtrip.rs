use std::fs;

use shgrav_core::{GravError, ModelRegistry, ModelSpec, SourceFormat};
use tempfile::tempdir;

const REGISTRY: &str = r#"
[models.egm2008]
format = "icgem"
start_line = 22
filename = "EGM2008.gfc"
gm = 3.986004415e14
radius = 6378136.3

[models.gmm3]
format = "pgda"
start_line = 2
filename = "gmm3_120_sha.tab"
gm = 4.282837581575610e13
radius = 3396000.0
description = "Goddard Mars Model 3"
"#;

#[test]
fn registry_parses_and_looks_up() {
    let registry = ModelRegistry::from_toml_str(REGISTRY).expect("registry");
    assert_eq!(registry.len(), 2);
    let egm = registry.lookup("egm2008").expect("egm2008");
    assert_eq!(egm.format, SourceFormat::Icgem);
    assert_eq!(egm.start_line, 22);
    assert_eq!(egm.radius, 6378136.3);
    let mars = registry.lookup("gmm3").expect("gmm3");
    assert_eq!(mars.format, SourceFormat::Pgda);
    assert_eq!(mars.description.as_deref(), Some("Goddard Mars Model 3"));
}

#[test]
fn unknown_model_is_a_config_error() {
    let registry = ModelRegistry::from_toml_str(REGISTRY).expect("registry");
    let err = registry.lookup("jgl165p1").unwrap_err();
    match err {
        GravError::Config(info) => {
            assert_eq!(info.code, "unknown-model");
            assert_eq!(info.context["model"], "jgl165p1");
            assert!(info.hint.unwrap().contains("egm2008"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn missing_required_field_is_rejected() {
    let text = r#"
[models.broken]
format = "icgem"
start_line = 5
filename = "broken.gfc"
radius = 1.0
"#;
    let err = ModelRegistry::from_toml_str(text).unwrap_err();
    assert!(matches!(err, GravError::Config(ref info) if info.code == "registry-parse"));
}

#[test]
fn invalid_constants_are_rejected() {
    let spec = ModelSpec {
        format: SourceFormat::Pgda,
        start_line: 1,
        filename: "x.tab".into(),
        gm: -1.0,
        radius: 1.0,
        description: None,
    };
    let err = spec.validate("x").unwrap_err();
    assert_eq!(err.code(), "invalid-field");
    assert_eq!(err.info().context["field"], "gm");

    let zero_start = ModelSpec {
        start_line: 0,
        gm: 1.0,
        ..spec
    };
    assert_eq!(zero_start.validate("x").unwrap_err().code(), "invalid-field");
}

#[test]
fn registry_loads_from_disk_and_reserializes() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("models.toml");
    fs::write(&path, REGISTRY).expect("write registry");
    let registry = ModelRegistry::load(&path).expect("load");
    let text = toml::to_string(&registry).expect("serialize");
    let reparsed = ModelRegistry::from_toml_str(&text).expect("reparse");
    assert_eq!(registry, reparsed);

    let missing = ModelRegistry::load(&dir.path().join("absent.toml")).unwrap_err();
    assert_eq!(missing.code(), "registry-read");
}

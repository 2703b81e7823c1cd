use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::tempdir;

const ICGEM: &str = "\
modelname toy
end_of_head
gfc 2 0 -0.484165D-03 0.0D+00
gfc 2 1 -0.206616D-09 0.138441D-08
";

fn shgrav(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shgrav"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("spawn shgrav")
}

fn workspace_registry() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../configs/models.toml")
}

fn write_registry(dir: &Path) -> PathBuf {
    let path = dir.join("models.toml");
    fs::write(
        &path,
        "[models.toy]\nformat = \"icgem\"\nstart_line = 3\nfilename = \"toy.gfc\"\ngm = 1.0e12\nradius = 1.0e6\n",
    )
    .unwrap();
    fs::write(dir.join("toy.gfc"), ICGEM).unwrap();
    path
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn shipped_registry_lists_models() {
    let registry = workspace_registry();
    let output = shgrav(&["models", "--registry", path_arg(&registry)]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("egm2008"));
    assert!(stdout.contains("gmm3"));
}

#[test]
fn convert_inspect_verify_and_bundle() {
    let dir = tempdir().unwrap();
    let registry = write_registry(dir.path());
    let out = dir.path().join("out");

    let output = shgrav(&[
        "convert",
        "--registry",
        path_arg(&registry),
        "--model",
        "toy",
        "--source",
        path_arg(dir.path()),
        "--out",
        path_arg(&out),
        "--json",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["l_max"], 2);
    assert_eq!(report["m_max"], 1);

    let artifact = out.join("toy.bin");
    let output = shgrav(&["inspect", path_arg(&artifact), "--json"]);
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["c20"], -0.484165e-3);

    let output = shgrav(&[
        "verify",
        "--registry",
        path_arg(&registry),
        "--model",
        "toy",
        "--source",
        path_arg(dir.path()),
        "--artifact",
        path_arg(&artifact),
    ]);
    assert!(output.status.success());

    let bundle = dir.path().join("toy.zip");
    let output = shgrav(&["bundle", "--out", path_arg(&bundle), path_arg(&out)]);
    assert!(output.status.success());
    let output = shgrav(&["bundle", "--verify", path_arg(&bundle)]);
    assert!(output.status.success());
}

#[test]
fn unknown_model_exits_non_zero() {
    let dir = tempdir().unwrap();
    let registry = write_registry(dir.path());
    let output = shgrav(&[
        "convert",
        "--registry",
        path_arg(&registry),
        "--model",
        "missing",
        "--source",
        path_arg(dir.path()),
        "--out",
        path_arg(dir.path()),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown-model"));
}

#[test]
fn failures_are_logged_at_the_command_boundary() {
    let dir = tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_shgrav"))
        .args(["inspect", path_arg(&dir.path().join("absent.bin"))])
        .env("RUST_LOG", "shgrav=error")
        .output()
        .expect("spawn shgrav");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("command failed"), "{stderr}");
    assert!(stderr.contains("artifact-open"), "{stderr}");
}

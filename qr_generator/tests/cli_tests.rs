//! CLI integration tests.
//!
//! Runs the built `generate_qrcode` binary end to end.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use image::{ImageFormat, Rgba};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("qr_generator_cli_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_generate_qrcode"))
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run generate_qrcode")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_default_png() {
    let dir = scratch_dir("default");
    let out = dir.join("out.png");
    let output = run(&["hello world", "-o", path_arg(&out)]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let bytes = fs::read(&out).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    // 余白5モジュール x 10px
    assert_eq!(img.width(), img.height());
    assert_eq!((img.width() / 10 - 10 - 17) % 4, 0);
    assert_eq!(*img.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    assert_eq!(*img.get_pixel(50, 50), Rgba([0, 0, 0, 255]));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_custom_colors_and_sizes() {
    let dir = scratch_dir("colors");
    let out = dir.join("out.png");
    let output = run(&[
        "hello", "-b", "4", "-p", "20", "-fc", "red", "-bc", "#000000", "-o", path_arg(&out),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let img = image::open(&out).unwrap().to_rgba8();
    assert_eq!(img.width() % 20, 0);
    assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    assert_eq!(*img.get_pixel(80, 80), Rgba([255, 0, 0, 255]));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_data_is_usage_error() {
    let dir = scratch_dir("nodata");
    let out = dir.join("out.png");
    let output = run(&["-o", path_arg(&out)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
    assert!(!out.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_output_is_usage_error() {
    let output = run(&["hello"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_help_exits_zero() {
    let output = run(&["-h"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--error-correction"));
    assert!(stdout.contains("--output-file"));
}

#[test]
fn test_fixed_version() {
    let dir = scratch_dir("version");
    let out = dir.join("out.png");
    let output = run(&["x", "-v", "1", "-e", "25", "-o", path_arg(&out)]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let img = image::open(&out).unwrap();
    // バージョン1は21モジュール、余白5
    assert_eq!(img.width(), (21 + 10) * 10);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_small_border_is_rejected() {
    let dir = scratch_dir("border");
    let out = dir.join("out.png");
    let output = run(&["hello", "-b", "3", "-o", path_arg(&out)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_version_out_of_range_is_rejected() {
    let dir = scratch_dir("badversion");
    let out = dir.join("out.png");
    for version in ["0", "41"] {
        let output = run(&["hello", "-v", version, "-o", path_arg(&out)]);
        assert_eq!(output.status.code(), Some(1), "version {}", version);
    }
    assert!(!out.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_data_too_long_leaves_existing_file() {
    let dir = scratch_dir("toolong");
    let out = dir.join("out.png");
    fs::write(&out, b"previous").unwrap();

    let data = "a".repeat(200);
    let output = run(&[data.as_str(), "-v", "1", "-o", path_arg(&out)]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(fs::read(&out).unwrap(), b"previous");
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_unknown_factory_fails() {
    let dir = scratch_dir("factory");
    let out = dir.join("out.gif");
    let output = run(&["hello", "-f", "gif", "-o", path_arg(&out)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_unwritable_destination_fails() {
    let dir = scratch_dir("io");
    let out = dir.join("missing").join("out.png");
    let output = run(&["hello", "-o", path_arg(&out)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_output_is_deterministic() {
    let dir = scratch_dir("determinism");
    let first = dir.join("first.png");
    let second = dir.join("second.png");
    assert!(run(&["same input", "-o", path_arg(&first)]).status.success());
    assert!(run(&["same input", "-o", path_arg(&second)]).status.success());
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_svg_factory() {
    let dir = scratch_dir("svg");
    let out = dir.join("out.svg");
    let output = run(&["hello", "-f", "svgpath", "-fc", "#336699", "-o", path_arg(&out)]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("<svg"));
    assert!(text.contains("fill=\"#336699\""));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_debug_logs_to_stderr() {
    let dir = scratch_dir("debug");
    let out = dir.join("out.png");
    let output = run(&["hello", "-d", "-o", path_arg(&out)]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("DEBUG"));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_quiet_without_debug() {
    let dir = scratch_dir("quiet");
    let out = dir.join("out.png");
    let output = run(&["hello", "-o", path_arg(&out)]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_error_correction_out_of_range_is_rejected() {
    let dir = scratch_dir("ec_range");
    let out = dir.join("out.png");
    let output = run(&["hello", "-e", "101", "-o", path_arg(&out)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_error_correction_above_maximum_warns() {
    let dir = scratch_dir("ec_warn");
    let out = dir.join("out.png");
    let output = run(&["hello", "-e", "50", "-d", "-o", path_arg(&out)]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stderr).contains("WARN"));
    assert!(out.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_oversized_svg_fails_cleanly() {
    let dir = scratch_dir("svg_oversized");
    let out = dir.join("out.svg");
    let output = run(&["x", "-f", "svg", "-b", "500000000", "-o", path_arg(&out)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
    fs::remove_dir_all(&dir).unwrap();
}

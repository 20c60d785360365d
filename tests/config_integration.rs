//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::fs;
use std::path::PathBuf;

use scene3d::config::AppConfig;
use serial_test::serial;

/// Fresh directory under the target tmp dir for one test
fn config_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("S3D_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("S3D_WINDOW__TITLE");
    assert_eq!(config.window.title, "Test From Env");
}

#[test]
#[serial]
fn test_default_file_matches_builtin_defaults() {
    let config = AppConfig::load_from(concat!(env!("CARGO_MANIFEST_DIR"), "/config")).unwrap();
    let defaults = AppConfig::default();
    assert_eq!(config.window.title, defaults.window.title);
    assert_eq!(config.camera.to_settings(), defaults.camera.to_settings());
    assert_eq!(config.game.to_settings(), defaults.game.to_settings());
    assert_eq!(config.input.to_free_fly(), defaults.input.to_free_fly());
}

#[test]
#[serial]
fn test_user_file_overrides_default_file() {
    let dir = config_dir("user_overrides");
    fs::write(dir.join("default.toml"), "[game]\nbullet_speed = 12.0\nenemy_max_speed = 9.0\n").unwrap();
    fs::write(dir.join("user.toml"), "[game]\nbullet_speed = 20.0\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.game.bullet_speed, 20.0);
    assert_eq!(config.game.enemy_max_speed, 9.0);
}

#[test]
#[serial]
fn test_env_overrides_files() {
    let dir = config_dir("env_overrides");
    fs::write(dir.join("default.toml"), "[physics]\nskip_same_group_pairs = false\n").unwrap();

    std::env::set_var("S3D_PHYSICS__SKIP_SAME_GROUP_PAIRS", "true");
    let config = AppConfig::load_from(&dir);
    std::env::remove_var("S3D_PHYSICS__SKIP_SAME_GROUP_PAIRS");

    assert!(config.unwrap().physics.skip_same_group_pairs);
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let dir = config_dir("empty");
    let config = AppConfig::load_from(dir.join("does_not_exist")).unwrap();
    assert_eq!(config.window.width, AppConfig::default().window.width);
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    let dir = config_dir("malformed");
    fs::write(dir.join("default.toml"), "[window]\nwidth = \"wide\"\n").unwrap();
    assert!(AppConfig::load_from(&dir).is_err());
}

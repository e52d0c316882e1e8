// ABOUTME: Integration tests for the YAML config store on a real filesystem
// ABOUTME: Covers path precedence, round trips, permissions and idempotent deletion

use backlog_cli::config::{Config, ConfigStore};
use serial_test::serial;
use std::env;
use tempfile::TempDir;

fn sample() -> Config {
    Config {
        space_url: "https://myteam.backlog.com".to_string(),
        api_key: "secret-key".to_string(),
        default_project: "PROJ".to_string(),
    }
}

struct EnvGuard {
    saved: Vec<(&'static str, Option<std::ffi::OsString>)>,
}

impl EnvGuard {
    fn set(vars: &[(&'static str, Option<&str>)]) -> Self {
        let saved = vars.iter().map(|(name, _)| (*name, env::var_os(name))).collect();
        for (name, value) in vars {
            match value {
                Some(value) => env::set_var(name, value),
                None => env::remove_var(name),
            }
        }
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in &self.saved {
            match value {
                Some(value) => env::set_var(name, value),
                None => env::remove_var(name),
            }
        }
    }
}

#[test]
#[serial]
fn test_explicit_path_wins() {
    let dir = TempDir::new().unwrap();
    let explicit = dir.path().join("custom.yaml");
    let _env = EnvGuard::set(&[
        ("BL_CONFIG", explicit.to_str()),
        ("XDG_CONFIG_HOME", dir.path().join("xdg").to_str()),
    ]);

    assert_eq!(ConfigStore::default_path().unwrap(), explicit);
}

#[test]
#[serial]
fn test_xdg_config_home() {
    let dir = TempDir::new().unwrap();
    let _env = EnvGuard::set(&[
        ("BL_CONFIG", None),
        ("XDG_CONFIG_HOME", dir.path().to_str()),
    ]);

    assert_eq!(
        ConfigStore::default_path().unwrap(),
        dir.path().join("bl").join("config.yaml")
    );
}

#[test]
#[serial]
fn test_home_fallback() {
    let _env = EnvGuard::set(&[("BL_CONFIG", None), ("XDG_CONFIG_HOME", None)]);

    let path = ConfigStore::default_path().unwrap();
    assert!(path.ends_with(".config/bl/config.yaml"));
}

#[test]
fn test_missing_file_loads_empty_record() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::new(dir.path().join("absent.yaml"));

    let config = store.load().unwrap();
    assert_eq!(config, Config::default());
    assert!(!config.is_authenticated());
}

#[test]
fn test_save_creates_directories_and_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::new(dir.path().join("nested").join("bl").join("config.yaml"));

    store.save(&sample()).unwrap();
    assert_eq!(store.load().unwrap(), sample());
}

#[test]
fn test_save_overwrites_whole_record() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::new(dir.path().join("config.yaml"));

    store.save(&sample()).unwrap();
    store
        .save(&Config {
            api_key: "other".to_string(),
            ..Default::default()
        })
        .unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.api_key, "other");
    assert_eq!(loaded.default_project, "");
}

#[test]
fn test_empty_file_loads_empty_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "\n").unwrap();

    assert_eq!(ConfigStore::new(path).load().unwrap(), Config::default());
}

#[test]
fn test_malformed_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "space_url: [unclosed").unwrap();

    let err = ConfigStore::new(&path).load().unwrap_err();
    assert!(err.to_string().contains("config.yaml"));
}

#[cfg(unix)]
#[test]
fn test_saved_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let store = ConfigStore::new(dir.path().join("config.yaml"));
    store.save(&sample()).unwrap();

    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_delete_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::new(dir.path().join("config.yaml"));
    store.save(&sample()).unwrap();

    store.delete().unwrap();
    store.delete().unwrap();
    assert!(!store.path().exists());
}

mod support;

use std::fs;

use fastfind_core::config::{self, Config, ConfigError};
use fastfind_core::keys::KeyEvent;
use support::unique_temp_dir;

#[test]
fn accepts_default_config() {
    let cfg = Config::default();
    assert_eq!(cfg.max_results, 18);
    assert_eq!(cfg.fuzzy_max_depth, 4);
    assert_eq!(cfg.fuzzy_trigger, "Ctrl+F");
    assert!(cfg.package_extensions.iter().any(|ext| ext == "app"));
    assert!(cfg.config_path.to_string_lossy().contains("fastfind"));
    assert!(config::validate(&cfg).is_ok());
}

#[test]
fn rejects_out_of_range_values() {
    let cfg = Config {
        max_results: 0,
        ..Default::default()
    };
    assert!(config::validate(&cfg).is_err());

    let cfg = Config {
        fuzzy_max_depth: 64,
        ..Default::default()
    };
    assert!(config::validate(&cfg).is_err());

    let cfg = Config {
        fuzzy_trigger: "Hyper+F".to_string(),
        ..Default::default()
    };
    assert!(config::validate(&cfg).is_err());
}

#[test]
fn rejects_trigger_that_would_type_text() {
    for trigger in ["f", "Shift+F", "Space"] {
        let cfg = Config {
            fuzzy_trigger: trigger.to_string(),
            ..Default::default()
        };
        assert!(config::validate(&cfg).is_err(), "{trigger} should be rejected");
    }

    for trigger in ["Alt+F", "Meta+Space", "Ctrl+Space"] {
        let cfg = Config {
            fuzzy_trigger: trigger.to_string(),
            ..Default::default()
        };
        assert!(config::validate(&cfg).is_ok(), "{trigger} should be accepted");
    }
}

#[test]
fn missing_file_loads_defaults() {
    let path = unique_temp_dir("cfg-missing").join("config.toml");
    let cfg = config::load(Some(&path)).unwrap();
    assert_eq!(cfg.max_results, 18);
    assert_eq!(cfg.config_path, path);
}

#[test]
fn partial_file_keeps_defaults_for_other_keys() {
    let dir = unique_temp_dir("cfg-partial");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    fs::write(&path, "max_results = 40\nfuzzy_trigger = \"Alt+Space\"\n").unwrap();

    let cfg = config::load(Some(&path)).unwrap();
    assert_eq!(cfg.max_results, 40);
    assert_eq!(cfg.fuzzy_max_depth, 4);
    assert_eq!(cfg.retrieval_limits().max_results, 40);
    assert_eq!(
        cfg.fuzzy_trigger_key().unwrap(),
        KeyEvent::parse("alt+space").unwrap()
    );

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn invalid_file_is_rejected() {
    let dir = unique_temp_dir("cfg-invalid");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");

    fs::write(&path, "max_results = 999\n").unwrap();
    assert!(matches!(config::load(Some(&path)), Err(ConfigError::Invalid(_))));

    fs::write(&path, "max_results = [\n").unwrap();
    assert!(matches!(config::load(Some(&path)), Err(ConfigError::Parse(_))));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn save_then_load_preserves_settings() {
    let dir = unique_temp_dir("cfg-save");
    let cfg = Config {
        max_results: 25,
        log_level: "debug".to_string(),
        config_path: dir.join("nested").join("config.toml"),
        ..Default::default()
    };
    config::save(&cfg).unwrap();

    let loaded = config::load(Some(&cfg.config_path)).unwrap();
    assert_eq!(loaded, cfg);

    fs::remove_dir_all(&dir).unwrap();
}

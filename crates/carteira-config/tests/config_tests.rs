use std::path::PathBuf;

use carteira_config::{Config, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert!(!cfg.currency.is_empty());
    assert!(!cfg.locale.is_empty());
    assert!(cfg.default_user.is_none());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = Config::default();
    cfg.currency = "USD".to_string();
    cfg.locale = "en-US".to_string();
    cfg.default_user = Some("consultor-01".to_string());

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.currency, "USD");
    assert_eq!(loaded.locale, "en-US");
    assert_eq!(loaded.default_user.as_deref(), Some("consultor-01"));
}

#[test]
fn load_without_file_falls_back_to_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let loaded = manager.load().expect("load config");
    assert_eq!(loaded.currency, Config::default().currency);
    assert!(manager.config_path().starts_with(dir.path()));
}

#[test]
fn data_root_prefers_the_configured_path() {
    let mut cfg = Config::default();
    cfg.default_data_root = Some(PathBuf::from("/srv/carteira"));
    assert_eq!(cfg.resolve_data_root(), PathBuf::from("/srv/carteira"));

    cfg.default_data_root = None;
    assert!(cfg.resolve_data_root().ends_with("Carteira"));
}

use deptrail_core::config::{dirs_path, GlobalConfig, DEFAULT_FRAMEWORK};
use tempfile::TempDir;

#[test]
fn test_global_config_default_has_no_search_paths() {
    let config = GlobalConfig::default();
    assert!(config.resolve.search_paths.is_empty());
}

#[test]
fn test_global_config_default_framework_fallback() {
    let config = GlobalConfig::default();
    assert_eq!(config.default_framework(), DEFAULT_FRAMEWORK);
}

#[test]
fn test_global_config_empty_toml() {
    let config: GlobalConfig = toml::from_str("").unwrap();
    assert!(config.resolve.default_framework.is_none());
}

#[test]
fn test_dirs_path_contains_deptrail() {
    let path = dirs_path();
    assert!(path.ends_with(".deptrail"));
}

#[test]
fn test_global_config_parse_from_toml() {
    let toml = r#"
[resolve]
search-paths = ["/src/projects", "/src/shared"]
default-framework = ".NETFramework,Version=v4.5"
"#;
    let config: GlobalConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.resolve.search_paths.len(), 2);
    assert_eq!(config.default_framework(), ".NETFramework,Version=v4.5");
}

#[test]
fn test_global_config_load_from_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "[resolve]\nsearch-paths = [\"libs\"]\n").unwrap();

    let config = GlobalConfig::load_from(&path).unwrap();
    assert_eq!(config.resolve.search_paths, vec![std::path::PathBuf::from("libs")]);
}

#[test]
fn test_global_config_load_from_invalid_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "[resolve\n").unwrap();

    let err = GlobalConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Config error"), "got: {err}");
}

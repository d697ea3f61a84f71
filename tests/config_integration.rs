use parley::config::AppConfig;
use serial_test::serial;
use std::env;
use std::fs;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("PARLEY_SERVER__PORT");
        env::remove_var("PARLEY_SERVER__HOST");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("HOST");
    }
}

// Fixed args so the loader never sees the test runner's own flags.
fn load_defaults() -> Result<AppConfig, config::ConfigError> {
    AppConfig::load_from_args(["parley"])
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = load_defaults().expect("Failed to load default config");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(
        config.cors.allowed_origins,
        vec![
            "http://localhost:5173".to_string(),
            "http://127.0.0.1:5173".to_string()
        ]
    );
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("PARLEY_SERVER__PORT", "9090");
    }

    let config = load_defaults().expect("Failed to load config");
    assert_eq!(config.server.port, 9090);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_override() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["parley", "--port", "8181", "--host", "127.0.0.1"])
        .expect("Failed to load config");
    assert_eq!(config.server.port, 8181);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.bind_address(), "127.0.0.1:8181");
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let config_content = r"
server:
  port: 7070
cors:
  allowed_origins:
    - http://example.test
    ";

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = dir.path().join("parley_config.yaml");
    fs::write(&file_path, config_content).expect("Failed to write temp config");

    let config = AppConfig::load_from_args([
        "parley",
        "--config",
        file_path.to_str().expect("non-utf8 temp path"),
    ])
    .expect("Failed to load config from file");

    assert_eq!(config.server.port, 7070);
    // Host not in the file keeps its default.
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(
        config.cors.allowed_origins,
        vec!["http://example.test".to_string()]
    );
}

use agri_chat::config::AppConfig;
use serial_test::serial;
use std::env;
use std::fs;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("AGRI_SERVER__PORT");
        env::remove_var("AGRI_PERSISTENCE__DATABASE_URL");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("DATABASE_URL");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["agri-chat"]).expect("defaults should load");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.static_dir, "static");
    assert!(config.resilience.rate_limit_enabled);
    assert_eq!(config.persistence.database_url, "sqlite://agri_data.db");
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("AGRI_SERVER__PORT", "9090");
        env::set_var("AGRI_PERSISTENCE__DATABASE_URL", "sqlite::memory:");
    }

    let config = AppConfig::load_from_args(["agri-chat"]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.persistence.database_url, "sqlite::memory:");

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_flag_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("AGRI_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args(["agri-chat", "--port", "4040", "--rate-limit-enabled", "false"])
        .expect("Failed to load config");
    assert_eq!(config.server.port, 4040);
    assert!(!config.resilience.rate_limit_enabled);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("agri.yaml");
    fs::write(
        &file_path,
        r#"
server:
  port: 7070
resilience:
  burst_size: 2.5
"#,
    )
    .expect("Failed to write temp config");

    unsafe {
        env::set_var("CONFIG_FILE", &file_path);
    }

    let config = AppConfig::load_from_args(["agri-chat"]).expect("Failed to load config from file");
    assert_eq!(config.server.port, 7070);
    assert!((config.resilience.burst_size - 2.5).abs() < f32::EPSILON);
    assert_eq!(config.server.host, "0.0.0.0");

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_config_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args(["agri-chat", "--config", "/nonexistent/agri.yaml"]);
    assert!(result.is_err());
}

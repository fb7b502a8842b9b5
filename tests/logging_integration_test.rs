//! Integration tests for logging functionality

use registry_audit::config::LoggingConfig;
use registry_audit::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert!(!config.local_path.is_empty());
}

#[test]
fn test_console_only_config() {
    let config = LoggingConfig::console_only();
    assert!(!config.local_enabled);
}

#[test]
fn test_invalid_level_rejected() {
    assert!(init_logging("verbose", &LoggingConfig::console_only()).is_err());
}

// Only one test in this binary may install the global subscriber
#[test]
fn test_init_creates_log_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };
    assert!(!log_path.exists());

    let guard = init_logging("debug", &config).unwrap();
    tracing::info!("logging integration test");
    assert!(log_path.is_dir());

    // A second subscriber cannot be installed
    assert!(init_logging("info", &LoggingConfig::console_only()).is_err());
    drop(guard);
}

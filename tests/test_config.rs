use std::time::Duration;

use ferry::config::{Config, DEFAULT_BUFFER_SIZE, DEFAULT_LISTEN_ADDR};

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.server.listen_addr, DEFAULT_LISTEN_ADDR);
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8088");
    assert_eq!(cfg.server.buffer_size, DEFAULT_BUFFER_SIZE);
    assert_eq!(cfg.server.buffer_size, 256);
    assert_eq!(cfg.server.read_timeout(), None);
    assert!(!cfg.server.concurrent);
    assert_eq!(cfg.logging.max_level().unwrap(), tracing::Level::INFO);
}

#[test]
fn test_config_env_overrides() {
    // Both variables are only touched here, so parallel tests cannot race on them.
    let path = std::env::temp_dir().join(format!("ferry-config-{}.yaml", std::process::id()));
    std::fs::write(&path, "server:\n  buffer_size: 64\n  listen_addr: 127.0.0.1:9000\n").unwrap();

    unsafe {
        std::env::remove_var("LISTEN");
        std::env::set_var("FERRY_CONFIG", &path);
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:9000");
    assert_eq!(cfg.server.buffer_size, 64);

    unsafe {
        std::env::set_var("LISTEN", "0.0.0.0:3000");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.server.buffer_size, 64);

    unsafe {
        std::env::remove_var("FERRY_CONFIG");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.server.buffer_size, DEFAULT_BUFFER_SIZE);

    unsafe {
        std::env::remove_var("LISTEN");
        std::env::set_var("FERRY_CONFIG", "/nonexistent/ferry.yaml");
    }
    assert!(Config::load().is_err());

    unsafe {
        std::env::remove_var("FERRY_CONFIG");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, DEFAULT_LISTEN_ADDR);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_config_from_yaml_full() {
    let cfg = Config::from_yaml(
        r#"
server:
  listen_addr: "0.0.0.0:5000"
  buffer_size: 1024
  read_timeout_ms: 250
  concurrent: true
logging:
  level: debug
"#,
    )
    .unwrap();

    assert_eq!(cfg.server.listen_addr, "0.0.0.0:5000");
    assert_eq!(cfg.server.buffer_size, 1024);
    assert_eq!(cfg.server.read_timeout(), Some(Duration::from_millis(250)));
    assert!(cfg.server.concurrent);
    assert_eq!(cfg.logging.max_level().unwrap(), tracing::Level::DEBUG);
}

#[test]
fn test_config_from_yaml_partial_keeps_defaults() {
    let cfg = Config::from_yaml("server:\n  concurrent: true\n").unwrap();

    assert!(cfg.server.concurrent);
    assert_eq!(cfg.server.listen_addr, DEFAULT_LISTEN_ADDR);
    assert_eq!(cfg.server.buffer_size, DEFAULT_BUFFER_SIZE);
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn test_config_from_empty_yaml() {
    let cfg = Config::from_yaml("").unwrap();

    assert_eq!(cfg.server.listen_addr, DEFAULT_LISTEN_ADDR);
}

#[test]
fn test_config_rejects_zero_buffer() {
    assert!(Config::from_yaml("server:\n  buffer_size: 0\n").is_err());
}

#[test]
fn test_config_rejects_zero_timeout() {
    assert!(Config::from_yaml("server:\n  read_timeout_ms: 0\n").is_err());
}

#[test]
fn test_config_rejects_unknown_log_level() {
    assert!(Config::from_yaml("logging:\n  level: loud\n").is_err());
}

#[test]
fn test_config_rejects_malformed_yaml() {
    assert!(Config::from_yaml("server: [not, a, map").is_err());
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1.server.listen_addr, cfg2.server.listen_addr);
}

use std::io::Write;

use iv_domain::config::{Config, ConfigSeverity};

#[test]
fn default_host_is_localhost() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3210);
}

#[test]
fn empty_file_is_a_valid_config() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.context.max_recent_exchanges, 6);
    assert_eq!(config.context.max_summaries, 10);
    assert_eq!(config.context.max_key_points, 20);
    assert_eq!(config.context.summary_excerpt_chars, 150);
    assert_eq!(config.context.digest_summaries, 3);
    assert_eq!(config.context.digest_key_points, 5);
    assert!((config.interview.evaluation_temperature - 0.7).abs() < f32::EPSILON);
    assert!((config.interview.report_temperature - 0.5).abs() < f32::EPSILON);
    assert!((config.interview.question_temperature - 0.8).abs() < f32::EPSILON);
    assert_eq!(config.interview.max_output_tokens, 1024);
}

#[test]
fn default_cors_allows_only_localhost() {
    let config = Config::default();
    assert!(config.server.cors.allowed_origins.contains(&"http://localhost:*".to_string()));
    assert!(config.server.cors.allowed_origins.contains(&"http://127.0.0.1:*".to_string()));
}

#[test]
fn cors_wildcard_is_a_warning() {
    let toml_str = r#"
[server.cors]
allowed_origins = ["*"]
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    let cors = issues
        .iter()
        .find(|e| e.field == "server.cors.allowed_origins")
        .expect("wildcard should be flagged");
    assert_eq!(cors.severity, ConfigSeverity::Warning);
}

#[test]
fn context_overrides_parse() {
    let toml_str = r#"
[context]
max_recent_exchanges = 8
max_key_points = 40
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.context.max_recent_exchanges, 8);
    assert_eq!(config.context.max_key_points, 40);
    assert_eq!(config.context.max_summaries, 10);
}

#[test]
fn config_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[server]
port = 9000

[interview]
evaluation_temperature = 0.2
"#
    )
    .unwrap();
    let raw = std::fs::read_to_string(file.path()).unwrap();
    let config: Config = toml::from_str(&raw).unwrap();
    assert_eq!(config.server.port, 9000);
    assert!((config.interview.evaluation_temperature - 0.2).abs() < f32::EPSILON);
    assert!(config.validate().iter().all(|e| e.severity == ConfigSeverity::Warning));
}

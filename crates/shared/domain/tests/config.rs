use serde_json::json;
use std::path::PathBuf;
use waitlist_domain::config::{
    ApiConfig, DatabaseConfig, ExportConfig, LoggingConfig, ServerConfig,
};

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 3000);
    assert!(server.ssl.is_none());

    let db = DatabaseConfig::default();
    assert_eq!(db.url, "mem://");
    assert_eq!(db.namespace, "waitlist");
    assert_eq!(db.database, "core");
    assert!(db.credentials.is_none());

    let export = ExportConfig::default();
    assert_eq!(export.dir, PathBuf::from("exports"));
    assert_eq!(export.file_name, "registrations.xlsx");
    assert_eq!(export.sheet_name, "Registrations");

    assert!(!ApiConfig::default().registration.strict_regions);

    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.console);
    assert!(logging.filter.is_none() && logging.file.is_none());
}

#[test]
fn logging_file_section_fills_defaults() {
    let raw = json!({ "logging": { "filter": "waitlist=debug", "file": { "dir": "/var/log/waitlist" } } });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.logging.level, "info");
    assert_eq!(cfg.logging.filter.as_deref(), Some("waitlist=debug"));
    let file = cfg.logging.file.as_ref().expect("file section");
    assert_eq!(file.dir, PathBuf::from("/var/log/waitlist"));
    assert!(file.json);
    assert_eq!(file.max_files, 10);
}

#[test]
fn api_config_deserializes_partial_sections() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "database": { "url": "ws://db:8000", "credentials": { "username": "u", "password": "p" } },
        "export": { "dir": "/var/lib/waitlist" },
        "registration": { "strict_regions": true }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.database.url, "ws://db:8000");
    assert_eq!(cfg.database.namespace, "waitlist");
    assert_eq!(cfg.export.dir, PathBuf::from("/var/lib/waitlist"));
    assert_eq!(cfg.export.file_name, "registrations.xlsx");
    assert!(cfg.registration.strict_regions);
}

#[test]
fn deref_mut_copies_on_write() {
    let original = ApiConfig::default();
    let mut changed = original.clone();
    changed.server.port = 9000;

    assert_eq!(original.server.port, 3000);
    assert_eq!(changed.server.port, 9000);
}

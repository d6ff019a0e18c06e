use std::collections::HashMap;

use chatledger_config::{BackendConfig, Config, ConfigError, ConfigManager, SheetLayout};
use chatledger_domain::MonthLocale;
use tempfile::tempdir;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn default_config_matches_ledger_layout() {
    let cfg = Config::default();

    assert_eq!(cfg.locale, MonthLocale::Es);
    assert_eq!(cfg.health_port, 10000);
    assert_eq!(cfg.backend_timeout_secs, 30);
    assert!(cfg.serialize_writes);
    assert_eq!(cfg.sheets.billed_start_row, 37);
    assert_eq!(cfg.sheets.unbilled_start_row, 16);
    assert_eq!(cfg.sheets.expense_prefix, "GASTOS");
    assert_eq!(cfg.sheets.outflow_prefix, "ING-EGR");
    assert!(cfg.sheets.provision_sheets);
    assert!(matches!(cfg.backend, BackendConfig::Json { .. }));
    cfg.validate().expect("defaults are valid");
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("nested").join("config.json"));

    let mut cfg = Config::default();
    cfg.locale = MonthLocale::En;
    cfg.timezone = Some("America/Mexico_City".into());
    cfg.backend = BackendConfig::Memory;

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(!dir.path().join("nested").join("config.json.tmp").exists());
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("absent.json"));
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn partial_documents_fill_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"sheets":{"billed_start_row":40},"backend":{"kind":"sheets","spreadsheet_id":"abc"}}"#,
    )
    .expect("write");

    let cfg = ConfigManager::new(path).load().expect("load");

    assert_eq!(cfg.sheets.billed_start_row, 40);
    assert_eq!(cfg.sheets.unbilled_start_row, 16);
    assert_eq!(
        cfg.backend,
        BackendConfig::Sheets {
            spreadsheet_id: "abc".into(),
            access_token: None,
            base_url: "https://sheets.googleapis.com/v4/".into(),
        }
    );
}

#[test]
fn malformed_file_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").expect("write");

    let err = ConfigManager::new(path).load().unwrap_err();
    assert!(matches!(err, ConfigError::Serde(_)));
}

#[test]
fn spreadsheet_id_selects_sheets_backend() {
    let mut cfg = Config::default();
    cfg.apply_overrides(env(&[
        ("SPREADSHEET_ID", "sheet-123"),
        ("SHEETS_ACCESS_TOKEN", "token"),
        ("PORT", "8080"),
    ]))
    .expect("overrides");

    assert_eq!(cfg.health_port, 8080);
    match cfg.backend {
        BackendConfig::Sheets {
            spreadsheet_id,
            access_token,
            base_url,
        } => {
            assert_eq!(spreadsheet_id, "sheet-123");
            assert_eq!(access_token.as_deref(), Some("token"));
            assert_eq!(base_url, BackendConfig::default_base_url());
        }
        other => panic!("unexpected backend {other:?}"),
    }
}

#[test]
fn token_without_spreadsheet_leaves_file_backend_alone() {
    let mut cfg = Config::default();
    cfg.backend = BackendConfig::Memory;
    cfg.apply_overrides(env(&[("SHEETS_ACCESS_TOKEN", "token"), ("PORT", " ")]))
        .expect("overrides");

    assert_eq!(cfg.backend, BackendConfig::Memory);
    assert_eq!(cfg.health_port, 10000);
}

#[test]
fn invalid_port_is_reported() {
    let mut cfg = Config::default();
    let err = cfg.apply_overrides(env(&[("PORT", "http")])).unwrap_err();
    assert!(matches!(err, ConfigError::Env { var: "PORT", .. }));
}

#[test]
fn timezone_override_is_validated() {
    let mut cfg = Config::default();
    cfg.apply_overrides(env(&[("CHATLEDGER_TIMEZONE", "America/Monterrey")]))
        .expect("valid zone");
    assert!(cfg.time_zone().expect("parse").is_some());

    let err = cfg
        .apply_overrides(env(&[("CHATLEDGER_TIMEZONE", "Mars/Olympus")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Env { .. }));
}

#[test]
fn layout_rejects_start_rows_past_scan_end() {
    let layout = SheetLayout {
        billed_start_row: 2000,
        ..SheetLayout::default()
    };
    assert!(matches!(layout.validate(), Err(ConfigError::Invalid(_))));

    let empty_prefix = SheetLayout {
        expense_prefix: " ".into(),
        ..SheetLayout::default()
    };
    assert!(empty_prefix.validate().is_err());
}

#[test]
fn provisioning_can_be_turned_off_in_the_file() {
    let cfg: Config =
        serde_json::from_str(r#"{ "sheets": { "provision_sheets": false } }"#).expect("parse");

    assert!(!cfg.sheets.provision_sheets);
    assert_eq!(cfg.sheets.billed_start_row, 37);
}

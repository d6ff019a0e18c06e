//! Turns a [`Config`] into a running engine.

use std::{sync::Arc, time::Duration};

use chatledger_config::{BackendConfig, Config};
use chatledger_core::{EngineSettings, LedgerEngine, LocatorSettings, TabularStore};
use chatledger_sheets::SheetsClient;
use chatledger_store_json::{JsonWorkbookStore, MemoryWorkbookStore};
use tracing::{info, warn};

use crate::{clock::SystemClock, errors::AppError};

/// Engine tuning derived from the configuration file.
pub fn engine_settings(config: &Config) -> EngineSettings {
    let layout = &config.sheets;
    EngineSettings {
        locator: LocatorSettings {
            locale: config.locale,
            expense_prefix: layout.expense_prefix.clone(),
            outflow_prefix: layout.outflow_prefix.clone(),
        },
        billed_start_row: layout.billed_start_row,
        unbilled_start_row: layout.unbilled_start_row,
        outflow_scan_end_row: layout.outflow_scan_end_row,
        sales_scan_end_row: layout.sales_scan_end_row,
        backend_timeout: (config.backend_timeout_secs > 0)
            .then(|| Duration::from_secs(config.backend_timeout_secs)),
        serialize_writes: config.serialize_writes,
        provision_sheets: layout.provision_sheets,
    }
}

/// Builds the configured store. The spreadsheet backend must pass an access check first.
pub async fn build_store(backend: &BackendConfig) -> Result<Arc<dyn TabularStore>, AppError> {
    let store: Arc<dyn TabularStore> = match backend {
        BackendConfig::Memory => {
            warn!("using the in-memory backend; nothing will be persisted");
            Arc::new(MemoryWorkbookStore::new())
        }
        BackendConfig::Json { path } => Arc::new(JsonWorkbookStore::open(path.clone())?),
        BackendConfig::Sheets {
            spreadsheet_id,
            access_token,
            base_url,
        } => {
            if access_token.is_none() {
                warn!("no access token configured; requests are sent unauthenticated");
            }
            let client = SheetsClient::new(base_url, spreadsheet_id.clone(), access_token.clone())?;
            client.verify_access().await?;
            Arc::new(client)
        }
    };
    info!(backend = backend.kind(), "store ready");
    Ok(store)
}

/// Builds the engine for `config` on top of `store`.
pub fn build_engine(config: &Config, store: Arc<dyn TabularStore>) -> Result<LedgerEngine, AppError> {
    let clock = SystemClock::new(config.time_zone()?);
    Ok(LedgerEngine::new(store, Arc::new(clock), engine_settings(config)))
}

#[cfg(test)]
mod tests {
    use chatledger_core::Dispatch;

    use super::*;

    #[test]
    fn zero_timeout_disables_the_bound() {
        let config = Config {
            backend_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(engine_settings(&config).backend_timeout, None);
    }

    #[test]
    fn layout_flows_into_engine_settings() {
        let mut config = Config::default();
        config.sheets.billed_start_row = 40;
        config.sheets.outflow_prefix = "FLUJO".into();

        let settings = engine_settings(&config);

        assert_eq!(settings.billed_start_row, 40);
        assert_eq!(settings.locator.outflow_prefix, "FLUJO");
        assert_eq!(settings.backend_timeout, Some(Duration::from_secs(30)));
        assert!(settings.serialize_writes);
    }

    #[tokio::test]
    async fn memory_backend_builds_without_io() {
        let store = build_store(&BackendConfig::Memory).await.expect("store");
        assert!(store.list_sheet_names().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn fresh_json_workbook_accepts_every_command() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            backend: BackendConfig::Json {
                path: dir.path().join("workbook.json"),
            },
            ..Config::default()
        };
        let store = build_store(&config.backend).await.expect("store");
        let engine = build_engine(&config, store.clone()).expect("engine");

        for message in [
            "venta Ana toldo anticipo 100",
            "venta Ana toldo anticipo 250",
            "gastos 80 comida",
            "facturado 1200 renta",
            "sin facturar 300 gasolina",
        ] {
            let dispatch = engine.handle_message(message).await;
            assert!(matches!(dispatch, Dispatch::Completed(_)), "{message}: {dispatch:?}");
        }
        assert_eq!(store.list_sheet_names().await.expect("list").len(), 3);
    }
}

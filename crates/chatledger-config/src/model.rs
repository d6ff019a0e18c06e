use std::path::PathBuf;

use chatledger_domain::MonthLocale;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

pub const DEFAULT_HEALTH_PORT: u16 = 10000;
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/";

pub const ENV_SPREADSHEET_ID: &str = "SPREADSHEET_ID";
pub const ENV_ACCESS_TOKEN: &str = "SHEETS_ACCESS_TOKEN";
pub const ENV_PORT: &str = "PORT";
pub const ENV_TIMEZONE: &str = "CHATLEDGER_TIMEZONE";

/// Runtime configuration of the ledger service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub locale: MonthLocale,
    /// IANA zone used to compute "today". Host local time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default = "Config::default_health_port")]
    pub health_port: u16,
    /// Upper bound for a single backend call; 0 disables the bound.
    #[serde(default = "Config::default_backend_timeout_secs")]
    pub backend_timeout_secs: u64,
    #[serde(default = "Config::default_serialize_writes")]
    pub serialize_writes: bool,
    #[serde(default)]
    pub sheets: SheetLayout,
    #[serde(default)]
    pub backend: BackendConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: MonthLocale::default(),
            timezone: None,
            health_port: Self::default_health_port(),
            backend_timeout_secs: Self::default_backend_timeout_secs(),
            serialize_writes: Self::default_serialize_writes(),
            sheets: SheetLayout::default(),
            backend: BackendConfig::default(),
        }
    }
}

impl Config {
    pub fn default_health_port() -> u16 {
        DEFAULT_HEALTH_PORT
    }

    pub fn default_backend_timeout_secs() -> u64 {
        DEFAULT_BACKEND_TIMEOUT_SECS
    }

    pub fn default_serialize_writes() -> bool {
        true
    }

    /// Parsed timezone, if one is configured.
    pub fn time_zone(&self) -> Result<Option<Tz>, ConfigError> {
        self.timezone
            .as_deref()
            .map(|name| {
                name.trim()
                    .parse::<Tz>()
                    .map_err(|_| ConfigError::Invalid(format!("unknown timezone `{name}`")))
            })
            .transpose()
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(spreadsheet_id) = read(ENV_SPREADSHEET_ID) {
            let (access_token, base_url) = match &self.backend {
                BackendConfig::Sheets {
                    access_token,
                    base_url,
                    ..
                } => (access_token.clone(), base_url.clone()),
                _ => (None, BackendConfig::default_base_url()),
            };
            self.backend = BackendConfig::Sheets {
                spreadsheet_id,
                access_token,
                base_url,
            };
        }
        if let Some(token) = read(ENV_ACCESS_TOKEN) {
            if let BackendConfig::Sheets { access_token, .. } = &mut self.backend {
                *access_token = Some(token);
            }
        }
        if let Some(port) = read(ENV_PORT) {
            self.health_port = port.parse().map_err(|_| ConfigError::Env {
                var: ENV_PORT,
                value: port.clone(),
            })?;
        }
        if let Some(zone) = read(ENV_TIMEZONE) {
            if zone.parse::<Tz>().is_err() {
                return Err(ConfigError::Env {
                    var: ENV_TIMEZONE,
                    value: zone,
                });
            }
            self.timezone = Some(zone);
        }
        Ok(())
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.time_zone()?;
        self.sheets.validate()?;
        if let BackendConfig::Sheets {
            spreadsheet_id,
            base_url,
            ..
        } = &self.backend
        {
            if spreadsheet_id.trim().is_empty() {
                return Err(ConfigError::Invalid("spreadsheet_id is empty".into()));
            }
            if base_url.trim().is_empty() {
                return Err(ConfigError::Invalid("base_url is empty".into()));
            }
        }
        Ok(())
    }
}

/// Naming prefixes and row bounds of the ledger sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    pub expense_prefix: String,
    pub outflow_prefix: String,
    pub billed_start_row: u32,
    pub unbilled_start_row: u32,
    pub outflow_scan_end_row: u32,
    pub sales_scan_end_row: u32,
    /// Create the current month's sheets on first write. Spreadsheet backends ignore it.
    pub provision_sheets: bool,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            expense_prefix: "GASTOS".into(),
            outflow_prefix: "ING-EGR".into(),
            billed_start_row: 37,
            unbilled_start_row: 16,
            outflow_scan_end_row: 1000,
            sales_scan_end_row: 10_000,
            provision_sheets: true,
        }
    }
}

impl SheetLayout {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.expense_prefix.trim().is_empty() || self.outflow_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("sheet prefixes must not be empty".into()));
        }
        for (label, start) in [
            ("billed_start_row", self.billed_start_row),
            ("unbilled_start_row", self.unbilled_start_row),
        ] {
            if start == 0 {
                return Err(ConfigError::Invalid(format!("{label} is 1-based")));
            }
            if start > self.outflow_scan_end_row {
                return Err(ConfigError::Invalid(format!(
                    "{label} {start} lies past outflow_scan_end_row {}",
                    self.outflow_scan_end_row
                )));
            }
        }
        if self.sales_scan_end_row < 2 {
            return Err(ConfigError::Invalid(
                "sales_scan_end_row must cover the header and at least one row".into(),
            ));
        }
        Ok(())
    }
}

/// Where the ledger workbook lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    Memory,
    Json {
        path: PathBuf,
    },
    Sheets {
        spreadsheet_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        access_token: Option<String>,
        #[serde(default = "BackendConfig::default_base_url")]
        base_url: String,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Json {
            path: Self::default_workbook_path(),
        }
    }
}

impl BackendConfig {
    pub fn default_base_url() -> String {
        DEFAULT_SHEETS_BASE_URL.into()
    }

    pub fn default_workbook_path() -> PathBuf {
        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("chatledger").join("workbook.json")
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BackendConfig::Memory => "memory",
            BackendConfig::Json { .. } => "json",
            BackendConfig::Sheets { .. } => "sheets",
        }
    }
}

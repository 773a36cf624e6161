//! Runtime configuration: column header names and environment settings.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default data file, looked up relative to the working directory.
pub const DEFAULT_SOURCE: &str = "Taranto_Safety_Ranking.csv";

/// Default log file used by the CLI.
pub const DEFAULT_LOG_FILE: &str = "logs/sentinella.log";

/// Maps each logical field to the header used in the source file.
///
/// Stored as a JSON object on disk; any missing key keeps its default:
/// ```json
/// {
///   "name": "DENOMINAZIONESCUOLA",
///   "latitude": "LATITUDINE"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub name: String,
    pub safety_score: String,
    pub municipality: String,
    pub address: String,
    pub missing_notes: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: "DENOMINAZIONESCUOLA".to_string(),
            safety_score: "SAFETY_SCORE".to_string(),
            municipality: "COMUNE".to_string(),
            address: "INDIRIZZOSCUOLA".to_string(),
            missing_notes: "NOTE_MANCANTI".to_string(),
            latitude: "lat".to_string(),
            longitude: "lon".to_string(),
        }
    }
}

impl ColumnMap {
    /// Loads a column map from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read column map '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid column map '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Settings resolved from the environment (after `.env` has been loaded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source: String,
    pub columns_path: Option<String>,
    pub log_file_path: String,
}

impl Settings {
    /// Reads `SENTINELLA_SOURCE`, `SENTINELLA_COLUMNS` and `LOG_FILE_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            source: lookup("SENTINELLA_SOURCE").unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            columns_path: lookup("SENTINELLA_COLUMNS").filter(|p| !p.is_empty()),
            log_file_path: lookup("LOG_FILE_PATH").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        }
    }

    /// Column map from `columns_path`, or the defaults when none is set.
    pub fn column_map(&self) -> Result<ColumnMap> {
        match &self.columns_path {
            Some(path) => ColumnMap::load(path),
            None => Ok(ColumnMap::default()),
        }
    }
}

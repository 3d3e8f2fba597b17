//! Configuration and constants for the dashboard.
//!
//! Everything has a built-in default so the app runs with no config file.
//! An optional JSON file can override any subset of the fields.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Workbook read at startup when nothing else is configured.
pub const DEFAULT_SOURCE_PATH: &str = "supermarkt_sales.xlsx";
pub const DEFAULT_SHEET: &str = "Sales";
/// Rows above the header line (title block in the workbook).
pub const DEFAULT_SKIP_ROWS: usize = 3;
pub const DEFAULT_COLUMNS: &str = "B:R";
pub const DEFAULT_ROW_CAP: usize = 1000;

pub const DEFAULT_BANNER_IMAGE: &str = "dash12.png";

/// Env var pointing at a JSON config file.
pub const CONFIG_ENV_VAR: &str = "SALES_DASHBOARD_CONFIG";
/// Picked up from the working directory when the env var is unset.
pub const LOCAL_CONFIG_FILE: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// Source identity
// ---------------------------------------------------------------------------

/// Identifies one tabular source: file, sheet, header offset, column range
/// and row cap. Two equal configs always produce the same dataset, which is
/// why the cache keys on this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub path: PathBuf,
    /// Only used for spreadsheet formats.
    pub sheet: String,
    /// Rows skipped before the header row (spreadsheets only).
    pub skip_rows: usize,
    /// Inclusive spreadsheet column range, e.g. `"B:R"`.
    pub columns: String,
    /// Maximum number of data rows read from any format.
    pub row_cap: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SOURCE_PATH),
            sheet: DEFAULT_SHEET.to_string(),
            skip_rows: DEFAULT_SKIP_ROWS,
            columns: DEFAULT_COLUMNS.to_string(),
            row_cap: DEFAULT_ROW_CAP,
        }
    }
}

impl SourceConfig {
    /// Same layout settings, different file.
    pub fn with_path(&self, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    /// Static image shown under the charts. `None` hides it.
    pub banner_image: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            banner_image: Some(PathBuf::from(DEFAULT_BANNER_IMAGE)),
        }
    }
}

impl DashboardConfig {
    /// Resolve the config: env var path, then `dashboard.json`, then defaults.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            log::info!("Reading config from ${CONFIG_ENV_VAR} = {path}");
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.is_file() {
            log::info!("Reading config from {}", local.display());
            return Self::from_file(local);
        }
        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_workbook_layout() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.source.sheet, "Sales");
        assert_eq!(cfg.source.skip_rows, 3);
        assert_eq!(cfg.source.columns, "B:R");
        assert_eq!(cfg.source.row_cap, 1000);
        assert_eq!(cfg.banner_image, Some(PathBuf::from("dash12.png")));
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "source": {{ "path": "data/sales.csv", "row_cap": 50 }} }}"#).unwrap();

        let cfg = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.source.path, PathBuf::from("data/sales.csv"));
        assert_eq!(cfg.source.row_cap, 50);
        assert_eq!(cfg.source.sheet, DEFAULT_SHEET);
        assert_eq!(cfg.banner_image, Some(PathBuf::from(DEFAULT_BANNER_IMAGE)));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(DashboardConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_with_path_keeps_layout() {
        let base = SourceConfig {
            row_cap: 10,
            ..SourceConfig::default()
        };
        let other = base.with_path("other.xlsx");
        assert_eq!(other.row_cap, 10);
        assert_eq!(other.path, PathBuf::from("other.xlsx"));
        assert!(other != base);
    }
}

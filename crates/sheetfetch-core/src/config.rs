use crate::retry::RetryPolicy;
use crate::sheet::{ColumnRange, ColumnSelector};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Browser-like User-Agent; some image hosts refuse library defaults.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Settings for the `fetch` job (`[fetch]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Spreadsheet to read image URLs from.
    pub table: PathBuf,
    /// Sheet name; first sheet when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// Identifier column, by 0-based position or header name.
    pub id_column: ColumnSelector,
    /// Columns holding candidate image URLs.
    pub image_columns: ColumnRange,
    /// Directory downloaded images are written to (created if missing).
    pub output_dir: PathBuf,
    /// Attempts per URL, including the first.
    pub max_retries: u32,
    /// Seconds allowed for connecting, and for any stretch with no data received.
    pub timeout_secs: f64,
    /// Pause after each successful download, in seconds.
    pub delay_secs: f64,
    /// Pause after each failed attempt, in seconds.
    pub retry_delay_secs: f64,
    pub user_agent: String,
    /// Extra static request headers.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            table: PathBuf::from("images.xlsx"),
            sheet: None,
            id_column: ColumnSelector::Index(0),
            image_columns: ColumnRange::default(),
            output_dir: PathBuf::from("downloaded_images"),
            max_retries: 3,
            timeout_secs: 20.0,
            delay_secs: 1.5,
            retry_delay_secs: 3.0,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: BTreeMap::new(),
        }
    }
}

impl FetchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            bail!("max_retries must be at least 1");
        }
        check_secs("timeout_secs", self.timeout_secs)?;
        if self.timeout_secs == 0.0 {
            bail!("timeout_secs must be greater than 0");
        }
        check_secs("delay_secs", self.delay_secs)?;
        check_secs("retry_delay_secs", self.retry_delay_secs)?;
        if self.image_columns.is_empty() {
            bail!("image_columns is empty");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_secs_f64(self.retry_delay_secs),
        )
    }
}

/// Settings for the `rename` job (`[rename]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// Spreadsheet whose row order defines the new identifiers.
    pub table: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    pub id_column: ColumnSelector,
    /// Directory whose files are renamed in place.
    pub image_dir: PathBuf,
    /// Where the rewritten table goes; must differ from `table`.
    pub output: PathBuf,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            table: PathBuf::from("images.xlsx"),
            sheet: Some("Sheet1".to_string()),
            id_column: ColumnSelector::Name("id".to_string()),
            image_dir: PathBuf::from("images"),
            output: PathBuf::from("data_new.xlsx"),
        }
    }
}

/// Configuration loaded from `~/.config/sheetfetch/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetfetchConfig {
    pub fetch: FetchConfig,
    pub rename: RenameConfig,
}

fn check_secs(name: &str, v: f64) -> Result<()> {
    if !v.is_finite() || v < 0.0 {
        bail!("{} must be a non-negative number of seconds, got {}", name, v);
    }
    Ok(())
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sheetfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from the XDG location, creating a default file if none exists.
pub fn load_or_init() -> Result<SheetfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SheetfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path; missing sections and keys take defaults.
pub fn load_from(path: &Path) -> Result<SheetfetchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: SheetfetchConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = SheetfetchConfig::default();
        assert_eq!(cfg.fetch.max_retries, 3);
        assert_eq!(cfg.fetch.timeout(), Duration::from_secs(20));
        assert_eq!(cfg.fetch.delay(), Duration::from_millis(1500));
        assert_eq!(cfg.fetch.retry_policy().delay, Duration::from_secs(3));
        assert_eq!(cfg.fetch.image_columns.columns(), 6..17);
        assert_eq!(cfg.fetch.id_column, ColumnSelector::Index(0));
        assert_eq!(cfg.rename.id_column, ColumnSelector::Name("id".into()));
        assert_eq!(cfg.rename.output, PathBuf::from("data_new.xlsx"));
        assert!(cfg.fetch.validate().is_ok());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = SheetfetchConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SheetfetchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            [fetch]
            table = "plants.csv"
            id_column = "code"
            image_columns = "C:E"
            max_retries = 5
            delay_secs = 0.0

            [fetch.headers]
            Referer = "https://example.com/"

            [rename]
            image_dir = "public/images"
        "#;
        let cfg: SheetfetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.fetch.table, PathBuf::from("plants.csv"));
        assert_eq!(cfg.fetch.id_column, ColumnSelector::Name("code".into()));
        assert_eq!(cfg.fetch.image_columns.columns(), 2..5);
        assert_eq!(cfg.fetch.max_retries, 5);
        assert_eq!(cfg.fetch.delay(), Duration::ZERO);
        assert_eq!(cfg.fetch.timeout_secs, 20.0);
        assert_eq!(cfg.fetch.headers.get("Referer").unwrap(), "https://example.com/");
        assert_eq!(cfg.rename.image_dir, PathBuf::from("public/images"));
        assert_eq!(cfg.rename.output, PathBuf::from("data_new.xlsx"));
    }

    #[test]
    fn config_toml_rejects_bad_range() {
        let toml = r#"
            [fetch]
            image_columns = "Q:G"
        "#;
        assert!(toml::from_str::<SheetfetchConfig>(toml).is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = FetchConfig::default();
        cfg.max_retries = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = FetchConfig::default();
        cfg.retry_delay_secs = -1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = FetchConfig::default();
        cfg.timeout_secs = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = FetchConfig::default();
        cfg.timeout_secs = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[fetch]\noutput_dir = \"out\"\n").unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.fetch.output_dir, PathBuf::from("out"));
        assert!(load_from(&dir.path().join("missing.toml")).is_err());
    }
}

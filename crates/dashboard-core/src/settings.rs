use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default workbook looked up relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "inventory_performance_dashboard_data.xlsx";

/// Default name of the product dimension sheet.
pub const DEFAULT_PRODUCT_TABLE: &str = "DimProduct";

/// Default name of the inventory fact sheet.
pub const DEFAULT_FACT_TABLE: &str = "FactInventory";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Inventory performance dashboard for the terminal
#[derive(Parser, Debug, Clone)]
#[command(
    name = "inventory-dashboard",
    about = "Inventory performance dashboard for the terminal",
    version
)]
pub struct Settings {
    /// Workbook (.xlsx/.xls/.ods) or directory of CSV tables
    #[arg(long, default_value = DEFAULT_DATA_FILE)]
    pub file: PathBuf,

    /// Name of the product dimension sheet
    #[arg(long, default_value = DEFAULT_PRODUCT_TABLE)]
    pub product_table: String,

    /// Name of the inventory fact sheet
    #[arg(long, default_value = DEFAULT_FACT_TABLE)]
    pub fact_table: String,

    /// Page shown on start-up
    #[arg(long, default_value = "overview", value_parser = ["overview", "trends"])]
    pub page: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,

    /// Print the computed dashboard as JSON instead of starting the UI
    #[arg(long)]
    pub export: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.inventory-dashboard/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".inventory-dashboard").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("Could not clear {}: {}", config_path.display(), e);
            }
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins. clap keys args by field name, not flag spelling.
        if !is_arg_explicitly_set(&matches, "file") {
            if let Some(v) = last.file {
                settings.file = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "page") {
            if let Some(v) = last.page.filter(|p| is_known_page(p)) {
                settings.page = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }

        settings = Self::apply_debug(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::warn!("Could not persist settings to {}: {}", config_path.display(), e);
        }

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            file: Some(s.file.clone()),
            page: Some(s.page.clone()),
            theme: Some(s.theme.clone()),
        }
    }
}

fn is_known_page(page: &str) -> bool {
    matches!(page, "overview" | "trends")
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            file: Some(PathBuf::from("/data/q1.xlsx")),
            page: Some("trends".to_string()),
            theme: Some("dark".to_string()),
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.file, Some(PathBuf::from("/data/q1.xlsx")));
        assert_eq!(loaded.page, Some("trends".to_string()));
        assert_eq!(loaded.theme, Some("dark".to_string()));
    }

    #[test]
    fn test_last_used_params_default_when_missing_or_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        assert!(LastUsedParams::load_from(&path).file.is_none());

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        let loaded = LastUsedParams::load_from(&path);
        assert!(loaded.page.is_none());
        assert!(loaded.theme.is_none());
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("light".to_string()),
            ..Default::default()
        }
        .save_to(&path)
        .expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["inventory-dashboard"]);

        assert_eq!(settings.file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(settings.product_table, "DimProduct");
        assert_eq!(settings.fact_table, "FactInventory");
        assert_eq!(settings.page, "overview");
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
        assert!(!settings.export);
    }

    #[test]
    fn test_settings_cli_parsing() {
        let settings = Settings::parse_from([
            "inventory-dashboard",
            "--file",
            "/tmp/stock.xlsx",
            "--page",
            "trends",
            "--fact-table",
            "Facts",
            "--export",
        ]);
        assert_eq!(settings.file, PathBuf::from("/tmp/stock.xlsx"));
        assert_eq!(settings.page, "trends");
        assert_eq!(settings.fact_table, "Facts");
        assert!(settings.export);
    }

    #[test]
    fn test_settings_rejects_unknown_page() {
        let result = Settings::try_parse_from(["inventory-dashboard", "--page", "inventory"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_with_last_used_merges_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            file: Some(PathBuf::from("/data/persisted.xlsx")),
            page: Some("trends".to_string()),
            theme: Some("classic".to_string()),
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["inventory-dashboard".into()], &config_path);
        assert_eq!(settings.file, PathBuf::from("/data/persisted.xlsx"));
        assert_eq!(settings.page, "trends");
        assert_eq!(settings.theme, "classic");
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            page: Some("trends".to_string()),
            theme: Some("dark".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec![
                "inventory-dashboard".into(),
                "--page".into(),
                "overview".into(),
                "--theme".into(),
                "light".into(),
            ],
            &config_path,
        );
        assert_eq!(settings.page, "overview");
        assert_eq!(settings.theme, "light");
    }

    #[test]
    fn test_load_with_last_used_ignores_unknown_persisted_page() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            page: Some("forecast".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["inventory-dashboard".into()], &config_path);
        assert_eq!(settings.page, "overview");
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("classic".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["inventory-dashboard".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
        assert_eq!(settings.theme, "auto");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            vec!["inventory-dashboard".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec![
                "inventory-dashboard".into(),
                "--page".into(),
                "trends".into(),
            ],
            &config_path,
        );

        assert!(config_path.exists());
        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.page, Some("trends".to_string()));
        assert_eq!(loaded.file, Some(PathBuf::from(DEFAULT_DATA_FILE)));
    }
}

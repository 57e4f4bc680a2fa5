//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/gf/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Record count from which evaluation goes parallel when not configured.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2_000;

/// Keys accepted by `gf config set`.
const VALID_KEYS: &[&str] = &[
    "store.path",
    "output.color",
    "evaluate.parallel",
    "evaluate.parallel_threshold",
];

/// Configuration file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Filter store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Evaluation settings.
    #[serde(default)]
    pub evaluate: EvaluateConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            store: StoreConfig::default(),
            output: OutputConfig::default(),
            evaluate: EvaluateConfig::default(),
        }
    }
}

/// Filter store configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store file; the XDG data dir is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Evaluation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluateConfig {
    /// Allow parallel evaluation of large inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,

    /// Record count from which evaluation goes parallel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_threshold: Option<usize>,
}

impl EvaluateConfig {
    /// Whether `count` records should be evaluated on the rayon pool.
    pub fn use_parallel(&self, count: usize) -> bool {
        self.parallel.unwrap_or(true)
            && count >= self.parallel_threshold.unwrap_or(DEFAULT_PARALLEL_THRESHOLD)
    }
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/gf/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("gf"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("gf"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("GF_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    Ok(get_config_dir()?.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        warn!(
            found = config.version,
            supported = CONFIG_VERSION,
            "config file is newer than this gf, unknown settings are ignored"
        );
    }

    // Version 1 is the initial schema; later versions add their steps here.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<PathBuf> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CommandError::Config(format!("Failed to create config directory: {}", e)))?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(path)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        let unset = || "(default)".to_string();

        println!("[store]");
        println!(
            "  path: {}",
            config
                .store
                .path
                .as_ref()
                .map_or_else(unset, |p| p.display().to_string())
        );

        println!("\n[output]");
        println!(
            "  color: {}",
            config.output.color.map_or_else(unset, |c| c.to_string())
        );

        println!("\n[evaluate]");
        println!(
            "  parallel: {}",
            config.evaluate.parallel.map_or_else(unset, |p| p.to_string())
        );
        println!(
            "  parallel_threshold: {}",
            config
                .evaluate
                .parallel_threshold
                .map_or_else(unset, |t| t.to_string())
        );
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Applies one `key = value` setting to `config`.
///
/// An empty value for `store.path` clears it.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "store.path" => {
            config.store.path = (!value.is_empty()).then(|| PathBuf::from(value));
        }
        "output.color" => {
            config.output.color = Some(parse_bool(value)?);
        }
        "evaluate.parallel" => {
            config.evaluate.parallel = Some(parse_bool(value)?);
        }
        "evaluate.parallel_threshold" => {
            let threshold = value.parse::<usize>().map_err(|_| {
                CommandError::Config(format!(
                    "Invalid parallel_threshold value '{}'. Use a non-negative integer",
                    value
                ))
            })?;
            config.evaluate.parallel_threshold = Some(threshold);
        }
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )));
        }
    }
    Ok(())
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    apply_setting(&mut config, &opts.key, &opts.value)?;
    let path = save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    /// Points GF_CONFIG at `path` for the duration of `f`.
    fn with_config_path<T>(path: &std::path::Path, f: impl FnOnce() -> T) -> T {
        let original = env::var("GF_CONFIG").ok();
        env::set_var("GF_CONFIG", path);
        let result = f();
        match original {
            Some(val) => env::set_var("GF_CONFIG", val),
            None => env::remove_var("GF_CONFIG"),
        }
        result
    }

    #[test]
    fn test_parse_bool_values() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("YES").unwrap());
        assert!(parse_bool("on").unwrap());
        assert!(!parse_bool("False").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
        assert!(parse_bool("").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.store.path.is_none());
        assert!(config.output.color.is_none());
        assert!(config.evaluate.parallel.is_none());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
version = 1

[store]
path = "/tmp/gf/filters.json"

[output]
color = false

[evaluate]
parallel = true
parallel_threshold = 10
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store.path, Some(PathBuf::from("/tmp/gf/filters.json")));
        assert_eq!(config.output.color, Some(false));
        assert_eq!(config.evaluate.parallel, Some(true));
        assert_eq!(config.evaluate.parallel_threshold, Some(10));
    }

    #[test]
    fn test_config_deserialization_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_serialization_skips_unset() {
        let mut config = Config::default();
        config.output.color = Some(true);

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("color = true"));
        assert!(!toml_str.contains("parallel"));
        assert!(!toml_str.contains("path"));
    }

    #[test]
    fn test_migrate_future_version() {
        let config: Config = toml::from_str("version = 999").unwrap();
        let migrated = migrate_config(config).unwrap();
        assert_eq!(migrated.version, CONFIG_VERSION);
    }

    #[test]
    fn test_apply_setting() {
        let mut config = Config::default();
        apply_setting(&mut config, "store.path", "/data/filters.json").unwrap();
        apply_setting(&mut config, "output.color", "off").unwrap();
        apply_setting(&mut config, "evaluate.parallel_threshold", "500").unwrap();

        assert_eq!(config.store.path, Some(PathBuf::from("/data/filters.json")));
        assert_eq!(config.output.color, Some(false));
        assert_eq!(config.evaluate.parallel_threshold, Some(500));

        apply_setting(&mut config, "store.path", "").unwrap();
        assert!(config.store.path.is_none());
    }

    #[test]
    fn test_apply_setting_rejects_bad_input() {
        let mut config = Config::default();
        let err = apply_setting(&mut config, "output.width", "80").unwrap_err();
        assert!(err.to_string().contains("Valid keys"));
        assert!(apply_setting(&mut config, "evaluate.parallel_threshold", "-1").is_err());
        assert!(apply_setting(&mut config, "evaluate.parallel", "sometimes").is_err());
    }

    #[test]
    fn test_use_parallel() {
        let mut evaluate = EvaluateConfig::default();
        assert!(!evaluate.use_parallel(10));
        assert!(evaluate.use_parallel(DEFAULT_PARALLEL_THRESHOLD));

        evaluate.parallel_threshold = Some(5);
        assert!(evaluate.use_parallel(10));

        evaluate.parallel = Some(false);
        assert!(!evaluate.use_parallel(10));
    }

    #[test]
    #[serial]
    fn test_load_missing_config_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let config = with_config_path(&path, load_config).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let loaded = with_config_path(&path, || {
            let mut config = Config::default();
            config.evaluate.parallel = Some(false);
            save_config(&config)?;
            load_config()
        })
        .unwrap();

        assert!(path.exists());
        assert_eq!(loaded.evaluate.parallel, Some(false));
    }

    #[test]
    #[serial]
    fn test_load_invalid_config_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "output = 3").unwrap();

        let err = with_config_path(&path, load_config).unwrap_err();
        assert!(matches!(err, CommandError::Config(_)));
    }
}

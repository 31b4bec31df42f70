use crate::core::location::{Backoff, RetryPolicy};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

pub mod migrate; // use submodule at src/config/migrate.rs

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_user")]
    pub default_user: String,
    #[serde(default = "default_location_timeout_secs")]
    pub location_timeout_secs: u64,
    #[serde(default = "default_location_max_attempts")]
    pub location_max_attempts: u32,
    /// `fixed` or `exponential`
    #[serde(default = "default_location_backoff")]
    pub location_backoff: String,
    #[serde(default = "default_location_backoff_ms")]
    pub location_backoff_ms: u64,
    #[serde(default = "default_location_backoff_max_ms")]
    pub location_backoff_max_ms: u64,
    #[serde(default)]
    pub max_accuracy_meters: Option<f64>,
    #[serde(default = "default_lunch_options")]
    pub lunch_options: Vec<i64>,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "default".to_string())
}
fn default_location_timeout_secs() -> u64 {
    10
}
fn default_location_max_attempts() -> u32 {
    3
}
fn default_location_backoff() -> String {
    "exponential".to_string()
}
fn default_location_backoff_ms() -> u64 {
    500
}
fn default_location_backoff_max_ms() -> u64 {
    4000
}
fn default_lunch_options() -> Vec<i64> {
    vec![0, 15, 30, 45, 60]
}
fn default_separator_char() -> String {
    "-".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            default_user: default_user(),
            location_timeout_secs: default_location_timeout_secs(),
            location_max_attempts: default_location_max_attempts(),
            location_backoff: default_location_backoff(),
            location_backoff_ms: default_location_backoff_ms(),
            location_backoff_max_ms: default_location_backoff_max_ms(),
            max_accuracy_meters: None,
            lunch_options: default_lunch_options(),
            separator_char: default_separator_char(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rshiftlog")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".rshiftlog")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rshiftlog.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rshiftlog.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            AppError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Config = serde_yaml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.location_max_attempts == 0 {
            return Err(AppError::Config(
                "location_max_attempts must be at least 1".into(),
            ));
        }
        if self.location_timeout_secs == 0 {
            return Err(AppError::Config(
                "location_timeout_secs must be at least 1".into(),
            ));
        }
        if !matches!(self.location_backoff.as_str(), "fixed" | "exponential") {
            return Err(AppError::Config(format!(
                "location_backoff must be 'fixed' or 'exponential', got '{}'",
                self.location_backoff
            )));
        }
        if let Some(acc) = self.max_accuracy_meters
            && !(acc.is_finite() && acc > 0.0)
        {
            return Err(AppError::Config(format!(
                "max_accuracy_meters must be a positive number, got {}",
                acc
            )));
        }
        if self.lunch_options.iter().any(|m| *m < 0) {
            return Err(AppError::Config(
                "lunch_options must not contain negative values".into(),
            ));
        }
        Ok(())
    }

    /// Retry policy for position acquisition built from the location_* keys.
    pub fn retry_policy(&self) -> RetryPolicy {
        let step = Duration::from_millis(self.location_backoff_ms);
        let backoff = match self.location_backoff.as_str() {
            "fixed" => Backoff::Fixed(step),
            _ => Backoff::Exponential {
                initial: step,
                max: Duration::from_millis(self.location_backoff_max_ms.max(self.location_backoff_ms)),
            },
        };

        RetryPolicy {
            max_attempts: self.location_max_attempts.max(1),
            timeout: Duration::from_secs(self.location_timeout_secs),
            backoff,
            max_accuracy_meters: self.max_accuracy_meters,
        }
    }

    /// Accept a lunch length only if it is one of the configured options.
    pub fn check_lunch(&self, minutes: i64) -> AppResult<i64> {
        if self.lunch_options.contains(&minutes) {
            Ok(minutes)
        } else {
            Err(AppError::InvalidLunch(format!(
                "{} minutes is not one of the allowed options {:?}",
                minutes, self.lunch_options
            )))
        }
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<String> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = crate::utils::path::expand_tilde(&name);
            if p.is_absolute() { p } else { dir.join(p) }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(io::Error::other)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        // Create empty DB file if not exists
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(config.database)
    }
}

//! Presenter preferences stored as JSON in the application directory.
//!
//! Only display settings live here. Ledger entries are session-scoped and
//! never written to disk.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::core::utils::{ensure_dir, PathResolver};

const TMP_SUFFIX: &str = "tmp";
const MAX_DECIMAL_PLACES: u8 = 6;
/// Offsets beyond this are rejected by chrono.
const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Unknown setting `{0}`")]
    UnknownKey(String),
    #[error("Invalid value for `{key}`: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency_symbol: String,
    pub decimal_places: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
    pub show_snapshot_after_mutation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-IN".into(),
            currency_symbol: "₹".into(),
            decimal_places: 2,
            utc_offset_minutes: None,
            show_snapshot_after_mutation: true,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 5] = [
        "locale",
        "currency_symbol",
        "decimal_places",
        "utc_offset_minutes",
        "show_snapshot_after_mutation",
    ];

    /// Renders an amount with the configured symbol and precision.
    pub fn format_money(&self, amount: Decimal) -> String {
        let places = u32::from(self.decimal_places);
        let rounded =
            amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded < Decimal::ZERO { "-" } else { "" };
        format!(
            "{sign}{}{:.*}",
            self.currency_symbol,
            places as usize,
            rounded.abs()
        )
    }

    /// Updates one setting from its textual form. `none` clears optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };
        match key {
            "locale" => {
                if value.trim().is_empty() {
                    return Err(invalid("must not be empty"));
                }
                self.locale = value.trim().to_string();
            }
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "decimal_places" => {
                let places: u8 = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid("expected a whole number"))?;
                if places > MAX_DECIMAL_PLACES {
                    return Err(invalid("at most 6 decimal places are supported"));
                }
                self.decimal_places = places;
            }
            "utc_offset_minutes" => {
                if value.trim().eq_ignore_ascii_case("none") {
                    self.utc_offset_minutes = None;
                    return Ok(());
                }
                let minutes: i32 = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid("expected minutes east of UTC or `none`"))?;
                if minutes.abs() > MAX_OFFSET_MINUTES {
                    return Err(invalid("offset must be within one day"));
                }
                self.utc_offset_minutes = Some(minutes);
            }
            "show_snapshot_after_mutation" => {
                self.show_snapshot_after_mutation = match value.trim() {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    _ => return Err(invalid("expected true or false")),
                };
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Key/value pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("locale", self.locale.clone()),
            ("currency_symbol", self.currency_symbol.clone()),
            ("decimal_places", self.decimal_places.to_string()),
            (
                "utc_offset_minutes",
                self.utc_offset_minutes
                    .map(|minutes| minutes.to_string())
                    .unwrap_or_else(|| "none".into()),
            ),
            (
                "show_snapshot_after_mutation",
                self.show_snapshot_after_mutation.to_string(),
            ),
        ]
    }
}

/// Loads and saves [`Config`] at `<base>/config.json`.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

use crate::shared::error::AppError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_FILTER: &str = "codelist_cache=debug,info";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshConfig {
    /// `true` のときは初回アクセスまでロードしない
    pub lazy_init: bool,
    /// 既存エントリがない場合のコード値インデックスの初期容量
    pub default_index_capacity: usize,
    /// フルリロード時のスナップショット初期容量
    pub initial_list_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            refresh: RefreshConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            lazy_init: false,
            default_index_capacity: 50,
            initial_list_capacity: 250,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        // 既定値
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("CODELIST_LAZY_INIT") {
            cfg.refresh.lazy_init = parse_bool(&v, cfg.refresh.lazy_init);
        }
        if let Some(value) = env_usize("CODELIST_DEFAULT_INDEX_CAPACITY") {
            cfg.refresh.default_index_capacity = value.max(1);
        }
        if let Some(value) = env_usize("CODELIST_INITIAL_LIST_CAPACITY") {
            cfg.refresh.initial_list_capacity = value.max(1);
        }
        if let Ok(v) = std::env::var("CODELIST_LOG_FILTER") {
            let trimmed = v.trim();
            if !trimmed.is_empty() {
                cfg.logging.filter = trimmed.to_string();
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.refresh.default_index_capacity == 0 {
            return Err(AppError::ConfigurationError(
                "Refresh default_index_capacity must be greater than 0".to_string(),
            ));
        }
        if self.refresh.initial_list_capacity == 0 {
            return Err(AppError::ConfigurationError(
                "Refresh initial_list_capacity must be greater than 0".to_string(),
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(AppError::ConfigurationError(
                "Logging filter must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|v| parse_usize(&v))
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}

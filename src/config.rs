use std::{env, path::PathBuf, str::FromStr};

use anyhow::Result;
use config::{Config as config_config, File as config_file};
use serde::{Deserialize, Serialize};

use crate::logging;

const CONFIG_PATH: &str = "app.json";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    #[serde(default)]
    pub alpha_vantage: AlphaVantage,
    #[serde(default)]
    pub driver: Driver,
}

const ALPHA_VANTAGE_API_KEY: &str = "ALPHA_VANTAGE_API_KEY";
const ALPHA_VANTAGE_BASE_URL: &str = "ALPHA_VANTAGE_BASE_URL";
const DEFAULT_ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AlphaVantage {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for AlphaVantage {
    fn default() -> Self {
        AlphaVantage {
            api_key: String::new(),
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_ALPHA_VANTAGE_BASE_URL.to_string()
}

const RATE_LIMIT_PAUSE_SECS: &str = "RATE_LIMIT_PAUSE_SECS";
/// Alpha Vantage 免費方案每分鐘 5 次
const DEFAULT_RATE_LIMIT_PAUSE_SECS: u64 = 60;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Driver {
    #[serde(default = "default_rate_limit_pause_secs")]
    pub rate_limit_pause_secs: u64,
}

impl Default for Driver {
    fn default() -> Self {
        Driver {
            rate_limit_pause_secs: DEFAULT_RATE_LIMIT_PAUSE_SECS,
        }
    }
}

fn default_rate_limit_pause_secs() -> u64 {
    DEFAULT_RATE_LIMIT_PAUSE_SECS
}

impl App {
    /// Loads `app.json` when present, then lets the environment override it.
    pub fn load() -> Result<Self> {
        let config_path = config_path();
        if config_path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env());
        }

        Ok(App::from_env())
    }

    /// 從 env 中讀取設定值
    fn from_env() -> Self {
        App::default().override_with_env()
    }

    /// 將來至於 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(mut self) -> Self {
        if let Ok(api_key) = env::var(ALPHA_VANTAGE_API_KEY) {
            self.alpha_vantage.api_key = api_key;
        }

        if let Ok(base_url) = env::var(ALPHA_VANTAGE_BASE_URL) {
            if !base_url.trim().is_empty() {
                self.alpha_vantage.base_url = base_url;
            }
        }

        if let Ok(secs) = env::var(RATE_LIMIT_PAUSE_SECS) {
            self.driver.rate_limit_pause_secs =
                parse_pause_secs(&secs, self.driver.rate_limit_pause_secs);
        }

        self
    }

    /// API key 是否已設定
    pub fn has_api_key(&self) -> bool {
        !self.alpha_vantage.api_key.trim().is_empty()
    }
}

/// 無法解析時保留原本的設定值並寫入警告
fn parse_pause_secs(secs: &str, current: u64) -> u64 {
    match u64::from_str(secs.trim()) {
        Ok(secs) => secs,
        Err(why) => {
            logging::warn_file_async(format!(
                "{}={:?} is not a number of seconds ({}), keeping {}",
                RATE_LIMIT_PAUSE_SECS, secs, why, current
            ));
            current
        }
    }
}

/// 回傳設定檔的路徑
fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}
